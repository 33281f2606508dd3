//! Settings loader
//!
//! `defaults/cobol-source.default.toml` is embedded into the crate so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top of
//! those defaults via [`Loader`] before deserializing into [`Settings`].
//!
//! Settings are resolved once. [`SettingsStore`] only re-resolves them when told the
//! settings changed, and bumps a generation counter each time it does.

use crate::folding::keywords::LanguageVariant;
use crate::formatter::FormatOnReturn;
use crate::source::{FormatMode, SourceOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_TOML: &str = include_str!("../defaults/cobol-source.default.toml");

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source: SourceSettings,
    pub format: FormatSettings,
    pub language: LanguageSettings,
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    /// Incremented every time the settings are re-resolved.
    #[serde(skip)]
    pub generation: u64,
    #[serde(skip)]
    format_rules: Vec<(Regex, FormatMode)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub format: FormatMode,
    pub language_id: LanguageVariant,
    pub dump_area_a: bool,
    pub dump_area_b_onwards: bool,
    #[serde(default)]
    pub fileformat: Vec<FileFormatRule>,
}

/// Chooses a format for files whose path matches a glob.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileFormatRule {
    pub pattern: String,
    pub sourceformat: FormatMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FormatSettings {
    pub on_return: FormatOnReturn,
    pub constants_to_uppercase: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSettings {
    pub valid_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub folders: Vec<PathBuf>,
}

impl Settings {
    fn validate(mut self) -> Result<Self, ConfigError> {
        if let Some(bad) = self
            .language
            .valid_ids
            .iter()
            .find(|id| id.parse::<LanguageVariant>().is_err())
        {
            tracing::warn!(id = %bad, "unknown entry in language.valid_ids, using the built-in ids");
            self.language.valid_ids = LanguageVariant::ALL
                .iter()
                .map(|variant| variant.id().to_string())
                .collect();
        }
        let language = self.source.language_id.id();
        if !self
            .language
            .valid_ids
            .iter()
            .any(|id| id.parse::<LanguageVariant>().ok() == Some(self.source.language_id))
        {
            return Err(ConfigError::Message(format!(
                "language id '{language}' is not listed in language.valid_ids"
            )));
        }

        self.format_rules = self
            .source
            .fileformat
            .iter()
            .map(|rule| {
                Regex::new(&glob_to_regex(&rule.pattern))
                    .map(|re| (re, rule.sourceformat))
                    .map_err(|e| ConfigError::Message(format!("bad fileformat pattern: {e}")))
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Format for `path`: the first matching `fileformat` rule, else `source.format`.
    pub fn format_for(&self, path: &Path) -> FormatMode {
        let full = path.to_string_lossy().replace('\\', "/");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.format_rules
            .iter()
            .zip(&self.source.fileformat)
            .find(|((re, _), rule)| {
                let target = if rule.pattern.contains('/') { &full } else { &name };
                re.is_match(target)
            })
            .map(|((_, format), _)| *format)
            .unwrap_or(self.source.format)
    }

    /// Options for constructing the unit at `path`.
    pub fn source_options(&self, path: &Path) -> SourceOptions {
        SourceOptions {
            language: self.source.language_id,
            format: self.format_for(path),
            dump_area_a: self.source.dump_area_a,
            dump_area_b_onwards: self.source.dump_area_b_onwards,
            workspace_folders: self.workspace.folders.clone(),
        }
    }
}

/// Translate a glob into an anchored, case-insensitive regex.
///
/// `**` spans directories, `*` and `?` stay within one path segment.
fn glob_to_regex(glob: &str) -> String {
    let mut re = String::from("(?i)^");
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    re.push_str("(?:.*/)?");
                } else {
                    re.push_str(".*");
                }
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    re
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a settings file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional settings file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.builder.build()?.try_deserialize()?;
        settings.validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}

/// Holds the resolved settings and re-resolves them on an explicit signal.
#[derive(Debug)]
pub struct SettingsStore {
    files: Vec<PathBuf>,
    current: Arc<Settings>,
}

impl SettingsStore {
    /// Resolve settings from the defaults plus `files` (each optional).
    pub fn new(files: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let current = Arc::new(Self::resolve(&files, 0)?);
        Ok(Self { files, current })
    }

    fn resolve(files: &[PathBuf], generation: u64) -> Result<Settings, ConfigError> {
        let loader = files
            .iter()
            .fold(Loader::new(), |loader, file| loader.with_optional_file(file));
        let mut settings = loader.build()?;
        settings.generation = generation;
        Ok(settings)
    }

    pub fn current(&self) -> Arc<Settings> {
        Arc::clone(&self.current)
    }

    pub fn generation(&self) -> u64 {
        self.current.generation
    }

    /// Re-read every layer. On error the previous settings stay in effect.
    pub fn settings_changed(&mut self) -> Result<Arc<Settings>, ConfigError> {
        let generation = self.current.generation + 1;
        let settings = Self::resolve(&self.files, generation)?;
        tracing::info!(generation, "settings reloaded");
        self.current = Arc::new(settings);
        Ok(self.current())
    }
}
