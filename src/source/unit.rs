//! Source unit: original lines plus an edit overlay
//!
//! Original lines are read once and never change until the unit is reloaded. Edits
//! produced by the formatter land in a sparse overlay keyed by zero-based line index,
//! so `get_line(i, true)` always returns what was on disk.
//!
//! Classified reads (`raw = false`) count comments on the unit and forward each
//! recognized comment to the registered [`CommentSink`]. The count only goes back to
//! zero through [`SourceUnit::reset_comment_count`] or a reload.

use super::classification::{classify_line, ClassifyOptions, FormatMode};
use super::comments::{CommentEvent, CommentSink};
use super::error::SourceError;
use super::reader::{read_lines, split_lines, LoadCancel};
use super::tabs::expand_tabs;
use super::workspace::short_workspace_filename;
use crate::folding::keywords::LanguageVariant;
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::{Instant, UNIX_EPOCH};
use url::Url;

/// Content version marker of a unit.
///
/// Two units with equal paths describe the same content only if their versions are
/// equal; external caches use nothing else to detect staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentVersion {
    /// File modification time in nanoseconds since the Unix epoch.
    Modified(u128),
    /// Digest of the lines, for units without a usable modification time.
    Digest(u64),
}

impl ContentVersion {
    pub fn of_lines(lines: &[String]) -> Self {
        let mut hasher = DefaultHasher::new();
        lines.hash(&mut hasher);
        ContentVersion::Digest(hasher.finish())
    }

    fn of_file(path: &Path, lines: &[String]) -> Self {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| ContentVersion::Modified(d.as_nanos()))
            .unwrap_or_else(|| Self::of_lines(lines))
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentVersion::Modified(nanos) => write!(f, "mtime:{}", nanos),
            ContentVersion::Digest(digest) => write!(f, "digest:{:016x}", digest),
        }
    }
}

/// Identity of a unit: its path and content version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId {
    pub path: PathBuf,
    pub version: ContentVersion,
}

impl SourceId {
    pub fn new(path: impl Into<PathBuf>, version: ContentVersion) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }
}

/// Settings a unit is constructed with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    pub language: LanguageVariant,
    pub format: FormatMode,
    pub dump_area_a: bool,
    pub dump_area_b_onwards: bool,
    pub workspace_folders: Vec<PathBuf>,
}

/// Lines of one source file with their edit overlay.
pub struct SourceUnit {
    path: PathBuf,
    version: ContentVersion,
    lines: Vec<String>,
    language: LanguageVariant,
    format: FormatMode,
    dump_area_a: bool,
    dump_area_b_onwards: bool,
    workspace_folders: Vec<PathBuf>,
    short_filename: String,
    comment_count: usize,
    comment_sink: Option<Box<dyn CommentSink>>,
    updated: HashMap<usize, String>,
}

impl SourceUnit {
    /// Load `path` from disk.
    pub fn load(path: impl AsRef<Path>, options: &SourceOptions) -> Result<Self, SourceError> {
        Self::load_inner(path.as_ref(), options, None)
    }

    /// Load `path`, giving up with [`SourceError::Cancelled`] once `cancel` fires.
    pub fn load_with_cancel(
        path: impl AsRef<Path>,
        options: &SourceOptions,
        cancel: &LoadCancel,
    ) -> Result<Self, SourceError> {
        Self::load_inner(path.as_ref(), options, Some(cancel))
    }

    /// Load `path` on tokio's blocking pool.
    pub async fn load_async(path: PathBuf, options: SourceOptions) -> Result<Self, SourceError> {
        let display = path.clone();
        tokio::task::spawn_blocking(move || Self::load(&path, &options))
            .await
            .map_err(|e| SourceError::Io {
                path: display,
                message: e.to_string(),
            })?
    }

    /// Build a unit from in-memory text; the version is a digest of the lines.
    pub fn from_text(path: impl Into<PathBuf>, text: &str, options: &SourceOptions) -> Self {
        let lines = split_lines(text);
        let version = ContentVersion::of_lines(&lines);
        Self::assemble(path.into(), version, lines, options)
    }

    fn load_inner(
        path: &Path,
        options: &SourceOptions,
        cancel: Option<&LoadCancel>,
    ) -> Result<Self, SourceError> {
        let _span = tracing::debug_span!("load_source", path = %path.display()).entered();
        let start = Instant::now();
        let lines = match read_lines(path, cancel) {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!("File failed! ({}): {}", path.display(), err);
                return Err(err);
            }
        };
        let version = ContentVersion::of_file(path, &lines);
        tracing::debug!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            lines = lines.len(),
            "Loading File {}",
            path.display()
        );
        Ok(Self::assemble(path.to_path_buf(), version, lines, options))
    }

    fn assemble(
        path: PathBuf,
        version: ContentVersion,
        lines: Vec<String>,
        options: &SourceOptions,
    ) -> Self {
        let short_filename = short_workspace_filename(&path, &options.workspace_folders);
        Self {
            path,
            version,
            lines,
            language: options.language,
            format: options.format,
            dump_area_a: options.dump_area_a,
            dump_area_b_onwards: options.dump_area_b_onwards,
            workspace_folders: options.workspace_folders.clone(),
            short_filename,
            comment_count: 0,
            comment_sink: None,
            updated: HashMap::new(),
        }
    }

    /// Re-read the file, dropping the overlay and the comment count.
    ///
    /// On failure the unit is left as it was; callers should treat the file as gone.
    pub fn reload(&mut self) -> Result<(), SourceError> {
        let lines = read_lines(&self.path, None)?;
        self.version = ContentVersion::of_file(&self.path, &lines);
        self.lines = lines;
        self.updated.clear();
        self.comment_count = 0;
        self.short_filename = short_workspace_filename(&self.path, &self.workspace_folders);
        Ok(())
    }

    pub fn id(&self) -> SourceId {
        SourceId::new(self.path.clone(), self.version)
    }

    pub fn filename(&self) -> &Path {
        &self.path
    }

    /// `file://` URL of the unit, when its path can be made absolute.
    pub fn uri(&self) -> Option<Url> {
        let absolute = if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir().ok()?.join(&self.path)
        };
        Url::from_file_path(absolute).ok()
    }

    pub fn version(&self) -> ContentVersion {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comment_count
    }

    pub fn reset_comment_count(&mut self) {
        self.comment_count = 0;
    }

    pub fn is_in_workspace(&self) -> bool {
        !self.short_filename.is_empty()
    }

    /// Path relative to the closest workspace folder, empty when outside all of them.
    pub fn short_workspace_filename(&self) -> &str {
        &self.short_filename
    }

    pub fn language(&self) -> LanguageVariant {
        self.language
    }

    pub fn set_language(&mut self, language: LanguageVariant) {
        self.language = language;
    }

    /// Set the language from a host language id such as `COBOL` or `ACUCOBOL`.
    pub fn set_language_id(&mut self, id: &str) -> Result<(), SourceError> {
        self.language = id
            .parse()
            .map_err(|_| SourceError::UnknownLanguage(id.to_string()))?;
        Ok(())
    }

    pub fn format(&self) -> FormatMode {
        self.format
    }

    pub fn set_format(&mut self, format: FormatMode) {
        self.format = format;
    }

    pub fn set_dump_area_a(&mut self, flag: bool) {
        self.dump_area_a = flag;
    }

    pub fn set_dump_area_b_onwards(&mut self, flag: bool) {
        self.dump_area_b_onwards = flag;
    }

    /// Register the single comment consumer, replacing any previous one.
    pub fn set_comment_sink(&mut self, sink: impl CommentSink + 'static) {
        self.comment_sink = Some(Box::new(sink));
    }

    pub fn clear_comment_sink(&mut self) {
        self.comment_sink = None;
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            format: self.format,
            dump_area_a: self.dump_area_a,
            dump_area_b_onwards: self.dump_area_b_onwards,
            language: self.language,
        }
    }

    /// Line `index`, untouched when `raw`, otherwise classified and trimmed.
    ///
    /// Returns `None` past the end of the unit. The overlay is never consulted.
    pub fn get_line(&mut self, index: usize, raw: bool) -> Option<String> {
        let options = self.classify_options();
        let line = self.lines.get(index)?;
        if raw {
            return Some(line.clone());
        }

        let classified = classify_line(line, &options);
        if classified.is_comment() {
            self.comment_count += 1;
            if let Some(sink) = self.comment_sink.as_mut() {
                sink.process_comment(CommentEvent {
                    line: line.clone(),
                    filename: self.path.clone(),
                    line_number: index,
                });
            }
        }
        Some(classified.into_owned())
    }

    /// Overlay entry for `index` if there is one, else the classified line.
    pub fn get_updated_line(&mut self, index: usize) -> Option<String> {
        if let Some(updated) = self.updated.get(&index) {
            return Some(updated.clone());
        }
        self.get_line(index, false)
    }

    /// Record a replacement for line `index`. The content is not validated.
    pub fn set_updated_line(&mut self, index: usize, line: impl Into<String>) {
        self.updated.insert(index, line.into());
    }

    /// Overlay entry for `index`, without falling back.
    pub fn updated_line(&self, index: usize) -> Option<&str> {
        self.updated.get(&index).map(String::as_str)
    }

    /// Indices with an overlay entry, ascending.
    pub fn updated_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.updated.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Raw line `index` with tabs expanded; borrowed when it has no tabs.
    pub fn get_line_tab_expanded(&self, index: usize) -> Option<Cow<'_, str>> {
        self.lines.get(index).map(|line| expand_tabs(line))
    }
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("version", &self.version)
            .field("lines", &self.lines.len())
            .field("language", &self.language)
            .field("format", &self.format)
            .field("comment_count", &self.comment_count)
            .field("updated", &self.updated.len())
            .finish_non_exhaustive()
    }
}

/// Load several files concurrently, one blocking task each. Results keep input order.
pub async fn load_many(
    paths: Vec<PathBuf>,
    options: &SourceOptions,
) -> Vec<Result<SourceUnit, SourceError>> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(SourceUnit::load_async(path, options.clone())))
        .collect();

    let mut units = Vec::with_capacity(handles.len());
    for handle in handles {
        let unit = match handle.await {
            Ok(result) => result,
            Err(e) => Err(SourceError::Io {
                path: PathBuf::new(),
                message: e.to_string(),
            }),
        };
        units.push(unit);
    }
    units
}
