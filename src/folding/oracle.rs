//! Symbol oracle
//!
//! Case folding never decides on its own what a word is. It asks a [`SymbolOracle`],
//! which answers from the index an external scanner built for a source unit.
//! [`SymbolTable`] is the in-memory implementation used by the binary and the tests;
//! an index is only trusted while its recorded [`ContentVersion`] matches the unit's.

use super::keywords::{is_keyword, LanguageVariant};
use crate::source::{ContentVersion, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only classification oracle for the words of a source unit.
pub trait SymbolOracle {
    /// Whether an index exists for `unit` at its current version.
    ///
    /// When this returns `false` folding leaves lines unchanged.
    fn is_available(&self, unit: &SourceId) -> bool;

    fn is_keyword(&self, variant: LanguageVariant, token: &str) -> bool;

    fn is_declared_constant_or_variable(&self, unit: &SourceId, token: &str) -> bool;

    fn is_declared_paragraph_or_section(&self, unit: &SourceId, token: &str) -> bool;
}

/// Symbols declared by one unit, as delivered by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSymbols {
    #[serde(default)]
    pub constants_or_variables: Vec<String>,
    #[serde(default)]
    pub paragraphs_or_sections: Vec<String>,
}

impl UnitSymbols {
    /// Load a symbol file; `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SymbolsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SymbolsError::Io(e.to_string()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&text).map_err(|e| SymbolsError::Yaml(e.to_string()))
            }
            _ => serde_json::from_str(&text).map_err(|e| SymbolsError::Json(e.to_string())),
        }
    }
}

/// Error that can occur when loading a symbol file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolsError {
    Io(String),
    Json(String),
    Yaml(String),
}

impl fmt::Display for SymbolsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolsError::Io(msg) => write!(f, "IO error: {}", msg),
            SymbolsError::Json(msg) => write!(f, "Invalid JSON symbol file: {}", msg),
            SymbolsError::Yaml(msg) => write!(f, "Invalid YAML symbol file: {}", msg),
        }
    }
}

impl std::error::Error for SymbolsError {}

#[derive(Debug, Clone)]
struct IndexedUnit {
    version: ContentVersion,
    constants_or_variables: HashSet<String>,
    paragraphs_or_sections: HashSet<String>,
}

/// In-memory oracle keyed by unit path and version.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    units: HashMap<PathBuf, IndexedUnit>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the symbols of `unit`, replacing any older index for the same path.
    pub fn insert(&mut self, unit: &SourceId, symbols: UnitSymbols) {
        let indexed = IndexedUnit {
            version: unit.version,
            constants_or_variables: normalize_all(symbols.constants_or_variables),
            paragraphs_or_sections: normalize_all(symbols.paragraphs_or_sections),
        };
        self.units.insert(unit.path.clone(), indexed);
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        self.units.remove(path).is_some()
    }

    fn current(&self, unit: &SourceId) -> Option<&IndexedUnit> {
        self.units
            .get(&unit.path)
            .filter(|indexed| indexed.version == unit.version)
    }
}

fn normalize_all(names: Vec<String>) -> HashSet<String> {
    names.into_iter().map(|n| n.to_ascii_uppercase()).collect()
}

impl SymbolOracle for SymbolTable {
    fn is_available(&self, unit: &SourceId) -> bool {
        self.current(unit).is_some()
    }

    fn is_keyword(&self, variant: LanguageVariant, token: &str) -> bool {
        is_keyword(variant, token)
    }

    fn is_declared_constant_or_variable(&self, unit: &SourceId, token: &str) -> bool {
        self.current(unit)
            .is_some_and(|u| u.constants_or_variables.contains(&token.to_ascii_uppercase()))
    }

    fn is_declared_paragraph_or_section(&self, unit: &SourceId, token: &str) -> bool {
        self.current(unit)
            .is_some_and(|u| u.paragraphs_or_sections.contains(&token.to_ascii_uppercase()))
    }
}
