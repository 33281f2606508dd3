//! Case folding
//!
//! Rewrites the casing of keywords, declared constants and variables, and perform
//! targets in a line, using a [`SymbolOracle`] to tell them apart.

pub mod engine;
pub mod keywords;
pub mod oracle;
pub mod token;

pub use engine::{CaseFolder, FoldAction, FoldStyle};
pub use keywords::{is_keyword, LanguageVariant};
pub use oracle::{SymbolOracle, SymbolTable, SymbolsError, UnitSymbols};
