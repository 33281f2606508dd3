//! # cobol-source
//!
//! Line storage, fixed-column classification and case folding for COBOL source.
//!
//! File Layout
//!
//! The crate is split along the two concerns it composes: keeping the lines of a
//! source unit (with their column conventions), and rewriting tokens inside a line.
//!
//! src/
//!   ├── source       Line storage, classification rules, tab expansion, comment events
//!   ├── folding      Tokenization, keyword dictionaries, symbol oracle, case folding
//!   ├── formatter    The format-on-return trigger producing single line edits
//!   └── config       Settings loaded from embedded defaults plus user files
//!
//! The data flows one way: a [`source::SourceUnit`] hands a line to the
//! [`formatter::CaseFormatter`], which asks a [`folding::SymbolOracle`] about each word
//! and returns a [`formatter::LineEdit`] that the unit records in its overlay. The
//! original lines are never touched.

pub mod config;
pub mod folding;
pub mod formatter;
pub mod source;
