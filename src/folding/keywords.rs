//! Reserved words per language variant
//!
//! The full symbol dictionary belongs to the external scanner; this module carries the
//! reserved words needed by the Area A heuristic and the default keyword answers of
//! [`SymbolTable`](super::oracle::SymbolTable). Lookups are case-insensitive.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Language variant tag of a source unit, selecting the keyword dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageVariant {
    #[default]
    Cobol,
    CobolIt,
    AcuCobol,
    BitlangCobol,
    MicroFocusListFile,
}

impl LanguageVariant {
    pub const ALL: [LanguageVariant; 5] = [
        LanguageVariant::Cobol,
        LanguageVariant::CobolIt,
        LanguageVariant::AcuCobol,
        LanguageVariant::BitlangCobol,
        LanguageVariant::MicroFocusListFile,
    ];

    /// Language id as the host editor spells it.
    pub fn id(self) -> &'static str {
        match self {
            LanguageVariant::Cobol => "COBOL",
            LanguageVariant::CobolIt => "COBOLIT",
            LanguageVariant::AcuCobol => "ACUCOBOL",
            LanguageVariant::BitlangCobol => "BITLANG-COBOL",
            LanguageVariant::MicroFocusListFile => "COBOL_MF_LISTFILE",
        }
    }
}

impl fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LanguageVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cobol" | "COBOL" => Ok(LanguageVariant::Cobol),
            "COBOLIT" => Ok(LanguageVariant::CobolIt),
            "ACUCOBOL" => Ok(LanguageVariant::AcuCobol),
            "BITLANG-COBOL" => Ok(LanguageVariant::BitlangCobol),
            "COBOL_MF_LISTFILE" => Ok(LanguageVariant::MicroFocusListFile),
            other => Err(format!("unknown language id '{other}'")),
        }
    }
}

impl TryFrom<String> for LanguageVariant {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageVariant> for String {
    fn from(value: LanguageVariant) -> Self {
        value.id().to_string()
    }
}

const COMMON_KEYWORDS: &[&str] = &[
    "ACCEPT", "ACCESS", "ADD", "ADDRESS", "ADVANCING", "AFTER", "ALL", "ALPHABET",
    "ALPHABETIC", "ALPHANUMERIC", "ALSO", "ALTER", "ALTERNATE", "AND", "ANY", "ARE", "AREA",
    "AREAS", "ASCENDING", "ASSIGN", "AT", "AUTHOR", "BEFORE", "BINARY", "BLANK", "BLOCK",
    "BOTTOM", "BY", "CALL", "CANCEL", "CD", "CHARACTER", "CHARACTERS", "CLASS", "CLOSE",
    "CODE", "COLLATING", "COLUMN", "COMMA", "COMMON", "COMP", "COMP-1", "COMP-2", "COMP-3",
    "COMP-4", "COMP-5", "COMPUTATIONAL", "COMPUTE", "CONFIGURATION", "CONTAINS", "CONTENT",
    "CONTINUE", "CONVERTING", "COPY", "CORR", "CORRESPONDING", "COUNT", "CURRENCY", "DATA",
    "DATE", "DATE-COMPILED", "DATE-WRITTEN", "DAY", "DAY-OF-WEEK", "DE", "DECIMAL-POINT",
    "DECLARATIVES", "DELETE", "DELIMITED", "DELIMITER", "DEPENDING", "DESCENDING",
    "DETAIL", "DISPLAY", "DIVIDE", "DIVISION", "DOWN", "DUPLICATES", "DYNAMIC", "ELSE",
    "END", "END-ADD", "END-CALL", "END-COMPUTE", "END-DELETE", "END-DIVIDE", "END-EVALUATE",
    "END-IF", "END-MULTIPLY", "END-OF-PAGE", "END-PERFORM", "END-READ", "END-RETURN",
    "END-REWRITE", "END-SEARCH", "END-START", "END-STRING", "END-SUBTRACT", "END-UNSTRING",
    "END-WRITE", "ENTER", "ENTRY", "ENVIRONMENT", "EOP", "EQUAL", "ERROR", "EVALUATE",
    "EXCEPTION", "EXIT", "EXTEND", "EXTERNAL", "FALSE", "FD", "FILE", "FILE-CONTROL",
    "FILLER", "FINAL", "FIRST", "FOOTING", "FOR", "FROM", "FUNCTION", "GENERATE", "GIVING",
    "GLOBAL", "GO", "GOBACK", "GREATER", "GROUP", "HEADING", "HIGH-VALUE", "HIGH-VALUES",
    "I-O", "I-O-CONTROL", "IDENTIFICATION", "IF", "IN", "INDEX", "INDEXED", "INITIAL",
    "INITIALIZE", "INITIATE", "INPUT", "INPUT-OUTPUT", "INSPECT", "INSTALLATION", "INTO",
    "INVALID", "IS", "JUST", "JUSTIFIED", "KEY", "LABEL", "LAST", "LEADING", "LEFT",
    "LENGTH", "LESS", "LIMIT", "LINAGE", "LINE", "LINES", "LINKAGE", "LOCAL-STORAGE",
    "LOCK", "LOW-VALUE", "LOW-VALUES", "MEMORY", "MERGE", "MODE", "MODULES", "MOVE",
    "MULTIPLE", "MULTIPLY", "NATIVE", "NEGATIVE", "NEXT", "NO", "NOT", "NULL", "NULLS",
    "NUMERIC", "OBJECT-COMPUTER", "OCCURS", "OF", "OFF", "OMITTED", "ON", "OPEN", "OPTIONAL",
    "OR", "ORDER", "ORGANIZATION", "OTHER", "OUTPUT", "OVERFLOW", "PACKED-DECIMAL",
    "PADDING", "PAGE", "PERFORM", "PIC", "PICTURE", "POINTER", "POSITION", "POSITIVE",
    "PROCEDURE", "PROCEED", "PROGRAM", "PROGRAM-ID", "QUOTE", "QUOTES", "RANDOM", "READ",
    "RECORD", "RECORDS", "REDEFINES", "REEL", "REFERENCE", "RELATIVE", "RELEASE",
    "REMAINDER", "RENAMES", "REPLACE", "REPLACING", "REPORT", "RESERVE", "RETURN",
    "RETURNING", "REWIND", "REWRITE", "RIGHT", "ROUNDED", "RUN", "SD", "SEARCH", "SECTION",
    "SECURITY", "SELECT", "SENTENCE", "SEPARATE", "SEQUENCE", "SEQUENTIAL", "SET", "SIGN",
    "SIZE", "SORT", "SOURCE", "SOURCE-COMPUTER", "SPACE", "SPACES", "SPECIAL-NAMES",
    "STANDARD", "START", "STATUS", "STOP", "STRING", "SUBTRACT", "SUM", "SUPPRESS",
    "SYNC", "SYNCHRONIZED", "TALLYING", "TERMINATE", "TEST", "THAN", "THEN", "THROUGH",
    "THRU", "TIME", "TIMES", "TO", "TOP", "TRAILING", "TRUE", "TYPE", "UNIT", "UNSTRING",
    "UNTIL", "UP", "UPON", "USAGE", "USE", "USING", "VALUE", "VALUES", "VARYING", "WHEN",
    "WITH", "WORDS", "WORKING-STORAGE", "WRITE", "ZERO", "ZEROES", "ZEROS",
];

const ACUCOBOL_KEYWORDS: &[&str] = &[
    "BACKGROUND-COLOR", "BEEP", "BOLD", "DESTROY", "DISPLAY-FORMAT", "FOREGROUND-COLOR",
    "HANDLE", "INQUIRE", "MODIFY", "MODAL", "MODELESS", "REVERSE-VIDEO", "THREAD", "WINDOW",
];

const COBOLIT_KEYWORDS: &[&str] = &["EXEC", "END-EXEC", "LOCAL-STORAGE", "TYPEDEF"];

const BITLANG_KEYWORDS: &[&str] = &["EXEC", "END-EXEC", "RAISE", "RAISING", "TYPEDEF"];

fn build(extra: &[&'static str]) -> HashSet<&'static str> {
    COMMON_KEYWORDS.iter().chain(extra).copied().collect()
}

static COBOL: Lazy<HashSet<&'static str>> = Lazy::new(|| build(&[]));
static ACUCOBOL: Lazy<HashSet<&'static str>> = Lazy::new(|| build(ACUCOBOL_KEYWORDS));
static COBOLIT: Lazy<HashSet<&'static str>> = Lazy::new(|| build(COBOLIT_KEYWORDS));
static BITLANG: Lazy<HashSet<&'static str>> = Lazy::new(|| build(BITLANG_KEYWORDS));

/// Keyword dictionary for `variant`, uppercase entries.
pub fn keyword_dictionary(variant: LanguageVariant) -> &'static HashSet<&'static str> {
    match variant {
        LanguageVariant::Cobol | LanguageVariant::MicroFocusListFile => &*COBOL,
        LanguageVariant::CobolIt => &*COBOLIT,
        LanguageVariant::AcuCobol => &*ACUCOBOL,
        LanguageVariant::BitlangCobol => &*BITLANG,
    }
}

pub fn is_keyword(variant: LanguageVariant, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    keyword_dictionary(variant).contains(token.to_ascii_uppercase().as_str())
}
