//! Line Classification
//!
//! Decides what a single source line is under a column dialect and trims it.
//!
//! Rules, in order:
//!
//! 1. An inline marker `*>` anywhere truncates the line at the marker.
//! 2. A line longer than one character starting with `*` is a full-line comment.
//! 3. A `*` or `/` in the indicator column (column 7) makes the line a comment.
//! 4. In terminal mode, a line starting with `\D` or `|` is a debug line.
//! 5. Area A dump (opt-in): sequence numbers in columns 1-6 are blanked.
//! 6. Area B truncation (opt-in): everything past column 72 is dropped.
//!
//! Only one of rules 1-4 fires per line, the first that matches. Once an inline marker
//! has truncated a line, rules 2-4 are skipped even if the indicator column holds `*`
//! or `/`. A line counts as one comment at most and every comment line is reported
//! once, with its original text. Rules 5-6 only run on text that survived, and never
//! in free format.
//!
//! Columns are counted in characters.

use crate::folding::keywords::{is_keyword, LanguageVariant};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Marker that starts a comment running to the end of the line.
pub const INLINE_COMMENT_MARKER: &str = "*>";
/// Zero-based column of the comment/continuation indicator.
pub const INDICATOR_COLUMN: usize = 6;
/// Number of columns reserved for sequence numbers.
pub const SEQUENCE_AREA_WIDTH: usize = 6;
/// Last column (one-based) of Area B.
pub const AREA_B_END: usize = 72;

static SEQUENCE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9 ]{6}").unwrap());

/// Column dialect of a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatMode {
    /// Format not yet determined; fixed column rules still apply.
    #[default]
    Unknown,
    /// Fixed-standard: sequence area, indicator column, Area A and Area B.
    #[serde(alias = "fixed-standard")]
    Fixed,
    /// Fixed-terminal: like fixed, plus `\D` and `|` debug lines.
    #[serde(alias = "fixed-terminal")]
    Terminal,
    /// Free format, no column semantics beyond comment markers.
    Free,
}

impl FormatMode {
    /// Whether Area A / Area B trimming applies.
    pub fn has_column_areas(self) -> bool {
        !matches!(self, FormatMode::Free)
    }

    /// Whether code is confined to columns 8-72.
    pub fn has_fixed_margins(self) -> bool {
        matches!(self, FormatMode::Fixed | FormatMode::Terminal)
    }

    /// Whether `\D` and `|` prefixed lines are debug lines.
    pub fn has_debug_lines(self) -> bool {
        matches!(self, FormatMode::Terminal)
    }
}

/// What a classified line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Code,
    /// Code followed by a `*>` comment; the code part survives.
    InlineComment,
    /// Line starting with `*`.
    FullLineComment,
    /// `*` or `/` in the indicator column.
    IndicatorComment(char),
    /// `\D` or `|` line in terminal mode.
    DebugLine,
}

impl LineKind {
    pub fn is_comment(self) -> bool {
        !matches!(self, LineKind::Code)
    }

    /// Whether the line is dropped entirely.
    pub fn consumes_line(self) -> bool {
        matches!(
            self,
            LineKind::FullLineComment | LineKind::IndicatorComment(_) | LineKind::DebugLine
        )
    }
}

/// Knobs for [`classify_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifyOptions {
    pub format: FormatMode,
    pub dump_area_a: bool,
    pub dump_area_b_onwards: bool,
    /// Selects the keyword dictionary consulted by the Area A heuristic.
    pub language: LanguageVariant,
}

/// A line projected through the classification rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub text: Cow<'a, str>,
    pub kind: LineKind,
}

impl ClassifiedLine<'_> {
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    pub fn into_owned(self) -> String {
        self.text.into_owned()
    }
}

/// Classify a line and apply the enabled column transforms.
pub fn classify_line<'a>(line: &'a str, options: &ClassifyOptions) -> ClassifiedLine<'a> {
    let (mut text, kind) = match line.find(INLINE_COMMENT_MARKER) {
        Some(start) => (Cow::Borrowed(&line[..start]), LineKind::InlineComment),
        None => match whole_line_comment(line, options.format) {
            Some(consumed) => {
                return ClassifiedLine {
                    text: Cow::Borrowed(""),
                    kind: consumed,
                }
            }
            None => (Cow::Borrowed(line), LineKind::Code),
        },
    };

    if options.format.has_column_areas() {
        if options.dump_area_a {
            text = dump_area_a(text, options.language);
        }
        if options.dump_area_b_onwards {
            text = truncate_area_b(text);
        }
    }

    ClassifiedLine { text, kind }
}

/// Rules 2-4: returns the kind of comment when the whole line is dropped.
///
/// A line carrying an inline marker is never dropped; rule 1 has already claimed it.
pub fn whole_line_comment(line: &str, format: FormatMode) -> Option<LineKind> {
    if line.contains(INLINE_COMMENT_MARKER) {
        return None;
    }

    let mut chars = line.chars();
    if chars.next() == Some('*') && chars.next().is_some() {
        return Some(LineKind::FullLineComment);
    }

    if let Some(indicator @ ('*' | '/')) = line.chars().nth(INDICATOR_COLUMN) {
        return Some(LineKind::IndicatorComment(indicator));
    }

    if format.has_debug_lines() && (line.starts_with("\\D") || line.starts_with('|')) {
        return Some(LineKind::DebugLine);
    }

    None
}

/// Byte range of the columns that may hold code.
///
/// Fixed and terminal dialects exclude the sequence area, the indicator column and
/// everything past Area B. Free and not-yet-known formats treat the whole line as code.
pub fn code_area(line: &str, format: FormatMode) -> Range<usize> {
    if !format.has_fixed_margins() {
        return 0..line.len();
    }
    let start = byte_offset_of_column(line, INDICATOR_COLUMN + 1);
    let end = byte_offset_of_column(line, AREA_B_END);
    start..end
}

fn byte_offset_of_column(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

fn dump_area_a(text: Cow<'_, str>, language: LanguageVariant) -> Cow<'_, str> {
    if SEQUENCE_NUMBER.is_match(&text) {
        // the match guarantees six single-byte characters
        return Cow::Owned(format!("{}{}", " ".repeat(SEQUENCE_AREA_WIDTH), &text[6..]));
    }

    let split = match text.char_indices().nth(SEQUENCE_AREA_WIDTH) {
        Some((offset, _)) => offset,
        None => return text,
    };

    // Heuristic: a short keyword in columns 1-6 is code, anything else is a sequence tag.
    if text.chars().count() > INDICATOR_COLUMN + 1 && text[split..].starts_with(' ') {
        let possible_keyword = text[..split].trim();
        if !is_keyword(language, possible_keyword) {
            return Cow::Owned(format!(
                "{}{}",
                " ".repeat(SEQUENCE_AREA_WIDTH + 1),
                &text[split..]
            ));
        }
    }
    text
}

fn truncate_area_b(text: Cow<'_, str>) -> Cow<'_, str> {
    let end = match text.char_indices().nth(AREA_B_END) {
        Some((offset, _)) => offset,
        None => return text,
    };
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(&s[..end]),
        Cow::Owned(mut s) => {
            s.truncate(end);
            Cow::Owned(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> ClassifyOptions {
        ClassifyOptions {
            format: FormatMode::Fixed,
            ..ClassifyOptions::default()
        }
    }

    #[test]
    fn test_plain_code_is_borrowed() {
        let line = "       MOVE A TO B.";
        let classified = classify_line(line, &fixed());
        assert_eq!(classified.kind, LineKind::Code);
        assert!(matches!(classified.text, Cow::Borrowed(_)));
        assert!(!classified.is_comment());
    }

    #[test]
    fn test_indicator_star_is_comment() {
        let classified = classify_line("      * THIS IS A COMMENT", &fixed());
        assert_eq!(classified.text, "");
        assert_eq!(classified.kind, LineKind::IndicatorComment('*'));
    }

    #[test]
    fn test_indicator_slash_is_comment() {
        let classified = classify_line("      / PAGE EJECT", &fixed());
        assert_eq!(classified.text, "");
        assert_eq!(classified.kind, LineKind::IndicatorComment('/'));
    }

    #[test]
    fn test_inline_marker_in_indicator_column_truncates() {
        let classified = classify_line("      *> note", &fixed());
        assert_eq!(classified.text, "      ");
        assert_eq!(classified.kind, LineKind::InlineComment);
    }

    #[test]
    fn test_inline_marker_wins_over_slash_indicator() {
        let classified = classify_line("000100/ MOVE X. *> note", &fixed());
        assert_eq!(classified.text, "000100/ MOVE X. ");
        assert_eq!(classified.kind, LineKind::InlineComment);
        assert_eq!(whole_line_comment("000100/ MOVE X. *> note", FormatMode::Fixed), None);
    }

    #[test]
    fn test_single_star_is_code() {
        assert_eq!(classify_line("*", &fixed()).kind, LineKind::Code);
    }

    #[test]
    fn test_debug_lines_only_in_terminal() {
        let terminal = ClassifyOptions {
            format: FormatMode::Terminal,
            ..ClassifyOptions::default()
        };
        assert_eq!(classify_line("\\D DISPLAY X", &terminal).kind, LineKind::DebugLine);
        assert_eq!(classify_line("| DISPLAY X", &terminal).kind, LineKind::DebugLine);
        assert_eq!(classify_line("| DISPLAY X", &fixed()).kind, LineKind::Code);
    }

    #[test]
    fn test_area_a_sequence_numbers_blanked() {
        let options = ClassifyOptions {
            dump_area_a: true,
            ..fixed()
        };
        let classified = classify_line("000100 PROCEDURE DIVISION.", &options);
        assert_eq!(classified.text, "       PROCEDURE DIVISION.");
    }

    #[test]
    fn test_area_a_tag_shifted_by_one() {
        let options = ClassifyOptions {
            dump_area_a: true,
            ..fixed()
        };
        let classified = classify_line("AB0100 MOVE A TO B.", &options);
        assert_eq!(classified.text, "        MOVE A TO B.");
    }

    #[test]
    fn test_area_a_keyword_left_alone() {
        let options = ClassifyOptions {
            dump_area_a: true,
            ..fixed()
        };
        let classified = classify_line("FD     CUSTOMER-FILE.", &options);
        assert_eq!(classified.text, "FD     CUSTOMER-FILE.");
    }

    #[test]
    fn test_area_b_ignored_in_free_format() {
        let options = ClassifyOptions {
            format: FormatMode::Free,
            dump_area_b_onwards: true,
            ..ClassifyOptions::default()
        };
        let line = "X".repeat(80);
        assert_eq!(classify_line(&line, &options).text.len(), 80);
    }

    #[test]
    fn test_code_area_excludes_fixed_margins() {
        let line = format!("000100 MOVE A TO B.{}IDENT001", " ".repeat(53));
        let area = code_area(&line, FormatMode::Fixed);
        assert_eq!(&line[area.clone()], &line[7..72]);
        assert_eq!(code_area("  X", FormatMode::Fixed), 3..3);
        assert_eq!(code_area("  X", FormatMode::Free), 0..3);
    }

    #[test]
    fn test_unknown_format_has_no_code_margins() {
        let line = "move a to b.";
        assert_eq!(code_area(line, FormatMode::Unknown), 0..line.len());
        assert_eq!(code_area(line, FormatMode::Terminal), 7..line.len());
    }
}
