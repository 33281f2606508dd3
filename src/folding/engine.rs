//! Case folding engine
//!
//! [`CaseFolder::fold_line`] rewrites the words of one category in one line. A
//! formatting request runs it three times (keywords, then constants and variables,
//! then perform targets), each pass reading the previous pass's output.
//!
//! Only the code region is touched: whole-line comments come back unchanged, literals
//! and `*>` comments are skipped, and in fixed and terminal dialects the sequence
//! area, the indicator column and everything past column 72 are left alone. Until the
//! format is known the whole line is code.

use super::keywords::LanguageVariant;
use super::oracle::SymbolOracle;
use super::token::tokenize;
use crate::source::classification::{code_area, whole_line_comment, INLINE_COMMENT_MARKER};
use crate::source::{FormatMode, SourceId};

/// Category of words a pass rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldAction {
    Keywords,
    ConstantsOrVariables,
    PerformTargets,
}

impl FoldAction {
    /// Pass order for a full formatting request.
    pub const PASSES: [FoldAction; 3] = [
        FoldAction::Keywords,
        FoldAction::ConstantsOrVariables,
        FoldAction::PerformTargets,
    ];
}

/// Casing applied to matching words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldStyle {
    UpperCase,
    LowerCase,
    /// Leading capital per hyphen segment: `MY-VAR` becomes `My-Var`.
    CamelCase,
}

impl FoldStyle {
    pub fn apply(self, word: &str) -> String {
        match self {
            FoldStyle::UpperCase => word.to_uppercase(),
            FoldStyle::LowerCase => word.to_lowercase(),
            FoldStyle::CamelCase => camel_case(word),
        }
    }
}

fn camel_case(word: &str) -> String {
    let mut folded = String::with_capacity(word.len());
    for (i, segment) in word.split('-').enumerate() {
        if i > 0 {
            folded.push('-');
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            folded.extend(first.to_uppercase());
            folded.push_str(&chars.as_str().to_lowercase());
        }
    }
    folded
}

/// Rewrites word casing using answers from a [`SymbolOracle`].
///
/// Without an oracle, or when the oracle has no current index for the unit, every
/// line is returned unchanged.
#[derive(Clone, Copy)]
pub struct CaseFolder<'a> {
    oracle: Option<&'a dyn SymbolOracle>,
    format: FormatMode,
}

impl<'a> CaseFolder<'a> {
    pub fn new(oracle: Option<&'a dyn SymbolOracle>, format: FormatMode) -> Self {
        Self { oracle, format }
    }

    pub fn format(&self) -> FormatMode {
        self.format
    }

    /// Fold the words of `action`'s category in `line` to `style`.
    ///
    /// `constants_upper` forces uppercase for the constants and variables pass,
    /// whatever `style` asks for.
    pub fn fold_line(
        &self,
        line: &str,
        unit: &SourceId,
        action: FoldAction,
        style: FoldStyle,
        constants_upper: bool,
        variant: LanguageVariant,
    ) -> String {
        let Some(oracle) = self.oracle.filter(|o| o.is_available(unit)) else {
            return line.to_string();
        };
        if whole_line_comment(line, self.format).is_some() {
            return line.to_string();
        }

        let style = match action {
            FoldAction::ConstantsOrVariables if constants_upper => FoldStyle::UpperCase,
            _ => style,
        };

        let mut area = code_area(line, self.format);
        // an inline comment ends the code, even one starting in the margin
        if let Some(marker) = line.find(INLINE_COMMENT_MARKER) {
            area.end = area.end.min(marker.max(area.start));
        }
        let code = &line[area.clone()];
        let mut folded = String::with_capacity(line.len());
        folded.push_str(&line[..area.start]);
        for (token, span) in tokenize(code) {
            let text = &code[span];
            if token.is_word() && matches_action(oracle, unit, action, variant, text) {
                folded.push_str(&style.apply(text));
            } else {
                folded.push_str(text);
            }
        }
        folded.push_str(&line[area.end..]);
        folded
    }

    /// Run all three passes over `line`.
    pub fn fold_all(
        &self,
        line: &str,
        unit: &SourceId,
        style: FoldStyle,
        constants_upper: bool,
        variant: LanguageVariant,
    ) -> String {
        FoldAction::PASSES
            .iter()
            .fold(line.to_string(), |current, &action| {
                self.fold_line(&current, unit, action, style, constants_upper, variant)
            })
    }
}

fn matches_action(
    oracle: &dyn SymbolOracle,
    unit: &SourceId,
    action: FoldAction,
    variant: LanguageVariant,
    word: &str,
) -> bool {
    match action {
        FoldAction::Keywords => oracle.is_keyword(variant, word),
        FoldAction::ConstantsOrVariables => oracle.is_declared_constant_or_variable(unit, word),
        FoldAction::PerformTargets => oracle.is_declared_paragraph_or_section(unit, word),
    }
}
