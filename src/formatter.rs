//! Format on return
//!
//! When the user finishes a line (types a newline), the line *above* the cursor is
//! folded: keywords first, then constants and variables, then perform targets. The
//! line being typed is never touched. The result is either nothing, when folding
//! changed no character, or a single [`LineEdit`] replacing that line's full text.

use crate::config::FormatSettings;
use crate::folding::{CaseFolder, FoldStyle, LanguageVariant, SymbolOracle};
use crate::source::{FormatMode, SourceId, SourceUnit};
use serde::Deserialize;

/// Style requested for format-on-return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatOnReturn {
    #[default]
    #[serde(alias = "Off")]
    Off,
    #[serde(alias = "UpperCase")]
    UpperCase,
    #[serde(alias = "CamelCase")]
    CamelCase,
}

impl FormatOnReturn {
    pub fn fold_style(self) -> Option<FoldStyle> {
        match self {
            FormatOnReturn::Off => None,
            FormatOnReturn::UpperCase => Some(FoldStyle::UpperCase),
            FormatOnReturn::CamelCase => Some(FoldStyle::CamelCase),
        }
    }
}

/// Replacement for the full text of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    /// Zero-based line index.
    pub line: usize,
    pub new_text: String,
}

/// Everything the trigger needs about the completed line.
#[derive(Debug, Clone, Copy)]
pub struct FormatRequest<'a> {
    /// Zero-based index of the line being replaced.
    pub line: usize,
    pub text: &'a str,
    pub style: FormatOnReturn,
    pub constants_upper: bool,
    pub variant: LanguageVariant,
}

/// Produces case-folding edits when a line is completed.
#[derive(Debug, Clone, Copy)]
pub struct CaseFormatter {
    settings: FormatSettings,
    format: FormatMode,
}

impl CaseFormatter {
    pub fn new(settings: FormatSettings, format: FormatMode) -> Self {
        Self { settings, format }
    }

    pub fn settings(&self) -> FormatSettings {
        self.settings
    }

    /// Index of the line to fold after the cursor moved to `cursor_line`.
    pub fn line_above(cursor_line: usize) -> Option<usize> {
        cursor_line.checked_sub(1)
    }

    /// Fold `request.text`, returning an edit only when it changed.
    pub fn format_line(
        &self,
        oracle: Option<&dyn SymbolOracle>,
        unit: &SourceId,
        request: FormatRequest<'_>,
    ) -> Option<LineEdit> {
        let style = request.style.fold_style()?;
        let folder = CaseFolder::new(oracle, self.format);
        let new_text = folder.fold_all(
            request.text,
            unit,
            style,
            request.constants_upper,
            request.variant,
        );
        if new_text == request.text {
            return None;
        }
        Some(LineEdit {
            line: request.line,
            new_text,
        })
    }

    /// Editor entry point: `typed` was just inserted and the cursor is on `cursor_line`.
    ///
    /// `line_text` looks up the current text of a line in the editor buffer.
    pub fn on_type<'t>(
        &self,
        oracle: Option<&dyn SymbolOracle>,
        unit: &SourceId,
        variant: LanguageVariant,
        typed: char,
        cursor_line: usize,
        line_text: impl FnOnce(usize) -> Option<&'t str>,
    ) -> Option<LineEdit> {
        if typed != '\n' || self.settings.on_return == FormatOnReturn::Off {
            return None;
        }
        let line = Self::line_above(cursor_line)?;
        let text = line_text(line)?;
        self.format_line(
            oracle,
            unit,
            FormatRequest {
                line,
                text,
                style: self.settings.on_return,
                constants_upper: self.settings.constants_to_uppercase,
                variant,
            },
        )
    }

    /// Fold the line above `cursor_line` of `unit` and record the result in its overlay.
    ///
    /// The folded text is the overlay entry when there is one, else the raw line, so
    /// comments and margins survive into the overlay. Columns follow the unit's own
    /// format, not the one this formatter was built with.
    pub fn format_unit(
        &self,
        unit: &mut SourceUnit,
        oracle: Option<&dyn SymbolOracle>,
        cursor_line: usize,
    ) -> Option<LineEdit> {
        let line = Self::line_above(cursor_line)?;
        let text = match unit.updated_line(line) {
            Some(updated) => updated.to_string(),
            None => unit.get_line(line, true)?,
        };
        let request = FormatRequest {
            line,
            text: &text,
            style: self.settings.on_return,
            constants_upper: self.settings.constants_to_uppercase,
            variant: unit.language(),
        };
        let dialect = CaseFormatter {
            format: unit.format(),
            ..*self
        };
        let edit = dialect.format_line(oracle, &unit.id(), request)?;
        unit.set_updated_line(edit.line, edit.new_text.clone());
        Some(edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folding::{SymbolTable, UnitSymbols};
    use crate::source::SourceOptions;

    const SOURCE: &str = "       procedure division.\n       perform main-para.\n";

    fn formatter(on_return: FormatOnReturn) -> CaseFormatter {
        CaseFormatter::new(
            FormatSettings {
                on_return,
                constants_to_uppercase: true,
            },
            FormatMode::Fixed,
        )
    }

    fn fixture() -> (SourceUnit, SymbolTable) {
        let unit = SourceUnit::from_text("/work/PROG.cbl", SOURCE, &SourceOptions::default());
        let mut table = SymbolTable::new();
        table.insert(
            &unit.id(),
            UnitSymbols {
                constants_or_variables: vec![],
                paragraphs_or_sections: vec!["MAIN-PARA".into()],
            },
        );
        (unit, table)
    }

    #[test]
    fn test_only_newline_triggers() {
        let (unit, table) = fixture();
        let lines: Vec<&str> = SOURCE.lines().collect();
        let f = formatter(FormatOnReturn::UpperCase);
        let id = unit.id();
        let oracle: Option<&dyn SymbolOracle> = Some(&table);
        assert!(f
            .on_type(oracle, &id, LanguageVariant::Cobol, 'x', 1, |i| lines.get(i).copied())
            .is_none());
        let edit = f
            .on_type(oracle, &id, LanguageVariant::Cobol, '\n', 1, |i| lines.get(i).copied())
            .unwrap();
        assert_eq!(edit.line, 0);
        assert_eq!(edit.new_text, "       PROCEDURE DIVISION.");
    }

    #[test]
    fn test_off_never_edits() {
        let (unit, table) = fixture();
        let lines: Vec<&str> = SOURCE.lines().collect();
        let f = formatter(FormatOnReturn::Off);
        assert!(f
            .on_type(Some(&table), &unit.id(), LanguageVariant::Cobol, '\n', 1, |i| lines
                .get(i)
                .copied())
            .is_none());
    }

    #[test]
    fn test_first_line_has_nothing_above() {
        assert_eq!(CaseFormatter::line_above(0), None);
        assert_eq!(CaseFormatter::line_above(3), Some(2));
    }

    #[test]
    fn test_format_unit_records_overlay() {
        let (mut unit, table) = fixture();
        let f = formatter(FormatOnReturn::CamelCase);
        let edit = f.format_unit(&mut unit, Some(&table), 2).unwrap();
        assert_eq!(edit.new_text, "       Perform Main-Para.");
        assert_eq!(unit.updated_line(1), Some("       Perform Main-Para."));
        assert_eq!(unit.get_line(1, true).unwrap(), "       perform main-para.");

        // already folded: no second edit
        assert!(f.format_unit(&mut unit, Some(&table), 2).is_none());
    }

    #[test]
    fn test_format_unit_follows_unit_format() {
        let mut unit =
            SourceUnit::from_text("/work/FREE.cbl", "move a to b.\n", &SourceOptions::default());
        unit.set_format(FormatMode::Free);
        let mut table = SymbolTable::new();
        table.insert(&unit.id(), UnitSymbols::default());

        let edit = formatter(FormatOnReturn::UpperCase)
            .format_unit(&mut unit, Some(&table), 1)
            .unwrap();

        assert_eq!(edit.new_text, "MOVE a TO b.");
    }
}
