//! Case folding passes and the format-on-return trigger.

use cobol_source::config::FormatSettings;
use cobol_source::folding::{
    CaseFolder, FoldAction, FoldStyle, LanguageVariant, SymbolOracle, SymbolTable, UnitSymbols,
};
use cobol_source::formatter::{CaseFormatter, FormatOnReturn};
use cobol_source::source::{ContentVersion, FormatMode, SourceId, SourceOptions, SourceUnit};
use proptest::prelude::*;
use rstest::rstest;

fn unit_id() -> SourceId {
    SourceId::new("/work/PROG.cbl", ContentVersion::Digest(42))
}

fn symbols() -> UnitSymbols {
    UnitSymbols {
        constants_or_variables: vec!["MY-VAR".into(), "OTHER-VAR".into(), "WS-TOTAL".into()],
        paragraphs_or_sections: vec!["MAIN-PARA".into(), "INIT-SECTION".into()],
    }
}

fn table() -> SymbolTable {
    let mut table = SymbolTable::new();
    table.insert(&unit_id(), symbols());
    table
}

fn fold(line: &str, action: FoldAction, style: FoldStyle) -> String {
    let table = table();
    let folder = CaseFolder::new(Some(&table), FormatMode::Fixed);
    folder.fold_line(line, &unit_id(), action, style, false, LanguageVariant::Cobol)
}

#[test]
fn test_variables_pass_scenario() {
    let folded = fold(
        "       MOVE my-var TO other-var.",
        FoldAction::ConstantsOrVariables,
        FoldStyle::UpperCase,
    );
    assert_eq!(folded, "       MOVE MY-VAR TO OTHER-VAR.");
}

#[rstest]
#[case::keywords_upper(
    FoldAction::Keywords,
    FoldStyle::UpperCase,
    "       move my-var to other-var.",
    "       MOVE my-var TO other-var."
)]
#[case::keywords_camel(
    FoldAction::Keywords,
    FoldStyle::CamelCase,
    "       MOVE my-var TO other-var.",
    "       Move my-var To other-var."
)]
#[case::keywords_lower(
    FoldAction::Keywords,
    FoldStyle::LowerCase,
    "       PERFORM MAIN-PARA.",
    "       perform MAIN-PARA."
)]
#[case::targets_camel(
    FoldAction::PerformTargets,
    FoldStyle::CamelCase,
    "       perform main-para thru init-section.",
    "       perform Main-Para thru Init-Section."
)]
#[case::variables_camel(
    FoldAction::ConstantsOrVariables,
    FoldStyle::CamelCase,
    "       add 1 to ws-total.",
    "       add 1 to Ws-Total."
)]
fn test_single_pass(
    #[case] action: FoldAction,
    #[case] style: FoldStyle,
    #[case] line: &str,
    #[case] expected: &str,
) {
    assert_eq!(fold(line, action, style), expected);
}

#[test]
fn test_literals_and_inline_comments_are_untouched() {
    let line = "       display 'move my-var' my-var *> move my-var";
    let folded = fold(line, FoldAction::ConstantsOrVariables, FoldStyle::UpperCase);
    assert_eq!(folded, "       display 'move my-var' MY-VAR *> move my-var");
}

#[test]
fn test_whole_line_comments_are_untouched() {
    let line = "      * move my-var to other-var";
    assert_eq!(fold(line, FoldAction::Keywords, FoldStyle::UpperCase), line);
}

#[test]
fn test_fixed_margins_are_untouched() {
    let code = "move my-var to other-var.";
    let line = format!("move01 {}{}move", code, " ".repeat(72 - 7 - code.len()));
    let folded = fold(&line, FoldAction::Keywords, FoldStyle::UpperCase);
    assert!(folded.starts_with("move01 MOVE my-var TO other-var."));
    assert!(folded.ends_with("move"));
    assert_eq!(folded.len(), line.len());
}

#[test]
fn test_free_format_folds_from_column_one() {
    let table = table();
    let folder = CaseFolder::new(Some(&table), FormatMode::Free);
    let folded = folder.fold_line(
        "move my-var to other-var.",
        &unit_id(),
        FoldAction::Keywords,
        FoldStyle::UpperCase,
        false,
        LanguageVariant::Cobol,
    );
    assert_eq!(folded, "MOVE my-var TO other-var.");
}

#[test]
fn test_unknown_format_folds_whole_line() {
    let table = table();
    let folder = CaseFolder::new(Some(&table), FormatMode::Unknown);
    let folded = folder.fold_all(
        "move my-var to other-var.",
        &unit_id(),
        FoldStyle::UpperCase,
        false,
        LanguageVariant::Cobol,
    );
    assert_eq!(folded, "MOVE MY-VAR TO OTHER-VAR.");
}

#[test]
fn test_constants_upper_overrides_style() {
    let table = table();
    let folder = CaseFolder::new(Some(&table), FormatMode::Fixed);
    let folded = folder.fold_all(
        "       move my-var to other-var.",
        &unit_id(),
        FoldStyle::CamelCase,
        true,
        LanguageVariant::Cobol,
    );
    assert_eq!(folded, "       Move MY-VAR To OTHER-VAR.");
}

#[test]
fn test_stale_index_leaves_line_unchanged() {
    let table = table();
    let folder = CaseFolder::new(Some(&table), FormatMode::Fixed);
    let stale = SourceId::new("/work/PROG.cbl", ContentVersion::Digest(43));
    let line = "       move my-var to other-var.";
    let folded = folder.fold_all(line, &stale, FoldStyle::UpperCase, false, LanguageVariant::Cobol);
    assert_eq!(folded, line);
}

#[test]
fn test_no_oracle_leaves_line_unchanged() {
    let folder = CaseFolder::new(None, FormatMode::Fixed);
    let line = "       move my-var to other-var.";
    let folded = folder.fold_all(line, &unit_id(), FoldStyle::UpperCase, false, LanguageVariant::Cobol);
    assert_eq!(folded, line);
}

#[test]
fn test_variant_specific_keywords() {
    let table = table();
    let folder = CaseFolder::new(Some(&table), FormatMode::Fixed);
    let line = "       thread";
    let cobol = folder.fold_line(
        line,
        &unit_id(),
        FoldAction::Keywords,
        FoldStyle::UpperCase,
        false,
        LanguageVariant::Cobol,
    );
    let acu = folder.fold_line(
        line,
        &unit_id(),
        FoldAction::Keywords,
        FoldStyle::UpperCase,
        false,
        LanguageVariant::AcuCobol,
    );
    assert_eq!(cobol, line);
    assert_eq!(acu, "       THREAD");
}

#[test]
fn test_format_on_return_folds_line_above() {
    let text = "       procedure division.\n       perform main-para.\n       move my-var to other-var.\n";
    let mut unit = SourceUnit::from_text("/work/PROG.cbl", text, &SourceOptions::default());
    let mut table = SymbolTable::new();
    table.insert(&unit.id(), symbols());
    let formatter = CaseFormatter::new(
        FormatSettings {
            on_return: FormatOnReturn::UpperCase,
            constants_to_uppercase: true,
        },
        FormatMode::Fixed,
    );
    let oracle: Option<&dyn SymbolOracle> = Some(&table);

    let edit = formatter.format_unit(&mut unit, oracle, 3).unwrap();

    assert_eq!(edit.line, 2);
    assert_eq!(edit.new_text, "       MOVE MY-VAR TO OTHER-VAR.");
    assert_eq!(unit.updated_indices(), vec![2]);
    assert_eq!(unit.get_line(2, true).unwrap(), "       move my-var to other-var.");
    // nothing above the first line
    assert!(formatter.format_unit(&mut unit, oracle, 0).is_none());
}

#[test]
fn test_format_on_return_uses_editor_buffer() {
    let unit = SourceUnit::from_text("/work/PROG.cbl", "", &SourceOptions::default());
    let mut table = SymbolTable::new();
    table.insert(&unit.id(), symbols());
    let formatter = CaseFormatter::new(
        FormatSettings {
            on_return: FormatOnReturn::CamelCase,
            constants_to_uppercase: false,
        },
        FormatMode::Fixed,
    );
    let buffer = ["       perform main-para.", ""];

    let edit = formatter
        .on_type(
            Some(&table),
            &unit.id(),
            LanguageVariant::Cobol,
            '\n',
            1,
            |i| buffer.get(i).copied(),
        )
        .unwrap();

    assert_eq!(edit.line, 0);
    assert_eq!(edit.new_text, "       Perform Main-Para.");
}

const VOCABULARY: &[&str] = &[
    "move", "MOVE", "Move", "to", "my-var", "My-Var", "other-var", "perform", "main-para",
    "MAIN-PARA", "unknown-word", "'lit'", "42", ".", ",", "*> note",
];

fn style_strategy() -> impl Strategy<Value = FoldStyle> {
    prop_oneof![
        Just(FoldStyle::UpperCase),
        Just(FoldStyle::LowerCase),
        Just(FoldStyle::CamelCase),
    ]
}

proptest! {
    #[test]
    fn folding_is_idempotent(
        words in prop::collection::vec(prop::sample::select(VOCABULARY), 0..12),
        style in style_strategy(),
        constants_upper in any::<bool>(),
    ) {
        let table = table();
        let folder = CaseFolder::new(Some(&table), FormatMode::Fixed);
        let line = format!("       {}", words.join(" "));
        let once = folder.fold_all(&line, &unit_id(), style, constants_upper, LanguageVariant::Cobol);
        let twice = folder.fold_all(&once, &unit_id(), style, constants_upper, LanguageVariant::Cobol);
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn folding_preserves_length_and_letters(
        words in prop::collection::vec(prop::sample::select(VOCABULARY), 0..12),
        style in style_strategy(),
    ) {
        let table = table();
        let folder = CaseFolder::new(Some(&table), FormatMode::Fixed);
        let line = format!("       {}", words.join(" "));
        let folded = folder.fold_all(&line, &unit_id(), style, false, LanguageVariant::Cobol);
        prop_assert_eq!(folded.to_ascii_uppercase(), line.to_ascii_uppercase());
    }
}
