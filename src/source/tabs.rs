//! Tab expansion
//!
//! Tabs are only expanded for measuring and displaying columns. The expanded form is
//! never written back into a unit.

use std::borrow::Cow;

/// Fixed tab width used for column measurement.
pub const TAB_SIZE: usize = 4;

/// Expands every tab to spaces, padding to the next multiple of [`TAB_SIZE`].
///
/// Columns are measured from the start of the line in characters. A line without
/// tabs is returned borrowed and unchanged.
pub fn expand_tabs(line: &str) -> Cow<'_, str> {
    if !line.contains('\t') {
        return Cow::Borrowed(line);
    }

    let mut expanded = String::with_capacity(line.len() + TAB_SIZE);
    let mut col = 0usize;
    for c in line.chars() {
        if c == '\t' {
            loop {
                expanded.push(' ');
                col += 1;
                if col % TAB_SIZE == 0 {
                    break;
                }
            }
        } else {
            expanded.push(c);
            col += 1;
        }
    }
    Cow::Owned(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_without_tabs_is_borrowed() {
        let line = "       MOVE A TO B.";
        assert!(matches!(expand_tabs(line), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tab_pads_to_next_stop() {
        assert_eq!(expand_tabs("\tX"), "    X");
        assert_eq!(expand_tabs("AB\tX"), "AB  X");
        assert_eq!(expand_tabs("ABCD\tX"), "ABCD    X");
        assert_eq!(expand_tabs("A\t\tB"), "A       B");
    }

    #[test]
    fn test_columns_count_characters_not_bytes() {
        assert_eq!(expand_tabs("é\tX"), "é   X");
    }
}
