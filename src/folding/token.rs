//! Token definitions for case folding
//!
//! The code region of a line is split with a logos lexer. Only [`FoldToken::Word`]
//! tokens are ever rewritten; literals and `*>` comments pass through untouched.
//! Words are runs of letters, digits, hyphens and underscores starting with a letter
//! or digit, so `MY-VAR` and `1ST-PARA` are single words.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldToken {
    #[regex(r"[A-Za-z0-9][A-Za-z0-9_-]*")]
    Word,

    // Unterminated literals run to the end of the line
    #[regex(r#""[^"\n]*"?"#)]
    #[regex(r"'[^'\n]*'?")]
    Literal,

    #[regex(r"\*>[^\n]*")]
    Comment,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r#"[^A-Za-z0-9 \t"'\n]"#)]
    Punct,
}

impl FoldToken {
    /// Whether the token may be rewritten.
    pub fn is_word(self) -> bool {
        matches!(self, FoldToken::Word)
    }
}

/// Split `code` into tokens with their byte ranges.
///
/// The ranges cover the input exactly; anything the lexer rejects is kept as
/// punctuation so no text is lost.
pub fn tokenize(code: &str) -> Vec<(FoldToken, Range<usize>)> {
    let mut lexer = FoldToken::lexer(code);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let token = result.unwrap_or(FoldToken::Punct);
        tokens.push((token, lexer.span()));
    }
    tokens
}
