use rowan::TextRange;

use crate::diagnostic::Position;
use crate::syntax_kind::SyntaxKind;

/// Whitespace or a comment in front of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// A lexed token with the trivia that precedes it.
///
/// The end-of-file token carries the trailing trivia of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub range: TextRange,
    pub position: Position,
    pub leading: Vec<Trivia<'a>>,
}

impl Token<'_> {
    pub fn has_leading_trivia(&self) -> bool {
        !self.leading.is_empty()
    }

    /// Range covering the leading trivia and the token itself.
    pub fn full_range(&self) -> TextRange {
        match self.leading.first() {
            Some(first) => TextRange::new(first.range.start(), self.range.end()),
            None => self.range,
        }
    }
}

/// Concatenates trivia and token texts back into source text.
pub fn reconstruct(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        for trivia in &token.leading {
            out.push_str(trivia.text);
        }
        out.push_str(token.text);
    }
    out
}
