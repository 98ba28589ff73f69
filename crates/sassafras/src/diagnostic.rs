use std::fmt;

use itertools::Itertools;
use rowan::TextRange;

use crate::syntax_kind::SyntaxKind;

/// A 1-based line and column; columns count UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl From<line_index::LineCol> for Position {
    fn from(line_col: line_index::LineCol) -> Self {
        Self::new(line_col.line + 1, line_col.col + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated url")]
    UnterminatedUrl,
    #[error("invalid escape sequence")]
    InvalidEscape,
}

/// A malformed token. The lexer keeps going after reporting one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub range: TextRange,
    pub position: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, range: TextRange, position: Position) -> Self {
        Self { kind, range, position }
    }
}

/// A grammar violation. The parser recovers locally after reporting one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {message}")]
pub struct SyntaxError {
    pub expected: Vec<SyntaxKind>,
    pub found: SyntaxKind,
    pub message: String,
    pub range: TextRange,
    pub position: Position,
}

impl SyntaxError {
    pub fn unexpected(expected: &[SyntaxKind], found: SyntaxKind, range: TextRange, position: Position) -> Self {
        let message = match expected {
            [] => format!("unexpected {found}"),
            [kind] => format!("expected {kind}, found {found}"),
            kinds => format!(
                "expected one of {}, found {found}",
                kinds.iter().map(|kind| kind.describe()).unique().join(", ")
            ),
        };
        Self { expected: expected.to_vec(), found, message, range, position }
    }

    pub fn custom(message: impl Into<String>, found: SyntaxKind, range: TextRange, position: Position) -> Self {
        Self { expected: Vec::new(), found, message: message.into(), range, position }
    }
}

/// Either kind of accumulated error, for consumers that report both.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl Diagnostic {
    pub fn range(&self) -> TextRange {
        match self {
            Diagnostic::Lex(error) => error.range,
            Diagnostic::Syntax(error) => error.range,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Diagnostic::Lex(error) => error.position,
            Diagnostic::Syntax(error) => error.position,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Diagnostic::Lex(error) => error.kind.to_string(),
            Diagnostic::Syntax(error) => error.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rowan::{TextRange, TextSize};

    use super::{Position, SyntaxError};
    use crate::syntax_kind::SyntaxKind;

    fn range() -> TextRange {
        TextRange::empty(TextSize::new(0))
    }

    #[test]
    fn syntax_error_messages() {
        let single = SyntaxError::unexpected(&[SyntaxKind::Colon], SyntaxKind::Ident, range(), Position::default());
        assert_eq!(single.message, "expected `:`, found identifier");
        assert_eq!(single.to_string(), "1:1: expected `:`, found identifier");

        let many = SyntaxError::unexpected(
            &[SyntaxKind::Semicolon, SyntaxKind::CloseBrace],
            SyntaxKind::Eof,
            range(),
            Position::new(3, 7),
        );
        assert_eq!(many.to_string(), "3:7: expected one of `;`, `}`, found end of file");
    }
}
