use rowan::Language;

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CssLanguage {
}

impl Language for CssLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::LAST as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<CssLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CssLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CssLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<CssLanguage>;
pub type SyntaxElementChildren = rowan::SyntaxElementChildren<CssLanguage>;
