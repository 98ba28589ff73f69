use crate::syntax_kind::SyntaxKind;

/// A set of token kinds, one bit per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut mask = 0_u128;
        let mut i = 0;
        while i < kinds.len() {
            assert!((kinds[i] as u16) < 128, "only token kinds can be put in a TokenSet");
            mask |= 1_u128 << (kinds[i] as u16);
            i += 1;
        }
        TokenSet(mask)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, kind: SyntaxKind) -> bool {
        let bit = kind as u16;
        bit < 128 && self.0 >> bit & 1 == 1
    }
}
