use std::fmt;

use crate::dialect::Dialect;

/// Every token and node kind of the tree.
///
/// Token kinds come first: [`TokenSet`](crate::token_set::TokenSet) stores
/// them as bits of a `u128`, so there must never be more than 128 of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // trivia
    Whitespace,
    Comment,
    LineComment,

    // literals
    Ident,
    AtKeyword,
    Hash,
    String,
    Url,
    Number,
    Percentage,
    Dimension,

    // punctuation
    Colon,
    Semicolon,
    Comma,
    Dot,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Gt,
    Lt,
    Plus,
    Minus,
    Tilde,
    Star,
    Slash,
    Eq,
    Pipe,
    Ampersand,
    Bang,
    IncludeMatch,
    DashMatch,
    PrefixMatch,
    SuffixMatch,
    SubstringMatch,

    // dialect sigils
    Dollar,
    Percent,
    HashBrace,
    At,
    AtBrace,

    Delim,
    Error,
    Eof,

    // nodes
    StyleSheet,
    Ruleset,
    RulesetBlock,
    AtRule,
    AtRulePrelude,
    AtRuleBlock,
    SelectorList,
    Selector,
    CompoundSelector,
    SelectorCombinator,
    TypeSelector,
    UniversalSelector,
    ClassSelector,
    IdSelector,
    AttributeSelector,
    PseudoSelector,
    KeyframesSelector,
    ParentSelector,
    PlaceholderSelector,
    PropertyDeclaration,
    VariableDeclaration,
    Property,
    Value,
    CommaSeparatedList,
    SemicolonSeparatedList,
    Function,
    Parameters,
    ParenthesizedExpression,
    Uri,
    Important,
    ScssVariable,
    ScssVariableDeclaration,
    ScssInterpolation,
    ScssMap,
    ScssMapEntry,
    ScssDefaultFlag,
    ScssGlobalFlag,
    ScssNestedProperties,
    LessVariable,
    LessVariableDeclaration,
    LessInterpolation,
    LessMixinCall,
    LessMixinDefinition,
    LessMixinParameters,
    LessMixinGuard,
    LessEscaping,
    LessDetachedRuleset,
    ErrorNode,
}

impl SyntaxKind {
    pub const LAST: SyntaxKind = SyntaxKind::ErrorNode;

    pub fn is_eof(self) -> bool {
        self == Self::Eof
    }

    pub fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::ErrorNode)
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment | SyntaxKind::LineComment)
    }

    pub fn is_token(self) -> bool {
        self <= SyntaxKind::Eof
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Whether a tree built for `dialect` may contain this kind.
    pub fn allowed_in(self, dialect: Dialect) -> bool {
        use SyntaxKind::*;
        match self {
            Dollar | HashBrace | ScssVariable | ScssVariableDeclaration | ScssInterpolation
            | PlaceholderSelector | ScssMap | ScssMapEntry | ScssDefaultFlag | ScssGlobalFlag
            | ScssNestedProperties => dialect == Dialect::Scss,
            At | AtBrace | LessVariable | LessVariableDeclaration | LessInterpolation
            | LessMixinCall | LessMixinDefinition | LessMixinParameters | LessMixinGuard
            | LessEscaping | LessDetachedRuleset | SemicolonSeparatedList => dialect == Dialect::Less,
            LineComment | Percent | ParentSelector => dialect != Dialect::Css,
            _ => true,
        }
    }

    /// Human readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        use SyntaxKind::*;
        match self {
            Whitespace => "whitespace",
            Comment | LineComment => "comment",
            Ident => "identifier",
            AtKeyword => "at-keyword",
            Hash => "hash",
            String => "string",
            Url => "url",
            Number => "number",
            Percentage => "percentage",
            Dimension => "dimension",
            Colon => "`:`",
            Semicolon => "`;`",
            Comma => "`,`",
            Dot => "`.`",
            OpenBrace => "`{`",
            CloseBrace => "`}`",
            OpenParen => "`(`",
            CloseParen => "`)`",
            OpenBracket => "`[`",
            CloseBracket => "`]`",
            Gt => "`>`",
            Lt => "`<`",
            Plus => "`+`",
            Minus => "`-`",
            Tilde => "`~`",
            Star => "`*`",
            Slash => "`/`",
            Eq => "`=`",
            Pipe => "`|`",
            Ampersand => "`&`",
            Bang => "`!`",
            IncludeMatch => "`~=`",
            DashMatch => "`|=`",
            PrefixMatch => "`^=`",
            SuffixMatch => "`$=`",
            SubstringMatch => "`*=`",
            Dollar => "`$`",
            Percent => "`%`",
            HashBrace => "`#{`",
            At => "`@`",
            AtBrace => "`@{`",
            Delim => "delimiter",
            Error => "invalid token",
            Eof => "end of file",
            StyleSheet => "stylesheet",
            Ruleset => "ruleset",
            RulesetBlock | AtRuleBlock | LessDetachedRuleset => "block",
            AtRule => "at-rule",
            AtRulePrelude => "at-rule prelude",
            SelectorList | Selector | CompoundSelector => "selector",
            SelectorCombinator => "combinator",
            TypeSelector | UniversalSelector | ClassSelector | IdSelector | AttributeSelector
            | PseudoSelector | KeyframesSelector | ParentSelector | PlaceholderSelector => "simple selector",
            PropertyDeclaration | VariableDeclaration | ScssVariableDeclaration
            | LessVariableDeclaration | ScssNestedProperties => "declaration",
            Property => "property",
            Value | CommaSeparatedList | SemicolonSeparatedList | ParenthesizedExpression | ScssMap => "value",
            ScssMapEntry => "map entry",
            Function => "function",
            Parameters | LessMixinParameters => "parameters",
            Uri => "uri",
            Important | ScssDefaultFlag | ScssGlobalFlag => "flag",
            ScssVariable | LessVariable => "variable",
            ScssInterpolation | LessInterpolation => "interpolation",
            LessMixinCall => "mixin call",
            LessMixinDefinition => "mixin definition",
            LessMixinGuard => "guard",
            LessEscaping => "escaped string",
            ErrorNode => "error",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::SyntaxKind;
    use crate::dialect::Dialect;

    #[test]
    fn token_kinds_fit_in_a_token_set() {
        assert!((SyntaxKind::Eof as u16) < 128);
    }

    #[test]
    fn dialect_specific_kinds() {
        assert!(SyntaxKind::PlaceholderSelector.allowed_in(Dialect::Scss));
        assert!(!SyntaxKind::PlaceholderSelector.allowed_in(Dialect::Css));
        assert!(!SyntaxKind::PlaceholderSelector.allowed_in(Dialect::Less));
        assert!(SyntaxKind::LessMixinCall.allowed_in(Dialect::Less));
        assert!(!SyntaxKind::LessMixinCall.allowed_in(Dialect::Scss));
        assert!(SyntaxKind::ParentSelector.allowed_in(Dialect::Less));
        assert!(!SyntaxKind::ParentSelector.allowed_in(Dialect::Css));
        assert!(SyntaxKind::Ruleset.allowed_in(Dialect::Css));
    }
}
