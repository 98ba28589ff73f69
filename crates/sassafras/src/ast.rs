use ecow::EcoString;
use rowan::ast::AstNode;
use rowan::{NodeOrToken, TextRange};

use crate::language::{CssLanguage, SyntaxElement, SyntaxElementChildren, SyntaxNode, SyntaxToken};
use crate::separated_list::SeparatedList;
use crate::syntax_kind::SyntaxKind;
use crate::token_set::TokenSet;
use crate::visitor::{self, Visitor};

macro_rules! asts {
    () => {};
    ($name:ident; $($rest:tt)*) => {
        ast!($name);
        asts!($($rest)*);
    };
    ($name:ident $body:tt; $($rest:tt)*) => {
        ast!($name $body);
        asts!($($rest)*);
    };
}

macro_rules! ast {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            type Language = CssLanguage;

            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$name
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if node.kind() == SyntaxKind::$name {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
    ($name:ident [$($item:ident,)*]) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($item($item),)*
        }

        impl AstNode for $name {
            type Language = CssLanguage;

            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$item)|*)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$item => $item::cast(node).map(Self::$item),)*
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$item(v) => v.syntax(),)*
                }
            }
        }
    };
}

asts! {
    StyleSheet;
    Ruleset;
    RulesetBlock;
    AtRule;
    AtRulePrelude;
    AtRuleBlock;
    SelectorList;
    Selector;
    CompoundSelector;
    SelectorCombinator;
    TypeSelector;
    UniversalSelector;
    ClassSelector;
    IdSelector;
    AttributeSelector;
    PseudoSelector;
    KeyframesSelector;
    ParentSelector;
    PlaceholderSelector;
    PropertyDeclaration;
    VariableDeclaration;
    Property;
    Value;
    CommaSeparatedList;
    SemicolonSeparatedList;
    Function;
    Parameters;
    ParenthesizedExpression;
    Uri;
    Important;
    ScssVariable;
    ScssVariableDeclaration;
    ScssInterpolation;
    ScssMap;
    ScssMapEntry;
    ScssDefaultFlag;
    ScssGlobalFlag;
    ScssNestedProperties;
    LessVariable;
    LessVariableDeclaration;
    LessInterpolation;
    LessMixinCall;
    LessMixinDefinition;
    LessMixinParameters;
    LessMixinGuard;
    LessEscaping;
    LessDetachedRuleset;
    ErrorNode;
    Statement [
        Ruleset,
        AtRule,
        PropertyDeclaration,
        VariableDeclaration,
        ScssVariableDeclaration,
        ScssNestedProperties,
        LessVariableDeclaration,
        LessMixinCall,
        LessMixinDefinition,
        ErrorNode,
    ];
    Declaration [
        PropertyDeclaration,
        VariableDeclaration,
        ScssVariableDeclaration,
        LessVariableDeclaration,
    ];
    SimpleSelector [
        TypeSelector,
        UniversalSelector,
        ClassSelector,
        IdSelector,
        AttributeSelector,
        PseudoSelector,
        KeyframesSelector,
        ParentSelector,
        PlaceholderSelector,
        ScssInterpolation,
        LessInterpolation,
    ];
    Block [
        RulesetBlock,
        AtRuleBlock,
        LessDetachedRuleset,
    ];
    ValueList [
        Value,
        CommaSeparatedList,
    ];
    Variable [
        ScssVariable,
        LessVariable,
    ];
    Interpolation [
        ScssInterpolation,
        LessInterpolation,
    ];
}

/// Capabilities shared by every typed node.
pub trait CssNode: AstNode<Language = CssLanguage> {
    fn kind(&self) -> SyntaxKind {
        self.syntax().kind()
    }

    /// From the start of the first significant token to the end of the last
    /// one. Trivia at either edge is excluded.
    fn span(&self) -> TextRange {
        span(self.syntax())
    }

    /// Immediate children, tokens and nodes, in source order.
    fn children(&self) -> SyntaxElementChildren {
        self.syntax().children_with_tokens()
    }

    fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor::accept(visitor, self.syntax());
    }
}

impl<N: AstNode<Language = CssLanguage>> CssNode for N {}

pub fn span(node: &SyntaxNode) -> TextRange {
    let mut significant = node
        .descendants_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .filter(|token| !token.kind().is_trivia() && !token.kind().is_eof());
    let Some(first) = significant.next() else {
        return TextRange::empty(node.text_range().start());
    };
    let last = significant.last().unwrap_or_else(|| first.clone());
    TextRange::new(first.text_range().start(), last.text_range().end())
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .find(|token| token.kind() == kind)
}

fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .filter(|token| !token.kind().is_trivia())
}

/// Source text of the node without its first `skip` bytes.
fn text_after(node: &SyntaxNode, skip: usize) -> EcoString {
    let text = node.text().to_string();
    EcoString::from(text.get(skip..).unwrap_or_default())
}

fn unquote(text: &str) -> &str {
    let quoted = text.len() >= 2
        && (text.starts_with('"') && text.ends_with('"') || text.starts_with('\'') && text.ends_with('\''));
    if quoted {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

impl StyleSheet {
    pub fn statements(&self) -> impl Iterator<Item = Statement> {
        self.0.children().filter_map(Statement::cast)
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Statement> {
        self.syntax().children().filter_map(Statement::cast)
    }

    pub fn is_closed(&self) -> bool {
        token(self.syntax(), SyntaxKind::CloseBrace).is_some()
    }
}

impl Ruleset {
    pub fn selectors(&self) -> Option<SelectorList> {
        self.0.children().find_map(SelectorList::cast)
    }

    pub fn guard(&self) -> Option<LessMixinGuard> {
        self.0.children().find_map(LessMixinGuard::cast)
    }

    pub fn block(&self) -> Option<RulesetBlock> {
        self.0.children().find_map(RulesetBlock::cast)
    }
}

impl RulesetBlock {
    pub fn statements(&self) -> impl Iterator<Item = Statement> {
        self.0.children().filter_map(Statement::cast)
    }
}

impl AtRuleBlock {
    pub fn statements(&self) -> impl Iterator<Item = Statement> {
        self.0.children().filter_map(Statement::cast)
    }
}

impl LessDetachedRuleset {
    pub fn statements(&self) -> impl Iterator<Item = Statement> {
        self.0.children().filter_map(Statement::cast)
    }
}

impl AtRule {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::AtKeyword)
    }

    /// The rule name without `@`, as written.
    pub fn name(&self) -> Option<EcoString> {
        let keyword = self.keyword()?;
        Some(EcoString::from(&keyword.text()[1..]))
    }

    pub fn prelude(&self) -> Option<AtRulePrelude> {
        self.0.children().find_map(AtRulePrelude::cast)
    }

    pub fn block(&self) -> Option<AtRuleBlock> {
        self.0.children().find_map(AtRuleBlock::cast)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Semicolon)
    }
}

impl AtRulePrelude {
    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }
}

impl SelectorList {
    pub fn selectors(&self) -> impl Iterator<Item = Selector> {
        self.0.children().filter_map(Selector::cast)
    }

    pub fn separated(&self) -> SeparatedList<Selector> {
        SeparatedList::from_node(&self.0, TokenSet::new(&[SyntaxKind::Comma]))
    }
}

impl Selector {
    pub fn compounds(&self) -> impl Iterator<Item = CompoundSelector> {
        self.0.children().filter_map(CompoundSelector::cast)
    }

    pub fn combinators(&self) -> impl Iterator<Item = SelectorCombinator> {
        self.0.children().filter_map(SelectorCombinator::cast)
    }

    pub fn keyframe(&self) -> Option<KeyframesSelector> {
        self.0.children().find_map(KeyframesSelector::cast)
    }
}

impl CompoundSelector {
    pub fn simple_selectors(&self) -> impl Iterator<Item = SimpleSelector> {
        self.0.children().filter_map(SimpleSelector::cast)
    }
}

impl SelectorCombinator {
    /// `>`, `+`, `~` or `>>>`.
    pub fn operator(&self) -> EcoString {
        let operator: String = significant_tokens(&self.0).map(|token| token.text().to_string()).collect();
        EcoString::from(operator)
    }
}

impl TypeSelector {
    pub fn name(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0).filter(|token| token.kind() == SyntaxKind::Ident).last()
    }

    pub fn namespace(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Pipe)?;
        significant_tokens(&self.0)
            .take_while(|token| token.kind() != SyntaxKind::Pipe)
            .last()
    }
}

impl UniversalSelector {
    pub fn namespace(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Pipe)?;
        significant_tokens(&self.0).next()
    }
}

impl ClassSelector {
    /// The class name without the leading `.`.
    pub fn name(&self) -> EcoString {
        text_after(&self.0, 1)
    }
}

impl IdSelector {
    /// The id without the leading `#`.
    pub fn name(&self) -> EcoString {
        text_after(&self.0, 1)
    }
}

impl AttributeSelector {
    pub fn name(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0).find(|token| token.kind() == SyntaxKind::Ident)
    }

    pub fn matcher(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0).find(|token| {
            matches!(
                token.kind(),
                SyntaxKind::Eq
                    | SyntaxKind::IncludeMatch
                    | SyntaxKind::DashMatch
                    | SyntaxKind::PrefixMatch
                    | SyntaxKind::SuffixMatch
                    | SyntaxKind::SubstringMatch
            )
        })
    }

    /// The compared value, unquoted.
    pub fn value(&self) -> Option<EcoString> {
        let matcher = self.matcher()?;
        let value = self
            .0
            .children_with_tokens()
            .skip_while(|element| element.as_token() != Some(&matcher))
            .skip(1)
            .find(|element| !element.kind().is_trivia())?;
        let text = match value {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        };
        Some(EcoString::from(unquote(&text)))
    }
}

impl PseudoSelector {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    /// `::before` rather than `:hover`.
    pub fn is_element(&self) -> bool {
        significant_tokens(&self.0).take_while(|token| token.kind() == SyntaxKind::Colon).count() == 2
    }

    /// The argument of `:not(…)` and friends.
    pub fn selectors(&self) -> Option<SelectorList> {
        self.0.children().find_map(SelectorList::cast)
    }

    /// The argument of `:nth-child(…)` and friends.
    pub fn arguments(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }
}

impl KeyframesSelector {
    pub fn token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0).next()
    }
}

impl ParentSelector {
    /// `-item` in `&-item`.
    pub fn suffix(&self) -> Option<EcoString> {
        let suffix = text_after(&self.0, 1);
        (!suffix.is_empty()).then_some(suffix)
    }
}

impl PlaceholderSelector {
    /// The placeholder name without the leading `%`.
    pub fn name(&self) -> EcoString {
        text_after(&self.0, 1)
    }
}

impl Declaration {
    pub fn value(&self) -> Option<ValueList> {
        self.syntax().children().find_map(ValueList::cast)
    }

    pub fn important(&self) -> Option<Important> {
        self.syntax().children().find_map(Important::cast)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token(self.syntax(), SyntaxKind::Semicolon)
    }
}

impl PropertyDeclaration {
    pub fn property(&self) -> Option<Property> {
        self.0.children().find_map(Property::cast)
    }

    pub fn colon(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Colon)
    }

    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }

    pub fn important(&self) -> Option<Important> {
        self.0.children().find_map(Important::cast)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Semicolon)
    }
}

impl VariableDeclaration {
    pub fn property(&self) -> Option<Property> {
        self.0.children().find_map(Property::cast)
    }

    /// The raw tokens after the colon.
    pub fn value(&self) -> Option<Value> {
        self.0.children().find_map(Value::cast)
    }

    pub fn important(&self) -> Option<Important> {
        self.0.children().find_map(Important::cast)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Semicolon)
    }
}

impl Property {
    pub fn name(&self) -> EcoString {
        EcoString::from(self.0.text().to_string())
    }

    /// Whether the name is built from interpolations.
    pub fn is_interpolated(&self) -> bool {
        self.0.children().any(|node| Interpolation::can_cast(node.kind()))
    }
}

impl Value {
    /// Tokens and nodes of the value, without trivia.
    pub fn terms(&self) -> impl Iterator<Item = SyntaxElement> {
        self.0
            .children_with_tokens()
            .filter(|element| !element.kind().is_trivia())
    }
}

impl ValueList {
    /// The comma separated values; a single value is a list of one.
    pub fn values(&self) -> SeparatedList<Value> {
        match self {
            ValueList::Value(value) => SeparatedList::from_parts(vec![value.clone()], Vec::new()),
            ValueList::CommaSeparatedList(list) => list.separated(),
        }
    }
}

impl CommaSeparatedList {
    pub fn values(&self) -> impl Iterator<Item = Value> {
        self.0.children().filter_map(Value::cast)
    }

    pub fn separated(&self) -> SeparatedList<Value> {
        SeparatedList::from_node(&self.0, TokenSet::new(&[SyntaxKind::Comma]))
    }
}

impl SemicolonSeparatedList {
    pub fn separated(&self) -> SeparatedList<ValueList> {
        SeparatedList::from_node(&self.0, TokenSet::new(&[SyntaxKind::Semicolon]))
    }
}

impl Function {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn parameters(&self) -> Option<Parameters> {
        self.0.children().find_map(Parameters::cast)
    }
}

impl Parameters {
    pub fn arguments(&self) -> SeparatedList<Value> {
        SeparatedList::from_node(&self.0, TokenSet::new(&[SyntaxKind::Comma]))
    }
}

impl ParenthesizedExpression {
    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }
}

impl Uri {
    /// The referenced location, without `url(`, quotes or padding.
    pub fn location(&self) -> Option<EcoString> {
        if let Some(url) = token(&self.0, SyntaxKind::Url) {
            let text = url.text();
            let inner = text.get(4..text.len().saturating_sub(1)).unwrap_or_default();
            return Some(EcoString::from(inner.trim()));
        }
        let value = self.0.children().find_map(Value::cast)?;
        Some(EcoString::from(unquote(value.syntax().text().to_string().trim())))
    }
}

impl Variable {
    /// The name without sigils.
    pub fn name(&self) -> Option<EcoString> {
        let ident = significant_tokens(self.syntax()).find(|token| token.kind() == SyntaxKind::Ident)?;
        Some(EcoString::from(ident.text()))
    }
}

impl ScssVariable {
    pub fn name(&self) -> Option<EcoString> {
        Variable::ScssVariable(self.clone()).name()
    }
}

impl LessVariable {
    pub fn name(&self) -> Option<EcoString> {
        Variable::LessVariable(self.clone()).name()
    }

    /// `@@name` reads the variable named by the value of `@name`.
    pub fn is_indirect(&self) -> bool {
        significant_tokens(&self.0).filter(|token| token.kind() == SyntaxKind::At).count() == 2
    }
}

impl ScssVariableDeclaration {
    pub fn variable(&self) -> Option<ScssVariable> {
        self.0.children().find_map(ScssVariable::cast)
    }

    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }

    pub fn default_flag(&self) -> Option<ScssDefaultFlag> {
        self.0.children().find_map(ScssDefaultFlag::cast)
    }

    pub fn global_flag(&self) -> Option<ScssGlobalFlag> {
        self.0.children().find_map(ScssGlobalFlag::cast)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Semicolon)
    }
}

impl ScssInterpolation {
    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }
}

impl ScssMap {
    pub fn entries(&self) -> SeparatedList<ScssMapEntry> {
        SeparatedList::from_node(&self.0, TokenSet::new(&[SyntaxKind::Comma]))
    }
}

impl ScssMapEntry {
    pub fn key(&self) -> Option<Value> {
        self.0.children().find_map(Value::cast)
    }

    pub fn value(&self) -> Option<Value> {
        self.0.children().filter_map(Value::cast).nth(1)
    }
}

impl ScssNestedProperties {
    pub fn property(&self) -> Option<Property> {
        self.0.children().find_map(Property::cast)
    }

    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }

    pub fn block(&self) -> Option<RulesetBlock> {
        self.0.children().find_map(RulesetBlock::cast)
    }
}

impl LessVariableDeclaration {
    pub fn variable(&self) -> Option<LessVariable> {
        self.0.children().find_map(LessVariable::cast)
    }

    pub fn value(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }

    pub fn detached_ruleset(&self) -> Option<LessDetachedRuleset> {
        self.0.children().find_map(LessDetachedRuleset::cast)
    }

    pub fn important(&self) -> Option<Important> {
        self.0.children().find_map(Important::cast)
    }
}

impl LessInterpolation {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }
}

impl LessMixinCall {
    /// The called mixin, e.g. `#ns > .mixin`. Absent for detached ruleset
    /// calls.
    pub fn selector(&self) -> Option<Selector> {
        self.0.children().find_map(Selector::cast)
    }

    pub fn variable(&self) -> Option<LessVariable> {
        self.0.children().find_map(LessVariable::cast)
    }

    pub fn parameters(&self) -> Option<LessMixinParameters> {
        self.0.children().find_map(LessMixinParameters::cast)
    }

    pub fn important(&self) -> Option<Important> {
        self.0.children().find_map(Important::cast)
    }
}

impl LessMixinDefinition {
    pub fn selector(&self) -> Option<Selector> {
        self.0.children().find_map(Selector::cast)
    }

    pub fn parameters(&self) -> Option<LessMixinParameters> {
        self.0.children().find_map(LessMixinParameters::cast)
    }

    pub fn guard(&self) -> Option<LessMixinGuard> {
        self.0.children().find_map(LessMixinGuard::cast)
    }

    pub fn block(&self) -> Option<RulesetBlock> {
        self.0.children().find_map(RulesetBlock::cast)
    }
}

impl LessMixinParameters {
    /// Arguments separated by `;`, or by `,` when no `;` is present.
    pub fn arguments(&self) -> SeparatedList<ValueList> {
        match self.0.children().find_map(SemicolonSeparatedList::cast) {
            Some(list) => list.separated(),
            None => match self.0.children().find_map(ValueList::cast) {
                Some(ValueList::CommaSeparatedList(list)) => {
                    let separated = list.separated();
                    let separators = separated.separators().to_vec();
                    let values = separated.into_values().into_iter().map(ValueList::Value).collect();
                    SeparatedList::from_parts(values, separators)
                }
                Some(value) => SeparatedList::from_parts(vec![value], Vec::new()),
                None => SeparatedList::from_parts(Vec::new(), Vec::new()),
            },
        }
    }
}

impl LessMixinGuard {
    pub fn condition(&self) -> Option<ValueList> {
        self.0.children().find_map(ValueList::cast)
    }
}

impl LessEscaping {
    /// The escaped string without quotes.
    pub fn content(&self) -> Option<EcoString> {
        let string = token(&self.0, SyntaxKind::String)?;
        Some(EcoString::from(unquote(string.text())))
    }
}

impl ErrorNode {
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.0
            .descendants_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .filter(|token| !token.kind().is_trivia())
    }
}
