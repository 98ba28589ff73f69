use crate::grammar::values::{self, Terms};
use crate::grammar::{less, ruleset_body, scss};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::token_set::TokenSet;

pub(crate) const KEYFRAME_SELECTOR_START: TokenSet = TokenSet::new(&[SyntaxKind::Ident, SyntaxKind::Percentage]);

const COMBINATORS: TokenSet = TokenSet::new(&[SyntaxKind::Gt, SyntaxKind::Plus, SyntaxKind::Tilde]);

const ATTRIBUTE_MATCHERS: TokenSet = TokenSet::new(&[
    SyntaxKind::Eq,
    SyntaxKind::IncludeMatch,
    SyntaxKind::DashMatch,
    SyntaxKind::PrefixMatch,
    SyntaxKind::SuffixMatch,
    SyntaxKind::SubstringMatch,
]);

/// Functional pseudo-classes whose argument is a selector list.
const SELECTOR_PSEUDOS: &[&str] = &[
    "any", "current", "deep", "extend", "future", "global", "has", "host", "host-context", "is",
    "local", "matches", "not", "past", "slotted", "where",
];

pub(crate) fn selector_list(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    if selector(p).is_none() {
        m.abandon(p);
        return None;
    }
    while p.eat(SyntaxKind::Comma) {
        if selector(p).is_none() {
            p.error_message(format!("expected selector, found {}", p.current()));
            break;
        }
    }
    Some(m.complete(p, SyntaxKind::SelectorList))
}

/// Compound selectors and combinators. Whitespace between two compounds is
/// the descendant combinator and stays trivia.
pub(crate) fn selector(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let mut parsed = false;
    loop {
        if p.at_set(COMBINATORS) {
            combinator(p);
            if !at_compound_start(p) {
                p.error_message(format!("expected selector after combinator, found {}", p.current()));
            }
        } else if at_compound_start(p) && !(parsed && p.is_less() && p.at_word("when")) {
            compound_selector(p);
        } else {
            break;
        }
        parsed = true;
    }
    if !parsed {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::Selector))
}

fn combinator(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let kind = p.current();
    p.bump();
    // `>>>`
    while kind == SyntaxKind::Gt && p.at(SyntaxKind::Gt) && p.nth_joined(0) {
        p.bump();
    }
    m.complete(p, SyntaxKind::SelectorCombinator)
}

fn at_compound_start(p: &Parser<'_>) -> bool {
    match p.current() {
        SyntaxKind::Ident
        | SyntaxKind::Star
        | SyntaxKind::Pipe
        | SyntaxKind::Dot
        | SyntaxKind::Hash
        | SyntaxKind::OpenBracket
        | SyntaxKind::Colon => true,
        SyntaxKind::Ampersand => p.dialect().is_preprocessor(),
        SyntaxKind::Percent | SyntaxKind::HashBrace => p.is_scss(),
        SyntaxKind::AtBrace => p.is_less(),
        _ => false,
    }
}

/// Simple selectors with no trivia between them.
fn compound_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let mut first = true;
    while (first || p.nth_joined(0)) && simple_selector(p) {
        first = false;
    }
    m.complete(p, SyntaxKind::CompoundSelector)
}

fn simple_selector(p: &mut Parser<'_>) -> bool {
    match p.current() {
        SyntaxKind::Ident | SyntaxKind::Pipe => {
            type_selector(p);
        }
        SyntaxKind::Star => {
            universal_selector(p);
        }
        SyntaxKind::Dot => {
            class_selector(p);
        }
        SyntaxKind::Hash => {
            id_selector(p);
        }
        SyntaxKind::OpenBracket => {
            attribute_selector(p);
        }
        SyntaxKind::Colon => {
            pseudo_selector(p);
        }
        SyntaxKind::Ampersand if p.dialect().is_preprocessor() => {
            parent_selector(p);
        }
        SyntaxKind::Percent if p.is_scss() => {
            placeholder_selector(p);
        }
        SyntaxKind::HashBrace if p.is_scss() => {
            scss::interpolation(p);
        }
        SyntaxKind::AtBrace if p.is_less() => {
            less::interpolation(p);
        }
        _ => return false,
    }
    true
}

/// Joined identifiers and interpolations continuing a name.
fn name_parts(p: &mut Parser<'_>) -> usize {
    let mut count = 0;
    while p.nth_joined(0) {
        match p.current() {
            SyntaxKind::Ident => p.bump(),
            SyntaxKind::HashBrace if p.is_scss() => {
                scss::interpolation(p);
            }
            SyntaxKind::AtBrace if p.is_less() => {
                less::interpolation(p);
            }
            _ => break,
        }
        count += 1;
    }
    count
}

/// `ns|name` namespace suffix, shared by type and universal selectors.
fn namespace_suffix(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::Pipe)
        && p.nth_joined(0)
        && (p.nth_at(1, SyntaxKind::Ident) || p.nth_at(1, SyntaxKind::Star))
        && p.nth_joined(1)
    {
        p.bump();
        p.bump();
    }
}

fn type_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.eat(SyntaxKind::Pipe) {
        p.expect(SyntaxKind::Ident);
    } else {
        p.assert(SyntaxKind::Ident);
        namespace_suffix(p);
    }
    m.complete(p, SyntaxKind::TypeSelector)
}

fn universal_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Star);
    namespace_suffix(p);
    m.complete(p, SyntaxKind::UniversalSelector)
}

fn class_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Dot);
    if name_parts(p) == 0 {
        p.error(&[SyntaxKind::Ident]);
    }
    m.complete(p, SyntaxKind::ClassSelector)
}

fn id_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Hash);
    name_parts(p);
    m.complete(p, SyntaxKind::IdSelector)
}

/// `[ns|name op value i]`
fn attribute_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::OpenBracket);
    match p.current() {
        SyntaxKind::Ident | SyntaxKind::Star if p.nth_at(1, SyntaxKind::Pipe) => {
            p.bump();
            p.bump();
            p.expect(SyntaxKind::Ident);
        }
        SyntaxKind::Pipe => {
            p.bump();
            p.expect(SyntaxKind::Ident);
        }
        SyntaxKind::Ident => p.bump(),
        SyntaxKind::HashBrace if p.is_scss() => {
            scss::interpolation(p);
        }
        SyntaxKind::AtBrace if p.is_less() => {
            less::interpolation(p);
        }
        _ => p.error(&[SyntaxKind::Ident]),
    }
    if p.at_set(ATTRIBUTE_MATCHERS) {
        p.bump();
        match p.current() {
            SyntaxKind::Ident | SyntaxKind::String | SyntaxKind::Number => p.bump(),
            SyntaxKind::HashBrace if p.is_scss() => {
                scss::interpolation(p);
            }
            SyntaxKind::Dollar if p.is_scss() => {
                scss::variable(p);
            }
            SyntaxKind::At if p.is_less() => {
                less::variable(p);
            }
            SyntaxKind::AtBrace if p.is_less() => {
                less::interpolation(p);
            }
            _ => p.error(&[SyntaxKind::Ident, SyntaxKind::String]),
        }
        if p.at(SyntaxKind::Ident) {
            p.bump();
        }
    }
    if !p.eat(SyntaxKind::CloseBracket) {
        p.error(&[SyntaxKind::CloseBracket]);
        p.recover(
            TokenSet::new(&[SyntaxKind::CloseBracket, SyntaxKind::OpenBrace, SyntaxKind::Comma]),
            TokenSet::EMPTY,
        );
        p.eat(SyntaxKind::CloseBracket);
    }
    m.complete(p, SyntaxKind::AttributeSelector)
}

/// `:name`, `::name`, `:name(arguments)`.
fn pseudo_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Colon);
    if p.at(SyntaxKind::Colon) && p.nth_joined(0) {
        p.bump();
    }
    if !p.nth_joined(0) {
        p.error(&[SyntaxKind::Ident]);
        return m.complete(p, SyntaxKind::PseudoSelector);
    }
    match p.current() {
        SyntaxKind::Ident if p.nth_at(1, SyntaxKind::OpenParen) && p.nth_joined(1) => {
            if !p.enter() {
                return m.complete(p, SyntaxKind::PseudoSelector);
            }
            let takes_selector = SELECTOR_PSEUDOS.contains(&unprefixed(p.current_text()).as_str());
            p.bump();
            p.bump();
            if takes_selector {
                selector_list(p);
            } else {
                values::value_list(p, Terms::Arguments);
            }
            p.expect(SyntaxKind::CloseParen);
            p.exit();
        }
        SyntaxKind::Ident => {
            p.bump();
            name_parts(p);
        }
        SyntaxKind::HashBrace if p.is_scss() => {
            name_parts(p);
        }
        SyntaxKind::AtBrace if p.is_less() => {
            name_parts(p);
        }
        _ => p.error(&[SyntaxKind::Ident]),
    }
    m.complete(p, SyntaxKind::PseudoSelector)
}

fn unprefixed(name: &str) -> String {
    let name = name.to_ascii_lowercase();
    match name.strip_prefix('-').and_then(|rest| rest.split_once('-')) {
        Some((_, rest)) => rest.to_string(),
        None => name,
    }
}

/// `&`, optionally with a suffix: `&-item`, `&__element`.
fn parent_selector(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Ampersand);
    name_parts(p);
    m.complete(p, SyntaxKind::ParentSelector)
}

/// `%name`. Only SCSS has placeholder selectors.
pub(crate) fn placeholder_selector(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !p.at(SyntaxKind::Percent) {
        return None;
    }
    if !p.is_scss() {
        p.error_message(format!("placeholder selectors are not supported in {}", p.dialect()));
        return None;
    }
    let m = p.start();
    p.bump();
    if name_parts(p) == 0 {
        p.error(&[SyntaxKind::Ident]);
    }
    Some(m.complete(p, SyntaxKind::PlaceholderSelector))
}

/// `from, 50% { … }` inside `@keyframes`.
pub(crate) fn keyframes_ruleset(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let list = p.start();
    loop {
        let selector = p.start();
        let keyframe = p.start();
        p.bump();
        keyframe.complete(p, SyntaxKind::KeyframesSelector);
        selector.complete(p, SyntaxKind::Selector);
        if !p.eat(SyntaxKind::Comma) {
            break;
        }
        if !p.at_set(KEYFRAME_SELECTOR_START) {
            p.error(&[SyntaxKind::Ident, SyntaxKind::Percentage]);
            break;
        }
    }
    list.complete(p, SyntaxKind::SelectorList);
    ruleset_body(p);
    m.complete(p, SyntaxKind::Ruleset)
}
