mod at_rules;
mod declarations;
mod less;
mod scss;
mod selectors;
mod values;

use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::token_set::TokenSet;

/// The production a parse starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    StyleSheet,
    Statement,
    Declaration,
    SelectorList,
    Selector,
    PlaceholderSelector,
    Value,
    CommaSeparatedList,
}

const STATEMENT_END: TokenSet = TokenSet::new(&[SyntaxKind::Semicolon, SyntaxKind::CloseBrace]);

pub fn entry(p: &mut Parser<'_>, entry: Entry) {
    if entry == Entry::StyleSheet {
        stylesheet(p);
        return;
    }
    let m = p.start();
    if !p.nth_joined(0) {
        p.error_message(format!("{} must start at the beginning of the input", describe(entry)));
    }
    let parsed = match entry {
        Entry::StyleSheet => unreachable!(),
        Entry::Statement => {
            statement(p, true);
            true
        }
        Entry::Declaration => declarations::declaration(p).is_some(),
        Entry::SelectorList => selectors::selector_list(p).is_some(),
        Entry::Selector => selectors::selector(p).is_some(),
        Entry::PlaceholderSelector => selectors::placeholder_selector(p).is_some(),
        Entry::Value => values::value(p, values::Terms::Declaration).is_some(),
        Entry::CommaSeparatedList => values::comma_separated_list(p, values::Terms::Declaration).is_some(),
    };
    if !parsed {
        p.error_message(format!("expected {}", describe(entry)));
    }
    if !p.at_end() {
        p.error_message(format!("expected end of input after {}", describe(entry)));
        p.recover(TokenSet::EMPTY, TokenSet::EMPTY);
    }
    p.bump_eof();
    m.complete(p, SyntaxKind::StyleSheet);
}

fn describe(entry: Entry) -> &'static str {
    match entry {
        Entry::StyleSheet => "stylesheet",
        Entry::Statement => "statement",
        Entry::Declaration => "declaration",
        Entry::SelectorList => "selector list",
        Entry::Selector => "selector",
        Entry::PlaceholderSelector => "placeholder selector",
        Entry::Value => "value",
        Entry::CommaSeparatedList => "comma separated list",
    }
}

pub(crate) fn stylesheet(p: &mut Parser<'_>) {
    let m = p.start();
    while !p.at_end() {
        let before = p.position();
        if p.at(SyntaxKind::CloseBrace) {
            p.bump_error();
        } else {
            statement(p, false);
        }
        guard_progress(p, before);
    }
    p.bump_eof();
    m.complete(p, SyntaxKind::StyleSheet);
}

/// One item of a stylesheet or of a block. Declarations are only tried
/// inside blocks.
pub(crate) fn statement(p: &mut Parser<'_>, in_block: bool) {
    match p.current() {
        SyntaxKind::Semicolon => p.bump(),
        SyntaxKind::AtKeyword => {
            at_rules::at_rule(p);
        }
        SyntaxKind::Dollar if p.is_scss() && p.nth_at(1, SyntaxKind::Ident) && p.nth_joined(1) => {
            scss::variable_declaration(p);
        }
        SyntaxKind::At if p.is_less() => less::at_statement(p, in_block),
        SyntaxKind::Dot | SyntaxKind::Hash if p.is_less() => less::mixin_or_ruleset(p),
        _ if in_block => declarations::declaration_or_ruleset(p),
        _ => {
            ruleset(p);
        }
    }
}

pub(crate) fn ruleset(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if selectors::selector_list(p).is_none() {
        p.error_message(format!("expected selector, found {}", p.current()));
    }
    if p.is_less() && p.at_word("when") {
        less::guard(p);
    }
    ruleset_body(p);
    m.complete(p, SyntaxKind::Ruleset)
}

/// The block after a selector, or an error node up to the next block when
/// the selector was followed by something else.
pub(crate) fn ruleset_body(p: &mut Parser<'_>) {
    if !p.at(SyntaxKind::OpenBrace) {
        p.error(&[SyntaxKind::OpenBrace]);
        p.recover(
            TokenSet::new(&[SyntaxKind::OpenBrace, SyntaxKind::CloseBrace]),
            TokenSet::new(&[SyntaxKind::Semicolon]),
        );
    }
    if p.at(SyntaxKind::OpenBrace) {
        block(p, SyntaxKind::RulesetBlock, false);
    }
}

/// `{ item* }`. Keyframe blocks read `from`, `to` and percentages as
/// selectors.
pub(crate) fn block(p: &mut Parser<'_>, kind: SyntaxKind, keyframes: bool) -> CompletedMarker {
    let m = p.start();
    if !p.enter() {
        return m.complete(p, kind);
    }
    p.assert(SyntaxKind::OpenBrace);
    while !p.at(SyntaxKind::CloseBrace) && !p.at_end() {
        let before = p.position();
        if keyframes && p.at_set(selectors::KEYFRAME_SELECTOR_START) {
            selectors::keyframes_ruleset(p);
        } else {
            statement(p, true);
        }
        guard_progress(p, before);
    }
    p.expect(SyntaxKind::CloseBrace);
    p.exit();
    m.complete(p, kind)
}

fn guard_progress(p: &mut Parser<'_>, before: usize) {
    if p.position() == before && !p.at_end() && !p.at(SyntaxKind::CloseBrace) {
        p.bump_error();
    }
}

/// Finds which of `{`, `;` or `}` comes first outside any brackets, without
/// moving the cursor.
pub(crate) fn first_block_delimiter(p: &Parser<'_>) -> SyntaxKind {
    let mut open = Vec::new();
    let mut n = 0;
    loop {
        let kind = p.nth(n);
        match kind {
            SyntaxKind::Eof => return kind,
            SyntaxKind::OpenParen | SyntaxKind::OpenBracket | SyntaxKind::HashBrace | SyntaxKind::AtBrace => {
                open.push(kind)
            }
            SyntaxKind::OpenBrace if open.is_empty() => return kind,
            SyntaxKind::OpenBrace => open.push(kind),
            SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                open.pop();
            }
            SyntaxKind::CloseBrace => match open.last() {
                Some(SyntaxKind::HashBrace | SyntaxKind::AtBrace | SyntaxKind::OpenBrace) => {
                    open.pop();
                }
                _ => return kind,
            },
            SyntaxKind::Semicolon if open.is_empty() => return kind,
            _ => {}
        }
        n += 1;
    }
}

/// Trailing `!important`, `!default` and `!global` flags.
pub(crate) fn flags(p: &mut Parser<'_>) {
    while p.at(SyntaxKind::Bang) && p.nth_at(1, SyntaxKind::Ident) {
        let word = p.nth_text(1);
        let kind = if word.eq_ignore_ascii_case("important") {
            SyntaxKind::Important
        } else if p.is_scss() && word.eq_ignore_ascii_case("default") {
            SyntaxKind::ScssDefaultFlag
        } else if p.is_scss() && word.eq_ignore_ascii_case("global") {
            SyntaxKind::ScssGlobalFlag
        } else {
            return;
        };
        let m = p.start();
        p.bump();
        p.bump();
        m.complete(p, kind);
    }
}

/// Everything after a value: flags, then an optional `;`. Anything else up
/// to the end of the statement becomes an error node.
pub(crate) fn statement_end(p: &mut Parser<'_>) {
    flags(p);
    if !p.at_set(STATEMENT_END) && !p.at_end() {
        p.error(&[SyntaxKind::Semicolon, SyntaxKind::CloseBrace]);
        p.recover(TokenSet::new(&[SyntaxKind::CloseBrace]), TokenSet::new(&[SyntaxKind::Semicolon]));
    }
    p.eat(SyntaxKind::Semicolon);
}
