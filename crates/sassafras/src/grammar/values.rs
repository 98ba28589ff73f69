use crate::grammar::{less, scss, selectors};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;

/// Where a run of value terms appears. Each context accepts a different set
/// of bare tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terms {
    /// The value of a declaration or variable.
    Declaration,
    /// Between parentheses: function arguments, parenthesized expressions,
    /// mixin parameters, guards.
    Arguments,
    /// A key of an SCSS map entry, which ends at `:`.
    MapKey,
    /// The prelude of an at-rule such as `@include` or `@if`.
    Prelude,
    /// Media queries and other preludes whose parentheses hold features.
    Query,
}

impl Terms {
    fn nested(self) -> Terms {
        match self {
            Terms::Query => Terms::Query,
            _ => Terms::Arguments,
        }
    }

    fn allows_maps(self) -> bool {
        self != Terms::Query
    }
}

/// A single value, or a comma separated list when the value is followed by
/// a comma.
pub(crate) fn value_list(p: &mut Parser<'_>, terms: Terms) -> Option<CompletedMarker> {
    let first = value(p, terms)?;
    if !p.at(SyntaxKind::Comma) {
        return Some(first);
    }
    let m = first.precede(p);
    separated_values(p, terms);
    Some(m.complete(p, SyntaxKind::CommaSeparatedList))
}

/// Like [`value_list`], but always produces a list node, even for one value.
pub(crate) fn comma_separated_list(p: &mut Parser<'_>, terms: Terms) -> Option<CompletedMarker> {
    let first = value(p, terms)?;
    let m = first.precede(p);
    separated_values(p, terms);
    Some(m.complete(p, SyntaxKind::CommaSeparatedList))
}

/// `(, value)*`. A trailing comma is accepted before a closing parenthesis.
fn separated_values(p: &mut Parser<'_>, terms: Terms) {
    while p.eat(SyntaxKind::Comma) {
        if p.at(SyntaxKind::CloseParen) && terms != Terms::Declaration {
            break;
        }
        if value(p, terms).is_none() {
            p.error_message(format!("expected value, found {}", p.current()));
            break;
        }
    }
}

/// One or more terms, wrapped in a `Value` node.
pub(crate) fn value(p: &mut Parser<'_>, terms: Terms) -> Option<CompletedMarker> {
    let m = p.start();
    let mut count = 0;
    while term(p, terms) {
        count += 1;
    }
    if count == 0 {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::Value))
}

fn term(p: &mut Parser<'_>, terms: Terms) -> bool {
    if at_nested_term(p) {
        if p.enter() {
            nested_term(p, terms);
            p.exit();
        }
        return true;
    }
    let preprocessor = p.dialect().is_preprocessor();
    match p.current() {
        SyntaxKind::Url => {
            let m = p.start();
            p.bump();
            m.complete(p, SyntaxKind::Uri);
        }
        SyntaxKind::Dollar if p.is_scss() => {
            scss::variable(p);
        }
        SyntaxKind::Percent
            if p.is_scss() && matches!(terms, Terms::Prelude) && p.nth_at(1, SyntaxKind::Ident) && p.nth_joined(1) =>
        {
            selectors::placeholder_selector(p);
        }
        SyntaxKind::At if p.is_less() => {
            less::variable(p);
        }
        SyntaxKind::AtBrace if p.is_less() => {
            less::interpolation(p);
        }
        SyntaxKind::Tilde if p.is_less() && p.nth_at(1, SyntaxKind::String) => {
            less::escaping(p);
        }
        SyntaxKind::Bang => {
            if terms == Terms::Declaration || is_flag(p) {
                return false;
            }
            p.bump();
        }
        SyntaxKind::Colon => {
            if matches!(terms, Terms::Declaration | Terms::MapKey) {
                return false;
            }
            p.bump();
        }
        SyntaxKind::Eq | SyntaxKind::Gt | SyntaxKind::Lt => {
            if terms == Terms::Declaration && !preprocessor {
                return false;
            }
            p.bump();
        }
        SyntaxKind::Percent | SyntaxKind::Ampersand | SyntaxKind::Dot if preprocessor => p.bump(),
        SyntaxKind::AtKeyword | SyntaxKind::Dot | SyntaxKind::Pipe | SyntaxKind::Tilde => {
            if matches!(terms, Terms::Declaration | Terms::MapKey) {
                return false;
            }
            p.bump();
        }
        SyntaxKind::Ident
        | SyntaxKind::Number
        | SyntaxKind::Percentage
        | SyntaxKind::Dimension
        | SyntaxKind::String
        | SyntaxKind::Hash
        | SyntaxKind::Plus
        | SyntaxKind::Minus
        | SyntaxKind::Star
        | SyntaxKind::Slash
        | SyntaxKind::Error => p.bump(),
        SyntaxKind::Delim if matches!(terms, Terms::Prelude | Terms::Query) => p.bump(),
        _ => return false,
    }
    true
}

/// Terms that hold further values and so count towards the nesting limit.
fn at_nested_term(p: &Parser<'_>) -> bool {
    match p.current() {
        SyntaxKind::Ident => p.nth_at(1, SyntaxKind::OpenParen) && p.nth_joined(1),
        SyntaxKind::OpenParen | SyntaxKind::OpenBracket => true,
        SyntaxKind::HashBrace => p.is_scss(),
        _ => false,
    }
}

fn nested_term(p: &mut Parser<'_>, terms: Terms) {
    match p.current() {
        SyntaxKind::Ident if p.current_text().eq_ignore_ascii_case("url") => {
            uri(p);
        }
        SyntaxKind::Ident => {
            function(p);
        }
        SyntaxKind::OpenParen => {
            parenthesized(p, terms);
        }
        SyntaxKind::OpenBracket => {
            p.bump();
            while term(p, terms.nested()) || p.eat(SyntaxKind::Comma) {}
            p.expect(SyntaxKind::CloseBracket);
        }
        _ => {
            scss::interpolation(p);
        }
    }
}

fn is_flag(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::Bang)
        && ["important", "default", "global"]
            .iter()
            .any(|word| p.nth_at_word(1, word))
}

/// `name(arguments)`.
pub(crate) fn function(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Ident);
    p.assert(SyntaxKind::OpenParen);
    parameters(p);
    p.expect(SyntaxKind::CloseParen);
    m.complete(p, SyntaxKind::Function)
}

/// Comma separated arguments without their parentheses.
fn parameters(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if value(p, Terms::Arguments).is_some() {
        separated_values(p, Terms::Arguments);
    }
    m.complete(p, SyntaxKind::Parameters)
}

/// `url("…")`. Unquoted urls arrive as a single `Url` token instead.
fn uri(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Ident);
    p.assert(SyntaxKind::OpenParen);
    value(p, Terms::Arguments);
    p.expect(SyntaxKind::CloseParen);
    m.complete(p, SyntaxKind::Uri)
}

/// `( … )`. In SCSS a parenthesized list of `key: value` pairs is a map;
/// when a `:` makes that possible it is tried first and abandoned if it
/// does not fit.
pub(crate) fn parenthesized(p: &mut Parser<'_>, terms: Terms) -> CompletedMarker {
    if p.is_scss() && terms.allows_maps() && at_map(p) {
        if let Some(map) = p.attempt(SyntaxKind::ScssMap, scss::map) {
            return map;
        }
    }
    let m = p.start();
    p.assert(SyntaxKind::OpenParen);
    value_list(p, terms.nested());
    p.expect(SyntaxKind::CloseParen);
    m.complete(p, SyntaxKind::ParenthesizedExpression)
}

/// Whether a `:` appears before the parenthesis at the cursor closes,
/// outside any brackets nested in it.
fn at_map(p: &Parser<'_>) -> bool {
    let mut depth = 0usize;
    let mut n = 1;
    loop {
        match p.nth(n) {
            SyntaxKind::Eof | SyntaxKind::Semicolon => return false,
            SyntaxKind::OpenParen | SyntaxKind::OpenBracket | SyntaxKind::OpenBrace | SyntaxKind::HashBrace => {
                depth += 1
            }
            SyntaxKind::CloseParen | SyntaxKind::CloseBracket | SyntaxKind::CloseBrace => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            SyntaxKind::Colon if depth == 0 => return true,
            _ => {}
        }
        n += 1;
    }
}

/// A custom property value: any balanced tokens up to `;`, `}` or
/// `!important`.
pub(crate) fn raw_value(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let mut depth = 0usize;
    let mut count = 0;
    while !p.at_end() {
        match p.current() {
            SyntaxKind::Semicolon | SyntaxKind::CloseBrace if depth == 0 => break,
            SyntaxKind::Bang if depth == 0 && is_flag(p) => break,
            SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket
            | SyntaxKind::HashBrace | SyntaxKind::AtBrace => depth += 1,
            SyntaxKind::CloseBrace | SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                depth = depth.saturating_sub(1)
            }
            _ => {}
        }
        p.bump();
        count += 1;
    }
    if count == 0 {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::Value))
}
