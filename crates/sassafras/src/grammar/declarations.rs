use crate::grammar::values::{self, Terms};
use crate::grammar::{first_block_delimiter, less, ruleset, scss, statement_end};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::token_set::TokenSet;

const PROPERTY_START: TokenSet = TokenSet::new(&[
    SyntaxKind::Ident,
    SyntaxKind::Star,
    SyntaxKind::HashBrace,
    SyntaxKind::AtBrace,
]);

/// A block item that is not an at-rule: a nested ruleset when a `{` comes
/// before any `;` or `}`, a declaration otherwise.
pub(crate) fn declaration_or_ruleset(p: &mut Parser<'_>) {
    if is_custom_property(p) {
        property_declaration(p);
        return;
    }
    match first_block_delimiter(p) {
        SyntaxKind::OpenBrace if p.is_scss() && at_nested_properties(p) => {
            scss::nested_properties(p);
        }
        SyntaxKind::OpenBrace => {
            ruleset(p);
        }
        _ => {
            property_declaration(p);
        }
    }
}

/// `font: {` or `font: bold {`, as opposed to the selector `a:hover {`.
fn at_nested_properties(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::Ident)
        && p.nth_at(1, SyntaxKind::Colon)
        && p.nth_joined(1)
        && (p.nth_at(2, SyntaxKind::OpenBrace) || !p.nth_joined(2))
}

fn is_custom_property(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::Ident) && p.current_text().starts_with("--") && p.nth_at(1, SyntaxKind::Colon)
}

/// Any declaration, dispatching on the dialect's variable syntax.
pub(crate) fn declaration(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.current() {
        SyntaxKind::Dollar if p.is_scss() => Some(scss::variable_declaration(p)),
        SyntaxKind::At if p.is_less() => Some(less::variable_declaration(p)),
        _ if p.at_set(PROPERTY_START) => Some(property_declaration(p)),
        _ => None,
    }
}

/// `property: value !important;`. A `--name` property makes a custom
/// property declaration whose value is kept as raw tokens.
pub(crate) fn property_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let custom = is_custom_property(p);
    let m = p.start();
    let named = property(p).is_some();
    if !named {
        p.error_message(format!("expected property, found {}", p.current()));
        p.recover(TokenSet::new(&[SyntaxKind::Colon, SyntaxKind::CloseBrace]), TokenSet::new(&[SyntaxKind::Semicolon]));
    }
    if (named || p.at(SyntaxKind::Colon)) && p.expect(SyntaxKind::Colon) {
        let value = if custom {
            values::raw_value(p)
        } else {
            values::value_list(p, Terms::Declaration)
        };
        if value.is_none() && !custom {
            p.error_message(format!("expected value, found {}", p.current()));
        }
    }
    statement_end(p);
    let kind = if custom {
        SyntaxKind::VariableDeclaration
    } else {
        SyntaxKind::PropertyDeclaration
    };
    m.complete(p, kind)
}

/// A property name, possibly built from joined identifiers and
/// interpolations (`#{$side}-margin`, `@{prop}-color`). A leading `*` is the
/// old IE star hack.
pub(crate) fn property(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !p.at_set(PROPERTY_START) {
        return None;
    }
    let m = p.start();
    if p.at(SyntaxKind::Star) && p.nth_at(1, SyntaxKind::Ident) && p.nth_joined(1) {
        p.bump();
    }
    let mut first = true;
    while first || p.nth_joined(0) {
        match p.current() {
            SyntaxKind::Ident => p.bump(),
            SyntaxKind::HashBrace if p.is_scss() => {
                scss::interpolation(p);
            }
            SyntaxKind::AtBrace if p.is_less() => {
                less::interpolation(p);
            }
            SyntaxKind::Minus if !first => p.bump(),
            _ => break,
        }
        first = false;
    }
    if first {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::Property))
}
