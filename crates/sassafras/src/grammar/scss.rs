use crate::grammar::declarations::property;
use crate::grammar::values::{self, Terms};
use crate::grammar::{block, statement_end};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;

/// `$name`
pub(crate) fn variable(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Dollar);
    if p.at(SyntaxKind::Ident) && p.nth_joined(0) {
        p.bump();
    } else {
        p.error(&[SyntaxKind::Ident]);
    }
    m.complete(p, SyntaxKind::ScssVariable)
}

/// `#{ expression }`
pub(crate) fn interpolation(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::HashBrace);
    values::value_list(p, Terms::Arguments);
    p.expect(SyntaxKind::CloseBrace);
    m.complete(p, SyntaxKind::ScssInterpolation)
}

/// `$name: value !default !global;`
pub(crate) fn variable_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    variable(p);
    p.expect(SyntaxKind::Colon);
    if values::value_list(p, Terms::Declaration).is_none() {
        p.error_message(format!("expected value, found {}", p.current()));
    }
    statement_end(p);
    m.complete(p, SyntaxKind::ScssVariableDeclaration)
}

/// `font: 12px { family: serif; }`: a property whose block holds
/// sub-properties.
pub(crate) fn nested_properties(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    property(p);
    p.assert(SyntaxKind::Colon);
    if !p.at(SyntaxKind::OpenBrace) {
        values::value_list(p, Terms::Declaration);
    }
    if p.at(SyntaxKind::OpenBrace) {
        block(p, SyntaxKind::RulesetBlock, false);
    } else {
        p.error(&[SyntaxKind::OpenBrace]);
    }
    m.complete(p, SyntaxKind::ScssNestedProperties)
}

/// Tries to read `(key: value, …)`. Returns `None` as soon as the input
/// stops looking like a map; the caller rewinds through `Parser::attempt`.
pub(crate) fn map(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    p.assert(SyntaxKind::OpenParen);
    loop {
        let entry = p.start();
        if values::value(p, Terms::MapKey).is_none() || !p.eat(SyntaxKind::Colon) {
            entry.abandon(p);
            m.abandon(p);
            return None;
        }
        if values::value(p, Terms::Arguments).is_none() {
            entry.abandon(p);
            m.abandon(p);
            return None;
        }
        entry.complete(p, SyntaxKind::ScssMapEntry);
        if !p.eat(SyntaxKind::Comma) || p.at(SyntaxKind::CloseParen) {
            break;
        }
    }
    if !p.eat(SyntaxKind::CloseParen) {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::ScssMap))
}
