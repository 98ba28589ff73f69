use crate::grammar::declarations::declaration_or_ruleset;
use crate::grammar::values::{self, Terms};
use crate::grammar::{block, first_block_delimiter, ruleset, ruleset_body, selectors, statement_end};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;

/// A statement starting with `@` that is not an at-rule: a variable
/// declaration, a detached ruleset call, or an interpolated selector or
/// property.
pub(crate) fn at_statement(p: &mut Parser<'_>, in_block: bool) {
    let named = p.nth_at(1, SyntaxKind::Ident) && p.nth_joined(1);
    if named && p.nth_at(2, SyntaxKind::Colon) {
        variable_declaration(p);
    } else if named && p.nth_at(2, SyntaxKind::OpenParen) && p.nth_joined(2) {
        let m = p.start();
        variable(p);
        mixin_parameters(p);
        statement_end(p);
        m.complete(p, SyntaxKind::LessMixinCall);
    } else if in_block {
        declaration_or_ruleset(p);
    } else {
        ruleset(p);
    }
}

/// `@name`, or `@@name` for a variable whose name is held by another.
pub(crate) fn variable(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::At);
    if p.at(SyntaxKind::At) && p.nth_joined(0) {
        p.bump();
    }
    if p.at(SyntaxKind::Ident) && p.nth_joined(0) {
        p.bump();
    } else {
        p.error(&[SyntaxKind::Ident]);
    }
    m.complete(p, SyntaxKind::LessVariable)
}

/// `@{name}`
pub(crate) fn interpolation(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::AtBrace);
    p.expect(SyntaxKind::Ident);
    p.expect(SyntaxKind::CloseBrace);
    m.complete(p, SyntaxKind::LessInterpolation)
}

/// `~"raw"`
pub(crate) fn escaping(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Tilde);
    p.assert(SyntaxKind::String);
    m.complete(p, SyntaxKind::LessEscaping)
}

/// `@name: value;` or `@name: { … }`.
pub(crate) fn variable_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    variable(p);
    p.expect(SyntaxKind::Colon);
    if p.at(SyntaxKind::OpenBrace) {
        block(p, SyntaxKind::LessDetachedRuleset, false);
        p.eat(SyntaxKind::Semicolon);
    } else {
        if values::value_list(p, Terms::Declaration).is_none() {
            p.error_message(format!("expected value, found {}", p.current()));
        }
        statement_end(p);
    }
    m.complete(p, SyntaxKind::LessVariableDeclaration)
}

/// A statement starting with `.` or `#`: a mixin call when it ends before
/// any block, a mixin definition when the name is directly followed by
/// parameters, and a ruleset otherwise.
pub(crate) fn mixin_or_ruleset(p: &mut Parser<'_>) {
    if first_block_delimiter(p) != SyntaxKind::OpenBrace {
        mixin_call(p);
    } else if at_mixin_definition(p) {
        mixin_definition(p);
    } else {
        ruleset(p);
    }
}

fn at_mixin_definition(p: &Parser<'_>) -> bool {
    let name_len = match p.current() {
        SyntaxKind::Hash => 1,
        SyntaxKind::Dot if p.nth_at(1, SyntaxKind::Ident) && p.nth_joined(1) => 2,
        _ => return false,
    };
    p.nth_at(name_len, SyntaxKind::OpenParen) && p.nth_joined(name_len)
}

/// `.mixin(args) !important;`, `#ns > .mixin();`, `.mixin;`
fn mixin_call(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if selectors::selector(p).is_none() {
        p.error_message(format!("expected mixin name, found {}", p.current()));
    }
    if p.at(SyntaxKind::OpenParen) {
        mixin_parameters(p);
    }
    statement_end(p);
    m.complete(p, SyntaxKind::LessMixinCall)
}

/// `.mixin(@a; @b: 2) when (@a > 0) { … }`
fn mixin_definition(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    selectors::selector(p);
    mixin_parameters(p);
    if p.at_word("when") {
        guard(p);
    }
    ruleset_body(p);
    m.complete(p, SyntaxKind::LessMixinDefinition)
}

/// Mixin arguments or parameters. Once a `;` separates them, commas only
/// build lists inside a single argument.
fn mixin_parameters(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::OpenParen);
    if !p.at(SyntaxKind::CloseParen) {
        if has_semicolon(p) {
            let list = p.start();
            values::value_list(p, Terms::Arguments);
            while p.eat(SyntaxKind::Semicolon) {
                if p.at(SyntaxKind::CloseParen) {
                    break;
                }
                values::value_list(p, Terms::Arguments);
            }
            list.complete(p, SyntaxKind::SemicolonSeparatedList);
        } else {
            values::value_list(p, Terms::Arguments);
        }
    }
    p.expect(SyntaxKind::CloseParen);
    m.complete(p, SyntaxKind::LessMixinParameters)
}

/// Whether a `;` appears before the parenthesis closing the current one.
fn has_semicolon(p: &Parser<'_>) -> bool {
    let mut depth = 0usize;
    let mut n = 0;
    loop {
        match p.nth(n) {
            SyntaxKind::Eof => return false,
            SyntaxKind::OpenParen | SyntaxKind::OpenBracket | SyntaxKind::OpenBrace => depth += 1,
            SyntaxKind::CloseParen | SyntaxKind::CloseBracket | SyntaxKind::CloseBrace => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            SyntaxKind::Semicolon if depth == 0 => return true,
            _ => {}
        }
        n += 1;
    }
}

/// `when (condition), (condition)`
pub(crate) fn guard(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.assert(SyntaxKind::Ident);
    if values::value_list(p, Terms::Arguments).is_none() {
        p.error_message(format!("expected guard condition, found {}", p.current()));
    }
    m.complete(p, SyntaxKind::LessMixinGuard)
}
