use crate::grammar::block;
use crate::grammar::values::{self, Terms};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::token_set::TokenSet;

const PRELUDE_END: TokenSet = TokenSet::new(&[SyntaxKind::OpenBrace, SyntaxKind::Semicolon, SyntaxKind::CloseBrace]);

/// At-rules whose parentheses hold `feature: value` conditions rather than
/// expressions.
const QUERY_RULES: &[&str] = &["container", "custom-media", "document", "import", "media", "supports"];

/// `@name prelude;` or `@name prelude { … }`. A missing `;` before `}` or
/// the end of input is accepted.
pub(crate) fn at_rule(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let name = rule_name(p.current_text());
    p.assert(SyntaxKind::AtKeyword);
    let terms = if QUERY_RULES.contains(&name.as_str()) {
        Terms::Query
    } else {
        Terms::Prelude
    };
    if !p.at_set(PRELUDE_END) && !p.at_end() {
        let prelude = p.start();
        values::value_list(p, terms);
        if !p.at_set(PRELUDE_END) && !p.at_end() {
            p.error(&[SyntaxKind::OpenBrace, SyntaxKind::Semicolon]);
            p.recover(PRELUDE_END, TokenSet::EMPTY);
        }
        prelude.complete(p, SyntaxKind::AtRulePrelude);
    }
    if p.at(SyntaxKind::OpenBrace) {
        block(p, SyntaxKind::AtRuleBlock, name == "keyframes");
    } else {
        p.eat(SyntaxKind::Semicolon);
    }
    m.complete(p, SyntaxKind::AtRule)
}

/// Lowercase name without `@` and without a vendor prefix.
fn rule_name(keyword: &str) -> String {
    let name = keyword.trim_start_matches('@').to_ascii_lowercase();
    match name.strip_prefix('-').and_then(|rest| rest.split_once('-')) {
        Some((_, rest)) => rest.to_string(),
        None => name,
    }
}
