use std::collections::BTreeMap;

use sassafras::ast::CssNode;
use sassafras::visitor::KindCounter;
use sassafras::{parse, tokenize, Dialect, SyntaxKind};

const SOURCES: &[&str] = &[
    "",
    "   \n\t",
    "/* only a comment */",
    "a{}",
    "a { color: red; }\n",
    "@charset \"utf-8\";\n@import url(foo.css) screen;\n",
    "@media screen and (max-width: 100px) { a, b > c { margin: 0 auto !important } }",
    "@font-face { font-family: x; src: url(a.woff) format('woff'); }",
    "@keyframes spin { from { top: 0 } 50% { top: 10px } to { top: 0 } }",
    "@supports (display: grid) and (not (display: inline-grid)) { .a { display: grid } }",
    "a[href^='http'], input[type=\"text\" i]::placeholder { x: y }",
    ":root { --main: { a: b }; --empty:; }",
    "li:nth-child(2n+1):not(.a, #b) { width: calc(100% - 2 * 10px) }",
    "*|a ns|b |c { }",
    "a { b: 'unterminated\n}",
    "a { b: c",
    "/* unterminated",
    "}}} a { ; ; } {",
    "a { color red; margin: ; }",
    "@media { ",
    "a { b: url(x.png; }",
    "\\\n a {}",
    "$x: 1;",
    "%ph { a: b }",
    "@x: 1;",
    ".m(@a; @b: 2) when (@a > 0) { width: @a }",
    "$map: (key1: value1, key2: value2, key3: value3);",
    "@include foo($a, $b...) { x: y }",
    "a { &:hover { b: c } &-suffix { d: e } }",
    "#{$sel} .a-#{$b} { #{$prop}-top: 1px; font: { family: x; size: 2px; } }",
    "@each $key, $value in $map { .#{$key} { color: $value !important; } }",
    "@if $a == 1 { x: y } @else if $a < 2 { x: z } @else { x: w }",
    "// line comment\na { b: c } // trailing",
    "@detached: { background: red; };\n.call { @detached(); }",
    ".mixin(1; 2) !important;\n#ns > .m();\n.m;",
    "@min768: ~\"(min-width: 768px)\";\n@media @min768 { .@{name}-x { @{prop}: @@var; } }",
    ".guard when (iscolor(@c)) { color: @c }",
    "a { .b; }",
    "@plugin \"my-plugin\"; @var: ~`\"hello\"`;",
    "€ { x: y } ¥",
    "a { b: c !default !global }",
    "a { b: $c; d: @e; f: #{g}; h: @{i}; }",
];

fn check_round_trip(text: &str, dialect: Dialect) {
    let (tokens, _) = tokenize(text, dialect);
    assert_eq!(tokens.last().map(|token| token.kind), Some(SyntaxKind::Eof));
    assert_eq!(sassafras::token::reconstruct(&tokens), text, "{dialect}: tokens of {text:?}");

    let parse = parse(text, dialect);
    let root = parse.syntax_node();
    assert_eq!(root.text().to_string(), text, "{dialect}: tree of {text:?}");
    assert_eq!(root.text_range().len(), rowan::TextSize::of(text));
}

#[test]
fn every_source_round_trips_in_every_dialect() {
    for text in SOURCES {
        for dialect in Dialect::ALL {
            check_round_trip(text, dialect);
        }
    }
}

#[test]
fn dialect_kinds_stay_in_their_dialect() {
    for text in SOURCES {
        for dialect in Dialect::ALL {
            let parse = parse(text, dialect);
            for element in parse.syntax_node().descendants_with_tokens() {
                assert!(
                    element.kind().allowed_in(dialect),
                    "{:?} in a {dialect} tree of {text:?}",
                    element.kind()
                );
            }
        }
    }
}

#[test]
fn every_token_is_in_exactly_one_leaf() {
    for text in SOURCES {
        for dialect in Dialect::ALL {
            let (tokens, _) = tokenize(text, dialect);
            let expected: usize = tokens.iter().map(|token| token.leading.len() + 1).sum();
            let leaves = parse(text, dialect)
                .syntax_node()
                .descendants_with_tokens()
                .filter(|element| element.as_token().is_some())
                .count();
            assert_eq!(leaves, expected, "{dialect}: {text:?}");
        }
    }
}

#[test]
fn sibling_ranges_are_contiguous() {
    for text in SOURCES {
        for dialect in Dialect::ALL {
            for node in parse(text, dialect).syntax_node().descendants() {
                let mut end = node.text_range().start();
                for child in node.children_with_tokens() {
                    assert_eq!(child.text_range().start(), end);
                    end = child.text_range().end();
                }
                assert_eq!(end, node.text_range().end());
            }
        }
    }
}

#[test]
fn visitor_reaches_every_node_and_token() {
    for text in SOURCES {
        for dialect in Dialect::ALL {
            let parse = parse(text, dialect);
            let root = parse.syntax_node();
            let mut counter = KindCounter::default();
            parse.tree().accept(&mut counter);

            let mut expected: BTreeMap<SyntaxKind, usize> = BTreeMap::new();
            for node in root.descendants() {
                *expected.entry(node.kind()).or_default() += 1;
            }
            let tokens = root.descendants_with_tokens().filter(|element| element.as_token().is_some()).count();
            assert_eq!(counter.entered, expected, "{dialect}: {text:?}");
            assert_eq!(counter.left, expected, "{dialect}: {text:?}");
            assert_eq!(counter.tokens, tokens, "{dialect}: {text:?}");
        }
    }
}

#[test]
fn deeply_nested_blocks_stop_at_the_nesting_limit() {
    let depth = 5_000;
    let text = format!("{}{}", "a{".repeat(depth), "}".repeat(depth));
    for dialect in Dialect::ALL {
        check_round_trip(&text, dialect);
        let parse = parse(&text, dialect);
        let errors = parse.syntax_errors();
        assert_eq!(errors.len(), 1, "{dialect}");
        assert!(errors[0].to_string().contains("nesting"), "{}", errors[0]);
        assert!(parse.syntax_node().descendants().any(|node| node.kind() == SyntaxKind::ErrorNode));
    }
}

#[test]
fn deeply_nested_values_stop_at_the_nesting_limit() {
    let depth = 5_000;
    let inner = format!("{}1{}", "f(".repeat(depth), ")".repeat(depth));
    let text = format!("a {{ b: {}{inner}{}; c: d }}", "(".repeat(depth), ")".repeat(depth));
    for dialect in Dialect::ALL {
        check_round_trip(&text, dialect);
        let parse = parse(&text, dialect);
        assert_eq!(parse.syntax_errors().len(), 1, "{dialect}");
        let declarations = parse
            .syntax_node()
            .descendants()
            .filter(|node| node.kind() == SyntaxKind::PropertyDeclaration)
            .count();
        assert_eq!(declarations, 2, "{dialect}");
    }
}

#[test]
fn unterminated_string_is_one_lex_error() {
    let text = "a { content: \"open\n; color: red; }";
    let (tokens, errors) = tokenize(text, Dialect::Css);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, sassafras::diagnostic::LexErrorKind::UnterminatedString);
    assert_eq!(&text[errors[0].range], "\"open");
    assert!(tokens.iter().any(|token| token.kind == SyntaxKind::Error));
    let after: Vec<_> = tokens
        .iter()
        .skip_while(|token| token.kind != SyntaxKind::Error)
        .skip(1)
        .map(|token| token.text)
        .collect();
    assert_eq!(after, vec![";", "color", ":", "red", ";", "}", ""]);
}
