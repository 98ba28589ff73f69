use sassafras::ast::{self, CssNode};
use sassafras::{parse, AstNode, Dialect, Parse, SyntaxKind};

fn first<N: AstNode<Language = sassafras::CssLanguage>>(parse: &Parse) -> N {
    parse
        .syntax_node()
        .descendants()
        .find_map(N::cast)
        .unwrap_or_else(|| panic!("no node in\n{}", parse.debug_tree()))
}

fn ok(text: &str, dialect: Dialect) -> Parse {
    let parse = parse(text, dialect);
    assert!(parse.ok(), "{text:?}: {:?}\n{}", parse.errors(), parse.debug_tree());
    parse
}

#[test]
fn scss_variable_declaration_tree() {
    let parse = ok("$a: 1 !default;", Dialect::Scss);
    insta::assert_snapshot!(parse.debug_tree(), @r###"
    StyleSheet@0..15
      ScssVariableDeclaration@0..15
        ScssVariable@0..2
          Dollar@0..1 "$"
          Ident@1..2 "a"
        Colon@2..3 ":"
        Whitespace@3..4 " "
        Value@4..5
          Number@4..5 "1"
        Whitespace@5..6 " "
        ScssDefaultFlag@6..14
          Bang@6..7 "!"
          Ident@7..14 "default"
        Semicolon@14..15 ";"
      Eof@15..15 ""
    "###);
    let declaration: ast::ScssVariableDeclaration = first(&parse);
    assert_eq!(declaration.variable().and_then(|v| v.name()).as_deref(), Some("a"));
    assert!(declaration.default_flag().is_some());
    assert!(declaration.global_flag().is_none());
}

#[test]
fn scss_map() {
    let parse = ok("$map: (key1: value1, key2: value2, key3: value3);", Dialect::Scss);
    let map: ast::ScssMap = first(&parse);
    let entries = map.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries.separators().len(), 2);
    let keys: Vec<String> = entries.values().iter().filter_map(|entry| entry.key()).map(|key| key.text()).collect();
    assert_eq!(keys, vec!["key1", "key2", "key3"]);
    assert_eq!(entries.values()[1].value().unwrap().text(), "value2");
}

#[test]
fn parenthesized_expression_is_not_a_map() {
    let parse = ok("a { width: ($a + 2) * 3; }", Dialect::Scss);
    assert!(parse.syntax_node().descendants().all(|node| node.kind() != SyntaxKind::ScssMap));
    let expression: ast::ParenthesizedExpression = first(&parse);
    assert_eq!(expression.text(), "($a + 2)");
}

fn count(parse: &Parse, kind: SyntaxKind) -> usize {
    parse.syntax_node().descendants().filter(|node| node.kind() == kind).count()
}

#[test]
fn deeply_parenthesized_scss_values() {
    let depth = 40;
    let text = format!("a {{ b: {}1{}; }}", "(".repeat(depth), ")".repeat(depth));
    let parse = ok(&text, Dialect::Scss);
    assert_eq!(count(&parse, SyntaxKind::ParenthesizedExpression), depth);
    assert_eq!(count(&parse, SyntaxKind::ScssMap), 0);

    // Every level has a `:` yet none is a map, since each key runs into a `,`.
    let mut nested = String::from("1");
    for _ in 0..depth {
        nested = format!("(x {nested}, y: z)");
    }
    let parse = ok(&format!("$a: {nested};"), Dialect::Scss);
    assert_eq!(count(&parse, SyntaxKind::ParenthesizedExpression), depth);
    assert_eq!(count(&parse, SyntaxKind::ScssMap), 0);
}

#[test]
fn nested_scss_maps() {
    let parse = ok("$m: (a: (b: (c: 1)), d: (2));", Dialect::Scss);
    assert_eq!(count(&parse, SyntaxKind::ScssMap), 3);
    assert_eq!(count(&parse, SyntaxKind::ParenthesizedExpression), 1);
}

#[test]
fn scss_nested_properties() {
    let parse = ok("a { font: { family: serif; size: 2px; } }", Dialect::Scss);
    let nested: ast::ScssNestedProperties = first(&parse);
    assert_eq!(nested.property().unwrap().name().as_str(), "font");
    assert_eq!(nested.block().unwrap().statements().count(), 2);
}

#[test]
fn pseudo_class_selector_is_not_nested_properties() {
    let parse = ok("a { b:hover { c: d } }", Dialect::Scss);
    assert!(parse.syntax_node().descendants().all(|node| node.kind() != SyntaxKind::ScssNestedProperties));
    let pseudo: ast::PseudoSelector = first(&parse);
    assert_eq!(pseudo.name().unwrap().text(), "hover");
}

#[test]
fn scss_interpolation_and_parent_selectors() {
    let parse = ok("#{$sel} { &-item { #{$side}-margin: 1px; } }", Dialect::Scss);
    let parent: ast::ParentSelector = first(&parse);
    assert_eq!(parent.suffix().as_deref(), Some("-item"));
    let property: ast::Property = first(&parse);
    assert!(property.is_interpolated());
    assert_eq!(property.name().as_str(), "#{$side}-margin");
}

#[test]
fn scss_placeholder_in_extend() {
    let parse = ok("%message { color: red; }\n.ok { @extend %message; }", Dialect::Scss);
    let names: Vec<String> = parse
        .syntax_node()
        .descendants()
        .filter_map(ast::PlaceholderSelector::cast)
        .map(|placeholder| placeholder.name().to_string())
        .collect();
    assert_eq!(names, vec!["message", "message"]);
}

#[test]
fn scss_control_directives_are_at_rules() {
    let parse = ok("@each $key, $value in $map { .#{$key} { color: $value; } }", Dialect::Scss);
    let rule: ast::AtRule = first(&parse);
    assert_eq!(rule.name().as_deref(), Some("each"));
    assert!(rule.prelude().is_some());
    assert_eq!(rule.block().unwrap().statements().count(), 1);
}

#[test]
fn less_variables() {
    let parse = ok("@color: red;\na { color: @@name; }", Dialect::Less);
    let declaration: ast::LessVariableDeclaration = first(&parse);
    assert_eq!(declaration.variable().and_then(|v| v.name()).as_deref(), Some("color"));
    let indirect = parse
        .syntax_node()
        .descendants()
        .filter_map(ast::LessVariable::cast)
        .find(|variable| variable.is_indirect())
        .unwrap();
    assert_eq!(indirect.name().as_deref(), Some("name"));
}

#[test]
fn less_at_keywords_and_variables() {
    let parse = ok("@media screen { @width: 10px; }", Dialect::Less);
    let rule: ast::AtRule = first(&parse);
    assert_eq!(rule.name().as_deref(), Some("media"));
    let declaration: ast::LessVariableDeclaration = first(&parse);
    assert_eq!(declaration.value().unwrap().text(), "10px");
}

#[test]
fn less_detached_ruleset() {
    let parse = ok("@detached: { background: red; };\n.call { @detached(); }", Dialect::Less);
    let declaration: ast::LessVariableDeclaration = first(&parse);
    assert_eq!(declaration.detached_ruleset().unwrap().statements().count(), 1);
    let call: ast::LessMixinCall = first(&parse);
    assert!(call.selector().is_none());
    assert_eq!(call.variable().and_then(|v| v.name()).as_deref(), Some("detached"));
}

#[test]
fn less_mixin_definition() {
    let parse = ok(".m(@a; @b: 2) when (@a > 0) { width: @a }", Dialect::Less);
    let definition: ast::LessMixinDefinition = first(&parse);
    assert_eq!(definition.selector().unwrap().text(), ".m");
    assert_eq!(definition.parameters().unwrap().arguments().len(), 2);
    assert!(definition.guard().is_some());
    assert_eq!(definition.block().unwrap().statements().count(), 1);
}

#[test]
fn less_mixin_calls() {
    let parse = ok(".a { .mixin(1, 2) !important; #ns > .m(); .m; }", Dialect::Less);
    let calls: Vec<ast::LessMixinCall> = parse.syntax_node().descendants().filter_map(ast::LessMixinCall::cast).collect();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].parameters().unwrap().arguments().len(), 2);
    assert!(calls[0].important().is_some());
    assert_eq!(calls[1].selector().unwrap().text(), "#ns > .m");
    assert!(calls[2].parameters().is_none());
}

#[test]
fn less_escaping_and_interpolation() {
    let parse = ok("@q: ~\"(min-width: 768px)\";\n.@{name}-x { @{prop}: 1; }", Dialect::Less);
    let escaping: ast::LessEscaping = first(&parse);
    assert_eq!(escaping.content().as_deref(), Some("(min-width: 768px)"));
    let interpolation: ast::LessInterpolation = first(&parse);
    assert_eq!(interpolation.name().unwrap().text(), "name");
}

#[test]
fn css_rejects_preprocessor_syntax() {
    for text in ["$a: 1;", "a { &:hover { b: c } }", "a { b: $c; }", "%p { a: b }"] {
        let parse = parse(text, Dialect::Css);
        assert!(!parse.ok(), "{text:?} parsed as css");
        assert!(parse.syntax_node().descendants().any(|node| node.kind() == SyntaxKind::ErrorNode)
            || !parse.syntax_errors().is_empty());
    }
}

#[test]
fn css_keyframes_and_custom_properties() {
    let parse = ok("@keyframes spin { from { top: 0 } 50% { top: 5px } }\n:root { --gap: { a: b }; }", Dialect::Css);
    let keyframes: Vec<String> = parse
        .syntax_node()
        .descendants()
        .filter_map(ast::KeyframesSelector::cast)
        .map(|selector| selector.text())
        .collect();
    assert_eq!(keyframes, vec!["from", "50%"]);
    let custom: ast::VariableDeclaration = first(&parse);
    assert_eq!(custom.property().unwrap().name().as_str(), "--gap");
    assert_eq!(custom.value().unwrap().text(), "{ a: b }");
}

#[test]
fn spans_exclude_surrounding_trivia() {
    let parse = ok("  a  {  b : c ;  }  ", Dialect::Css);
    let declaration: ast::PropertyDeclaration = first(&parse);
    let span = declaration.span();
    assert_eq!(&"  a  {  b : c ;  }  "[span], "b : c ;");
    assert_eq!(parse.tree().span().start(), 2.into());
}
