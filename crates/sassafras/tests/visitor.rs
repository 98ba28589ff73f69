use std::collections::BTreeMap;

use sassafras::ast::{self, CssNode};
use sassafras::{parse, Dialect, SyntaxKind, SyntaxToken, Visitor, WalkControl};

/// Records every callback in order.
#[derive(Default)]
struct Trace {
    events: Vec<String>,
    tokens: usize,
}

impl Visitor for Trace {
    fn enter_ruleset(&mut self, _: &ast::Ruleset) -> WalkControl {
        self.events.push("enter ruleset".into());
        WalkControl::Continue
    }

    fn leave_ruleset(&mut self, _: &ast::Ruleset) {
        self.events.push("leave ruleset".into());
    }

    fn enter_property_declaration(&mut self, declaration: &ast::PropertyDeclaration) -> WalkControl {
        let name = declaration.property().map(|property| property.name()).unwrap_or_default();
        self.events.push(format!("enter {name}"));
        WalkControl::Continue
    }

    fn leave_property_declaration(&mut self, declaration: &ast::PropertyDeclaration) {
        let name = declaration.property().map(|property| property.name()).unwrap_or_default();
        self.events.push(format!("leave {name}"));
    }

    fn visit_token(&mut self, _: &SyntaxToken) {
        self.tokens += 1;
    }
}

#[test]
fn pre_order_left_to_right() {
    let parse = parse("a { color: red; b { margin: 0; } } c { top: 0 }", Dialect::Scss);
    let mut trace = Trace::default();
    parse.tree().accept(&mut trace);
    assert_eq!(
        trace.events,
        vec![
            "enter ruleset",
            "enter color",
            "leave color",
            "enter ruleset",
            "enter margin",
            "leave margin",
            "leave ruleset",
            "leave ruleset",
            "enter ruleset",
            "enter top",
            "leave top",
            "leave ruleset",
        ]
    );
    let tokens = parse
        .syntax_node()
        .descendants_with_tokens()
        .filter(|element| element.as_token().is_some())
        .count();
    assert_eq!(trace.tokens, tokens);
}

/// Counts enter and leave callbacks per kind for a handful of kinds.
#[derive(Default)]
struct Balance {
    entered: BTreeMap<SyntaxKind, usize>,
    left: BTreeMap<SyntaxKind, usize>,
}

impl Balance {
    fn enter(&mut self, node: &impl CssNode) -> WalkControl {
        *self.entered.entry(node.kind()).or_default() += 1;
        WalkControl::Continue
    }

    fn leave(&mut self, node: &impl CssNode) {
        *self.left.entry(node.kind()).or_default() += 1;
    }
}

impl Visitor for Balance {
    fn enter_style_sheet(&mut self, node: &ast::StyleSheet) -> WalkControl {
        self.enter(node)
    }

    fn leave_style_sheet(&mut self, node: &ast::StyleSheet) {
        self.leave(node)
    }

    fn enter_selector(&mut self, node: &ast::Selector) -> WalkControl {
        self.enter(node)
    }

    fn leave_selector(&mut self, node: &ast::Selector) {
        self.leave(node)
    }

    fn enter_value(&mut self, node: &ast::Value) -> WalkControl {
        self.enter(node)
    }

    fn leave_value(&mut self, node: &ast::Value) {
        self.leave(node)
    }

    fn enter_less_variable(&mut self, node: &ast::LessVariable) -> WalkControl {
        self.enter(node)
    }

    fn leave_less_variable(&mut self, node: &ast::LessVariable) {
        self.leave(node)
    }

    fn enter_error_node(&mut self, node: &ast::ErrorNode) -> WalkControl {
        self.enter(node)
    }

    fn leave_error_node(&mut self, node: &ast::ErrorNode) {
        self.leave(node)
    }
}

#[test]
fn enter_and_leave_are_balanced() {
    let sources = [
        (Dialect::Css, "a, b c { x: 1 2, 3 } } d { y: (4) }"),
        (Dialect::Less, "@a: 1; .m(@a; @b) { w: @a @@b } ] x { y: z }"),
    ];
    for (dialect, text) in sources {
        let parse = parse(text, dialect);
        let mut balance = Balance::default();
        parse.tree().accept(&mut balance);

        let tracked = [
            SyntaxKind::StyleSheet,
            SyntaxKind::Selector,
            SyntaxKind::Value,
            SyntaxKind::LessVariable,
            SyntaxKind::ErrorNode,
        ];
        let mut expected: BTreeMap<SyntaxKind, usize> = BTreeMap::new();
        for node in parse.syntax_node().descendants() {
            if tracked.contains(&node.kind()) {
                *expected.entry(node.kind()).or_default() += 1;
            }
        }
        assert_eq!(balance.entered, balance.left);
        assert_eq!(balance.entered, expected);
        assert!(balance.entered.contains_key(&SyntaxKind::ErrorNode), "{text}");
    }
}
