use rowan::ast::AstNode;
use rowan::NodeOrToken;

use crate::ast;
use crate::language::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// What a walk does after an enter callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkControl {
    #[default]
    Continue,
    /// Skip the children of this node. Its leave callback still runs.
    SkipChildren,
}

macro_rules! visitor {
    ($($kind:ident => $enter:ident, $leave:ident;)*) => {
        /// Enter and leave callbacks, one pair per node kind. Every callback
        /// defaults to doing nothing, so a visitor overrides only the kinds
        /// it inspects.
        pub trait Visitor: Sized {
            $(
                fn $enter(&mut self, node: &ast::$kind) -> WalkControl {
                    let _ = node;
                    WalkControl::Continue
                }

                fn $leave(&mut self, node: &ast::$kind) {
                    let _ = node;
                }
            )*

            /// Called for every token, trivia included, in document order.
            fn visit_token(&mut self, token: &SyntaxToken) {
                let _ = token;
            }
        }

        /// Routes `node` to the callback pair of its kind and walks its
        /// children in between.
        pub fn accept<V: Visitor>(visitor: &mut V, node: &SyntaxNode) {
            match node.kind() {
                $(
                    SyntaxKind::$kind => {
                        if let Some(typed) = ast::$kind::cast(node.clone()) {
                            if visitor.$enter(&typed) == WalkControl::Continue {
                                walk(visitor, node);
                            }
                            visitor.$leave(&typed);
                        }
                    }
                )*
                kind => unreachable!("{kind:?} is a token kind"),
            }
        }

        /// Counts every enter and leave callback per node kind, and the
        /// tokens visited.
        #[derive(Debug, Default)]
        pub struct KindCounter {
            pub entered: std::collections::BTreeMap<SyntaxKind, usize>,
            pub left: std::collections::BTreeMap<SyntaxKind, usize>,
            pub tokens: usize,
        }

        impl Visitor for KindCounter {
            $(
                fn $enter(&mut self, _: &ast::$kind) -> WalkControl {
                    *self.entered.entry(SyntaxKind::$kind).or_default() += 1;
                    WalkControl::Continue
                }

                fn $leave(&mut self, _: &ast::$kind) {
                    *self.left.entry(SyntaxKind::$kind).or_default() += 1;
                }
            )*

            fn visit_token(&mut self, _: &SyntaxToken) {
                self.tokens += 1;
            }
        }
    };
}

visitor! {
    StyleSheet => enter_style_sheet, leave_style_sheet;
    Ruleset => enter_ruleset, leave_ruleset;
    RulesetBlock => enter_ruleset_block, leave_ruleset_block;
    AtRule => enter_at_rule, leave_at_rule;
    AtRulePrelude => enter_at_rule_prelude, leave_at_rule_prelude;
    AtRuleBlock => enter_at_rule_block, leave_at_rule_block;
    SelectorList => enter_selector_list, leave_selector_list;
    Selector => enter_selector, leave_selector;
    CompoundSelector => enter_compound_selector, leave_compound_selector;
    SelectorCombinator => enter_selector_combinator, leave_selector_combinator;
    TypeSelector => enter_type_selector, leave_type_selector;
    UniversalSelector => enter_universal_selector, leave_universal_selector;
    ClassSelector => enter_class_selector, leave_class_selector;
    IdSelector => enter_id_selector, leave_id_selector;
    AttributeSelector => enter_attribute_selector, leave_attribute_selector;
    PseudoSelector => enter_pseudo_selector, leave_pseudo_selector;
    KeyframesSelector => enter_keyframes_selector, leave_keyframes_selector;
    ParentSelector => enter_parent_selector, leave_parent_selector;
    PlaceholderSelector => enter_placeholder_selector, leave_placeholder_selector;
    PropertyDeclaration => enter_property_declaration, leave_property_declaration;
    VariableDeclaration => enter_variable_declaration, leave_variable_declaration;
    Property => enter_property, leave_property;
    Value => enter_value, leave_value;
    CommaSeparatedList => enter_comma_separated_list, leave_comma_separated_list;
    SemicolonSeparatedList => enter_semicolon_separated_list, leave_semicolon_separated_list;
    Function => enter_function, leave_function;
    Parameters => enter_parameters, leave_parameters;
    ParenthesizedExpression => enter_parenthesized_expression, leave_parenthesized_expression;
    Uri => enter_uri, leave_uri;
    Important => enter_important, leave_important;
    ScssVariable => enter_scss_variable, leave_scss_variable;
    ScssVariableDeclaration => enter_scss_variable_declaration, leave_scss_variable_declaration;
    ScssInterpolation => enter_scss_interpolation, leave_scss_interpolation;
    ScssMap => enter_scss_map, leave_scss_map;
    ScssMapEntry => enter_scss_map_entry, leave_scss_map_entry;
    ScssDefaultFlag => enter_scss_default_flag, leave_scss_default_flag;
    ScssGlobalFlag => enter_scss_global_flag, leave_scss_global_flag;
    ScssNestedProperties => enter_scss_nested_properties, leave_scss_nested_properties;
    LessVariable => enter_less_variable, leave_less_variable;
    LessVariableDeclaration => enter_less_variable_declaration, leave_less_variable_declaration;
    LessInterpolation => enter_less_interpolation, leave_less_interpolation;
    LessMixinCall => enter_less_mixin_call, leave_less_mixin_call;
    LessMixinDefinition => enter_less_mixin_definition, leave_less_mixin_definition;
    LessMixinParameters => enter_less_mixin_parameters, leave_less_mixin_parameters;
    LessMixinGuard => enter_less_mixin_guard, leave_less_mixin_guard;
    LessEscaping => enter_less_escaping, leave_less_escaping;
    LessDetachedRuleset => enter_less_detached_ruleset, leave_less_detached_ruleset;
    ErrorNode => enter_error_node, leave_error_node;
}

/// Visits the children of `node` in source order.
pub fn walk<V: Visitor>(visitor: &mut V, node: &SyntaxNode) {
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(node) => accept(visitor, &node),
            NodeOrToken::Token(token) => visitor.visit_token(&token),
        }
    }
}

#[cfg(test)]
mod tests {
    use rowan::GreenNodeBuilder;

    use super::{accept, KindCounter, Visitor, WalkControl};
    use crate::ast::{self, CssNode};
    use crate::dialect::Dialect;
    use crate::language::SyntaxNode;
    use crate::syntax_kind::SyntaxKind;

    #[test]
    fn every_node_kind_has_its_own_callbacks() {
        for raw in SyntaxKind::StyleSheet as u16..=SyntaxKind::LAST as u16 {
            let mut builder = GreenNodeBuilder::new();
            builder.start_node(rowan::SyntaxKind(raw));
            builder.finish_node();
            let node = SyntaxNode::new_root(builder.finish());
            let mut counter = KindCounter::default();
            accept(&mut counter, &node);
            assert_eq!(counter.entered.len(), 1);
            assert_eq!(counter.entered.get(&node.kind()), Some(&1));
            assert_eq!(counter.left.get(&node.kind()), Some(&1));
        }
    }

    #[test]
    fn skipping_children_still_leaves() {
        #[derive(Default)]
        struct Skipper {
            rulesets: usize,
            declarations: usize,
            left: usize,
        }

        impl Visitor for Skipper {
            fn enter_ruleset(&mut self, ruleset: &ast::Ruleset) -> WalkControl {
                self.rulesets += 1;
                if ruleset.selectors().is_some_and(|list| list.text() == "a") {
                    WalkControl::SkipChildren
                } else {
                    WalkControl::Continue
                }
            }

            fn leave_ruleset(&mut self, _: &ast::Ruleset) {
                self.left += 1;
            }

            fn enter_property_declaration(&mut self, _: &ast::PropertyDeclaration) -> WalkControl {
                self.declarations += 1;
                WalkControl::Continue
            }
        }

        let parse = crate::parse("a { color: red; b { x: y; } } c { z: w; }", Dialect::Scss);
        let mut skipper = Skipper::default();
        parse.tree().accept(&mut skipper);
        assert_eq!(skipper.rulesets, 2);
        assert_eq!(skipper.left, 2);
        assert_eq!(skipper.declarations, 1);
    }
}
