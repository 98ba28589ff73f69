pub mod ast;
pub mod charset;
pub mod config;
pub mod diagnostic;
pub mod dialect;
pub mod event;
pub mod grammar;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod separated_list;
pub mod source;
pub mod syntax_kind;
pub mod token;
pub mod token_set;
pub mod visitor;

use std::fmt::Write;

use rowan::{GreenNode, NodeOrToken, WalkEvent};

pub use rowan::ast::AstNode;

pub use crate::charset::Charset;
pub use crate::config::Config;
pub use crate::diagnostic::{Diagnostic, LexError, Position, SyntaxError};
pub use crate::dialect::Dialect;
pub use crate::grammar::Entry;
pub use crate::language::{CssLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use crate::separated_list::SeparatedList;
pub use crate::source::{LoadError, SourceFile};
pub use crate::syntax_kind::SyntaxKind;
pub use crate::token::Token;
pub use crate::visitor::{Visitor, WalkControl};

use crate::lexer::Lexer;
use crate::parser::Parser;

/// The outcome of parsing one source text: an immutable tree plus every
/// error found on the way. The tree always covers the whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    dialect: Dialect,
    lex_errors: Vec<LexError>,
    syntax_errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn tree(&self) -> ast::StyleSheet {
        ast::StyleSheet::cast(self.syntax_node()).expect("the root node is always a stylesheet")
    }

    /// The root, or the first child of the root, that casts to `N`. Fragment
    /// parses wrap their production in a `StyleSheet`.
    pub fn cast<N: AstNode<Language = CssLanguage>>(&self) -> Option<N> {
        let root = self.syntax_node();
        N::cast(root.clone()).or_else(|| root.children().find_map(N::cast))
    }

    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.syntax_errors
    }

    pub fn ok(&self) -> bool {
        self.lex_errors.is_empty() && self.syntax_errors.is_empty()
    }

    /// Lex and syntax errors ordered by offset.
    pub fn errors(&self) -> Vec<Diagnostic> {
        let mut errors: Vec<Diagnostic> = self
            .lex_errors
            .iter()
            .cloned()
            .map(Diagnostic::from)
            .chain(self.syntax_errors.iter().cloned().map(Diagnostic::from))
            .collect();
        errors.sort_by_key(|error| error.range().start());
        errors
    }

    /// One line per node and token, indented by depth:
    /// `Kind@start..end` for nodes and `Kind@start..end "text"` for tokens.
    pub fn debug_tree(&self) -> String {
        debug_tree(&self.syntax_node())
    }
}

pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0;
    for event in node.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(element) => {
                let indent = "  ".repeat(depth);
                match element {
                    NodeOrToken::Node(node) => {
                        let _ = writeln!(out, "{indent}{:?}@{:?}", node.kind(), node.text_range());
                        depth += 1;
                    }
                    NodeOrToken::Token(token) => {
                        let _ = writeln!(out, "{indent}{:?}@{:?} {:?}", token.kind(), token.text_range(), token.text());
                    }
                }
            }
            WalkEvent::Leave(NodeOrToken::Node(_)) => depth -= 1,
            WalkEvent::Leave(NodeOrToken::Token(_)) => {}
        }
    }
    out
}

pub fn tokenize(text: &str, dialect: Dialect) -> (Vec<Token<'_>>, Vec<LexError>) {
    Lexer::new(text, dialect).tokenize()
}

/// Parses a whole stylesheet.
pub fn parse(text: &str, dialect: Dialect) -> Parse {
    parse_entry(text, dialect, Entry::StyleSheet)
}

/// Parses `text` as a single production. Fragments must start at offset 0
/// and span the whole input, otherwise a syntax error is reported.
pub fn parse_entry(text: &str, dialect: Dialect, entry: Entry) -> Parse {
    let _span = tracing::debug_span!("parse", %dialect, ?entry).entered();
    let (tokens, lex_errors) = tokenize(text, dialect);
    let mut parser = Parser::new(&tokens, dialect);
    grammar::entry(&mut parser, entry);
    let (green, syntax_errors) = event::process(parser.finish(), &tokens);
    tracing::debug!(
        tokens = tokens.len(),
        lex_errors = lex_errors.len(),
        syntax_errors = syntax_errors.len(),
        "parsed"
    );
    Parse { green, dialect, lex_errors, syntax_errors }
}
