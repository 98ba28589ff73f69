use itertools::Itertools;
use rowan::ast::AstNode;
use rowan::NodeOrToken;

use crate::language::{CssLanguage, SyntaxNode, SyntaxToken};
use crate::token_set::TokenSet;

/// Values interleaved with the separator tokens between them.
///
/// A list of `n` values holds `n - 1` separators, or `n` when the grammar
/// allowed a trailing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeparatedList<V, S = SyntaxToken> {
    values: Vec<V>,
    separators: Vec<S>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{values} values cannot be separated by {separators} separators")]
pub struct SeparatedListError {
    pub values: usize,
    pub separators: usize,
}

impl<V, S> SeparatedList<V, S> {
    pub fn new(values: Vec<V>, separators: Vec<S>) -> Result<Self, SeparatedListError> {
        let balanced = match (values.len(), separators.len()) {
            (0, 0) => true,
            (0, _) => false,
            (n, m) => m + 1 == n || m == n,
        };
        if !balanced {
            return Err(SeparatedListError {
                values: values.len(),
                separators: separators.len(),
            });
        }
        Ok(Self { values, separators })
    }

    /// Trusts the caller to pass lists taken from a parsed tree.
    pub(crate) fn from_parts(values: Vec<V>, separators: Vec<S>) -> Self {
        Self { values, separators }
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn separators(&self) -> &[S] {
        &self.separators
    }

    /// `V, S, V, S, …` in source order.
    pub fn elements_and_separators(&self) -> impl Iterator<Item = NodeOrToken<&V, &S>> + '_ {
        self.values
            .iter()
            .map(NodeOrToken::Node)
            .interleave(self.separators.iter().map(NodeOrToken::Token))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_trailing_separator(&self) -> bool {
        !self.values.is_empty() && self.separators.len() == self.values.len()
    }

    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<V: AstNode<Language = CssLanguage>> SeparatedList<V> {
    /// Collects the children of `node` that cast to `V`, and its tokens whose
    /// kind is in `separators`.
    pub fn from_node(node: &SyntaxNode, separators: TokenSet) -> Self {
        let mut list = Self {
            values: Vec::new(),
            separators: Vec::new(),
        };
        for element in node.children_with_tokens() {
            match element {
                NodeOrToken::Node(child) => list.values.extend(V::cast(child)),
                NodeOrToken::Token(token) if separators.contains(token.kind()) => list.separators.push(token),
                NodeOrToken::Token(_) => {}
            }
        }
        list
    }
}
