use std::mem;

use rowan::{GreenNode, GreenNodeBuilder};

use crate::diagnostic::SyntaxError;
use crate::syntax_kind::SyntaxKind;
use crate::token::Token;

#[derive(Debug)]
pub enum Event {
    Placeholder,
    StartNode(SyntaxKind, Option<usize>),
    FinishNode,
    Token,
    Error(SyntaxError),
}

/// Replays parser events into a green tree.
///
/// Nodes open lazily at their first token so that the trivia in front of
/// it stays in the enclosing node. The outermost node opens eagerly and
/// therefore owns the leading trivia of the source.
pub fn process(mut events: Vec<Event>, tokens: &[Token<'_>]) -> (GreenNode, Vec<SyntaxError>) {
    let mut builder = GreenNodeBuilder::new();
    let mut errors = Vec::new();
    let mut pending: Vec<SyntaxKind> = Vec::new();
    let mut forward_parents = Vec::new();
    let mut depth = 0usize;
    let mut idx = 0;
    for i in 0..events.len() {
        match mem::replace(&mut events[i], Event::Placeholder) {
            Event::StartNode(kind, forward_parent) => {
                forward_parents.push(kind);
                let mut fp = forward_parent;
                while let Some(next) = fp {
                    fp = match mem::replace(&mut events[next], Event::Placeholder) {
                        Event::StartNode(kind, forward_parent) => {
                            forward_parents.push(kind);
                            forward_parent
                        }
                        _ => unreachable!(),
                    }
                }
                for kind in forward_parents.drain(..).rev() {
                    if depth == 0 && pending.is_empty() {
                        builder.start_node(kind.into());
                        depth += 1;
                    } else {
                        pending.push(kind);
                    }
                }
            }
            Event::FinishNode => {
                flush(&mut builder, &mut pending, &mut depth);
                builder.finish_node();
                depth -= 1;
            }
            Event::Token => {
                let token = &tokens[idx];
                for trivia in &token.leading {
                    builder.token(trivia.kind.into(), trivia.text);
                }
                flush(&mut builder, &mut pending, &mut depth);
                builder.token(token.kind.into(), token.text);
                idx += 1;
            }
            Event::Error(error) => errors.push(error),
            Event::Placeholder => {}
        }
    }
    (builder.finish(), errors)
}

fn flush(builder: &mut GreenNodeBuilder<'_>, pending: &mut Vec<SyntaxKind>, depth: &mut usize) {
    for kind in pending.drain(..) {
        builder.start_node(kind.into());
        *depth += 1;
    }
}
