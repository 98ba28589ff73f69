use std::collections::HashSet;

use drop_bomb::DropBomb;

use crate::diagnostic::SyntaxError;
use crate::dialect::Dialect;
use crate::event::Event;
use crate::syntax_kind::SyntaxKind;
use crate::token::Token;
use crate::token_set::TokenSet;

/// How many blocks, brackets and functions may enclose each other before the
/// rest of the innermost one is skipped as an error.
pub const MAX_NESTING: usize = 256;

const CLOSING: TokenSet = TokenSet::new(&[SyntaxKind::CloseBrace, SyntaxKind::CloseParen, SyntaxKind::CloseBracket]);

/// Recursive descent state over a token slice.
///
/// The cursor is a plain index, so [`Parser::checkpoint`] and
/// [`Parser::rewind`] make backtracking a matter of two integers.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    cursor: usize,
    events: Vec<Event>,
    dialect: Dialect,
    nesting: usize,
    failed_attempts: HashSet<(usize, SyntaxKind)>,
}

#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    cursor: usize,
    events: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with an end-of-file token, as produced by the lexer.
    pub fn new(tokens: &'a [Token<'a>], dialect: Dialect) -> Self {
        assert!(tokens.last().is_some_and(|token| token.kind.is_eof()));
        Self {
            tokens,
            cursor: 0,
            events: Vec::new(),
            dialect,
            nesting: 0,
            failed_attempts: HashSet::new(),
        }
    }

    pub fn finish(self) -> Vec<Event> {
        self.events
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_scss(&self) -> bool {
        self.dialect == Dialect::Scss
    }

    pub fn is_less(&self) -> bool {
        self.dialect == Dialect::Less
    }

    fn token(&self, n: usize) -> &'a Token<'a> {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.cursor + n).min(last)]
    }

    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.token(n).kind
    }

    pub fn nth_text(&self, n: usize) -> &'a str {
        self.token(n).text
    }

    pub fn current_text(&self) -> &'a str {
        self.nth_text(0)
    }

    /// Whether the `n`th token touches the one before it.
    pub fn nth_joined(&self, n: usize) -> bool {
        !self.token(n).has_leading_trivia()
    }

    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.nth_at(0, kind)
    }

    pub fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub fn nth_at(&self, n: usize, kind: SyntaxKind) -> bool {
        self.nth(n) == kind
    }

    /// An identifier spelled `word`, ignoring ASCII case.
    pub fn nth_at_word(&self, n: usize, word: &str) -> bool {
        self.nth_at(n, SyntaxKind::Ident) && self.nth_text(n).eq_ignore_ascii_case(word)
    }

    pub fn at_word(&self, word: &str) -> bool {
        self.nth_at_word(0, word)
    }

    pub fn at_end(&self) -> bool {
        self.at(SyntaxKind::Eof)
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn assert(&mut self, kind: SyntaxKind) {
        assert!(self.at(kind));
        self.bump();
    }

    pub fn bump(&mut self) {
        if !self.at_end() {
            self.events.push(Event::Token);
            self.cursor += 1;
        }
    }

    /// Consumes the end-of-file token, which carries the trailing trivia.
    pub fn bump_eof(&mut self) {
        assert!(self.at_end());
        self.events.push(Event::Token);
    }

    pub fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(&[kind]);
            false
        }
    }

    pub fn error(&mut self, expected: &[SyntaxKind]) {
        let token = self.token(0);
        let error = SyntaxError::unexpected(expected, token.kind, token.range, token.position);
        self.events.push(Event::Error(error));
    }

    pub fn error_message(&mut self, message: impl Into<String>) {
        let token = self.token(0);
        let error = SyntaxError::custom(message, token.kind, token.range, token.position);
        self.events.push(Event::Error(error));
    }

    pub fn error_and_recover(&mut self, expected: &[SyntaxKind], recovery: TokenSet) {
        self.error(expected);
        self.recover(recovery, TokenSet::EMPTY);
    }

    /// Wraps tokens in an error node until one in `stop` (left in place) or
    /// one in `consume` (swallowed) is reached at the current nesting level.
    pub fn recover(&mut self, stop: TokenSet, consume: TokenSet) {
        if self.at_end() || self.at_set(stop) {
            return;
        }
        tracing::trace!(at = ?self.current(), position = self.cursor, "recovering");
        let m = self.start();
        let mut depth = 0usize;
        while !self.at_end() {
            let kind = self.current();
            if depth == 0 && stop.contains(kind) {
                break;
            }
            match kind {
                SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket
                | SyntaxKind::HashBrace | SyntaxKind::AtBrace => depth += 1,
                SyntaxKind::CloseParen | SyntaxKind::CloseBracket => depth = depth.saturating_sub(1),
                SyntaxKind::CloseBrace if depth > 0 => depth -= 1,
                _ => {}
            }
            self.bump();
            if depth == 0 && consume.contains(kind) {
                break;
            }
        }
        m.complete(self, SyntaxKind::ErrorNode);
    }

    /// Reports the current token and wraps it alone in an error node.
    pub fn bump_error(&mut self) {
        let m = self.start();
        self.error(&[]);
        self.bump();
        m.complete(self, SyntaxKind::ErrorNode);
    }

    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
            events: self.events.len(),
            nesting: self.nesting,
        }
    }

    /// Drops every event recorded since `checkpoint`, errors included.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.cursor;
        self.events.truncate(checkpoint.events);
        self.nesting = checkpoint.nesting;
    }

    /// Runs `parse` speculatively, rewinding when it returns `None`. A
    /// failed `kind` is remembered for its position and never retried there,
    /// so nested attempts cannot multiply.
    pub fn attempt<T>(&mut self, kind: SyntaxKind, parse: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let key = (self.cursor, kind);
        if self.failed_attempts.contains(&key) {
            return None;
        }
        let checkpoint = self.checkpoint();
        let parsed = parse(self);
        if parsed.is_none() {
            self.rewind(checkpoint);
            self.failed_attempts.insert(key);
        }
        parsed
    }

    /// Opens one nesting level for the construct at the cursor. Past
    /// [`MAX_NESTING`] the construct is reported and wrapped in an error node
    /// through its closing bracket instead, and `false` is returned. Every
    /// `true` must be paired with [`Parser::exit`].
    pub fn enter(&mut self) -> bool {
        if self.nesting >= MAX_NESTING {
            tracing::debug!(position = self.cursor, "nesting limit reached");
            self.error_message(format!("nesting deeper than {MAX_NESTING} levels"));
            self.recover(TokenSet::EMPTY, CLOSING);
            return false;
        }
        self.nesting += 1;
        true
    }

    pub fn exit(&mut self) {
        self.nesting -= 1;
    }
}

pub struct Marker {
    pos: usize,
    bomb: DropBomb,
}

impl Marker {
    pub fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();
        let event = &mut p.events[self.pos];
        *event = Event::StartNode(kind, None);
        p.events.push(Event::FinishNode);
        CompletedMarker {
            pos: self.pos,
            kind,
        }
    }

    pub fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();
        if self.pos == p.events.len() - 1 {
            p.events.pop();
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: usize,
    kind: SyntaxKind,
}

impl CompletedMarker {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn precede(self, p: &mut Parser<'_>) -> Marker {
        let m = p.start();
        match p.events[self.pos] {
            Event::StartNode(_, ref mut forward_parent) => {
                *forward_parent = Some(m.pos);
            }
            _ => unreachable!(),
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::Dialect;
    use crate::event::Event;
    use crate::lexer::Lexer;
    use crate::parser::{Parser, MAX_NESTING};
    use crate::syntax_kind::SyntaxKind;

    #[test]
    fn lookahead_skips_trivia() {
        let (tokens, _) = Lexer::new("a /* c */ b:c", Dialect::Css).tokenize();
        let p = Parser::new(&tokens, Dialect::Css);
        assert_eq!(p.nth(1), SyntaxKind::Ident);
        assert!(!p.nth_joined(1));
        assert!(p.nth_joined(2));
        assert_eq!(p.nth(10), SyntaxKind::Eof);
    }

    #[test]
    fn rewind_restores_cursor_and_events() {
        let (tokens, _) = Lexer::new("a b", Dialect::Css).tokenize();
        let mut p = Parser::new(&tokens, Dialect::Css);
        let checkpoint = p.checkpoint();
        let m = p.start();
        p.bump();
        p.error(&[SyntaxKind::Colon]);
        m.complete(&mut p, SyntaxKind::Value);
        assert_eq!(p.position(), 1);
        p.rewind(checkpoint);
        assert_eq!(p.position(), 0);
        assert!(p.finish().is_empty());
    }

    #[test]
    fn words_ignore_case() {
        let (tokens, _) = Lexer::new("WHEN", Dialect::Less).tokenize();
        let p = Parser::new(&tokens, Dialect::Less);
        assert!(p.at_word("when"));
    }

    #[test]
    fn failed_attempts_are_not_retried() {
        let (tokens, _) = Lexer::new("a b", Dialect::Scss).tokenize();
        let mut p = Parser::new(&tokens, Dialect::Scss);
        let mut runs = 0;
        for _ in 0..2 {
            let parsed = p.attempt(SyntaxKind::ScssMap, |p| {
                runs += 1;
                p.bump();
                None::<()>
            });
            assert!(parsed.is_none());
            assert_eq!(p.position(), 0);
        }
        assert_eq!(runs, 1);
    }

    #[test]
    fn nesting_past_the_limit_is_skipped() {
        let (tokens, _) = Lexer::new("(a (b)) c", Dialect::Css).tokenize();
        let mut p = Parser::new(&tokens, Dialect::Css);
        p.nesting = MAX_NESTING - 1;
        assert!(p.enter());
        assert!(!p.enter());
        assert_eq!(p.current_text(), "c");
        p.exit();
        assert_eq!(p.nesting, MAX_NESTING - 1);
        let events = p.finish();
        assert_eq!(events.iter().filter(|event| matches!(event, Event::Error(_))).count(), 1);
    }
}
