use line_index::LineIndex;
use rowan::{TextRange, TextSize};
use unscanny::Scanner;

use crate::diagnostic::{LexError, LexErrorKind, Position};
use crate::dialect::Dialect;
use crate::syntax_kind::SyntaxKind;
use crate::token::{Token, Trivia};

/// At-rule names that stay at-keywords in Less; any other `@name` is a variable.
const CSS_AT_RULES: &[&str] = &[
    "annotation", "bottom-center", "bottom-left", "bottom-left-corner", "bottom-right",
    "bottom-right-corner", "character-variant", "charset", "container", "counter-style",
    "custom-media", "document", "font-face", "font-feature-values", "font-palette-values", "import",
    "keyframes", "layer", "left-bottom", "left-middle", "left-top", "media", "namespace",
    "ornaments", "page", "plugin", "property", "right-bottom", "right-middle", "right-top", "scope",
    "starting-style", "styleset", "stylistic", "supports", "swash", "top-center", "top-left",
    "top-left-corner", "top-right", "top-right-corner", "viewport",
];

pub struct Lexer<'a> {
    s: Scanner<'a>,
    dialect: Dialect,
    line_index: LineIndex,
    tokens: Vec<Token<'a>>,
    errors: Vec<LexError>,
    current_error: Option<LexErrorKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, dialect: Dialect) -> Self {
        Self {
            s: Scanner::new(text),
            dialect,
            line_index: LineIndex::new(text),
            tokens: Vec::new(),
            errors: Vec::new(),
            current_error: None,
        }
    }

    pub fn tokenize(mut self) -> (Vec<Token<'a>>, Vec<LexError>) {
        loop {
            let leading = self.trivia();
            let start = self.s.cursor();
            let kind = self.identify_token();
            let end = self.s.cursor();
            let range = Self::range(start, end);
            let position = self.position(start);
            if let Some(error_kind) = self.current_error.take() {
                self.errors.push(LexError::new(error_kind, range, position));
            }
            self.tokens.push(Token {
                kind,
                text: self.s.get(start..end),
                range,
                position,
                leading,
            });
            if kind.is_eof() {
                return (self.tokens, self.errors);
            }
        }
    }

    fn range(start: usize, end: usize) -> TextRange {
        TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
    }

    fn position(&self, offset: usize) -> Position {
        self.line_index.line_col(TextSize::new(offset as u32)).into()
    }

    fn error(&mut self, kind: LexErrorKind) -> SyntaxKind {
        self.current_error = Some(kind);
        SyntaxKind::Error
    }

    fn trivia(&mut self) -> Vec<Trivia<'a>> {
        let mut leading = Vec::new();
        loop {
            let start = self.s.cursor();
            let kind = if self.s.at(is_whitespace) {
                self.s.eat_while(is_whitespace);
                SyntaxKind::Whitespace
            } else if self.s.at("/*") && self.s.after().contains("*/") {
                self.s.eat_until("*/");
                self.s.eat_if("*/");
                SyntaxKind::Comment
            } else if self.dialect.is_preprocessor() && self.s.at("//") {
                self.s.eat_until(|c: char| c == '\n' || c == '\r');
                SyntaxKind::LineComment
            } else {
                return leading;
            };
            leading.push(Trivia {
                kind,
                text: self.s.from(start),
                range: Self::range(start, self.s.cursor()),
            });
        }
    }

    fn identify_token(&mut self) -> SyntaxKind {
        let start = self.s.cursor();
        let Some(c) = self.s.eat() else {
            return SyntaxKind::Eof;
        };
        match c {
            '"' | '\'' => self.string(c),
            '#' => self.hash(),
            '@' => self.at_sign(),
            '$' if self.s.eat_if('=') => SyntaxKind::SuffixMatch,
            '$' if self.dialect == Dialect::Scss => SyntaxKind::Dollar,
            '%' if self.dialect.is_preprocessor() => SyntaxKind::Percent,
            '~' if self.s.eat_if('=') => SyntaxKind::IncludeMatch,
            '~' => SyntaxKind::Tilde,
            '|' if self.s.eat_if('=') => SyntaxKind::DashMatch,
            '|' => SyntaxKind::Pipe,
            '^' if self.s.eat_if('=') => SyntaxKind::PrefixMatch,
            '*' if self.s.eat_if('=') => SyntaxKind::SubstringMatch,
            '*' => SyntaxKind::Star,
            '/' if self.s.at('*') => {
                self.s.eat_while(|_: char| true);
                self.error(LexErrorKind::UnterminatedComment)
            }
            '/' => SyntaxKind::Slash,
            ':' => SyntaxKind::Colon,
            ';' => SyntaxKind::Semicolon,
            ',' => SyntaxKind::Comma,
            '{' => SyntaxKind::OpenBrace,
            '}' => SyntaxKind::CloseBrace,
            '(' => SyntaxKind::OpenParen,
            ')' => SyntaxKind::CloseParen,
            '[' => SyntaxKind::OpenBracket,
            ']' => SyntaxKind::CloseBracket,
            '>' => SyntaxKind::Gt,
            '<' => SyntaxKind::Lt,
            '=' => SyntaxKind::Eq,
            '&' => SyntaxKind::Ampersand,
            '!' => SyntaxKind::Bang,
            '.' if self.s.at(|c: char| c.is_ascii_digit()) => self.number('.'),
            '.' => SyntaxKind::Dot,
            '+' | '-' if self.sign_starts_number(start) => self.number(c),
            '-' if self.at_name_start() || self.s.at('-') || self.at_escape() => self.ident(start),
            '+' => SyntaxKind::Plus,
            '-' => SyntaxKind::Minus,
            '\\' if self.s.peek().is_some_and(|c| !is_newline(c)) => {
                self.s.eat();
                self.ident(start)
            }
            '\\' => self.error(LexErrorKind::InvalidEscape),
            c if c.is_ascii_digit() => self.number(c),
            c if is_name_start(c) => self.ident(start),
            _ => SyntaxKind::Delim,
        }
    }

    fn at_name_start(&self) -> bool {
        self.s.peek().is_some_and(is_name_start)
    }

    fn at_escape(&self) -> bool {
        self.s.at('\\') && self.s.scout(1).is_some_and(|c| !is_newline(c))
    }

    fn at_ident_start(&self) -> bool {
        if self.at_name_start() || self.at_escape() {
            return true;
        }
        self.s.at('-')
            && match self.s.scout(1) {
                Some('-') => true,
                Some('\\') => self.s.scout(2).is_some_and(|c| !is_newline(c)),
                Some(c) => is_name_start(c),
                None => false,
            }
    }

    /// A sign belongs to a number only where a value cannot end, so
    /// `2n+1` and `$a-1` keep their operators.
    fn sign_starts_number(&self, start: usize) -> bool {
        let digit_follows = match self.s.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.s.scout(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        let previous = self.s.get(0..start).chars().next_back();
        digit_follows
            && previous.map_or(true, |c| is_whitespace(c) || matches!(c, '(' | ',' | ':' | '[' | '{' | ';'))
    }

    fn eat_name(&mut self) {
        loop {
            if self.s.at(is_name_char) {
                self.s.eat();
            } else if self.at_escape() {
                self.s.eat();
                self.s.eat();
            } else {
                break;
            }
        }
    }

    fn ident(&mut self, start: usize) -> SyntaxKind {
        self.eat_name();
        let name = self.s.from(start);
        if name.eq_ignore_ascii_case("url") && self.s.at('(') && self.url_is_unquoted() {
            return self.url();
        }
        SyntaxKind::Ident
    }

    fn url_is_unquoted(&self) -> bool {
        let rest = &self.s.after()[1..];
        let content = rest.trim_start_matches(is_whitespace);
        if content.starts_with(['"', '\'']) {
            return false;
        }
        let body = content.split(')').next().unwrap_or_default();
        match self.dialect {
            Dialect::Css => true,
            Dialect::Scss => !body.contains("#{") && !body.contains('$'),
            Dialect::Less => !body.contains('@'),
        }
    }

    fn url(&mut self) -> SyntaxKind {
        self.s.eat_if('(');
        self.s.eat_until(|c: char| c == ')' || is_newline(c));
        if self.s.eat_if(')') {
            SyntaxKind::Url
        } else {
            self.error(LexErrorKind::UnterminatedUrl)
        }
    }

    fn number(&mut self, first: char) -> SyntaxKind {
        self.s.eat_while(|c: char| c.is_ascii_digit());
        if first != '.' && self.s.at('.') && self.s.scout(1).is_some_and(|c| c.is_ascii_digit()) {
            self.s.eat();
            self.s.eat_while(|c: char| c.is_ascii_digit());
        }
        if self.s.at(['e', 'E']) {
            let exponent = match self.s.scout(1) {
                Some('+' | '-') => self.s.scout(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent {
                self.s.eat();
                self.s.eat_if(['+', '-']);
                self.s.eat_while(|c: char| c.is_ascii_digit());
            }
        }
        if self.s.eat_if('%') {
            SyntaxKind::Percentage
        } else if self.at_ident_start() {
            self.eat_name();
            SyntaxKind::Dimension
        } else {
            SyntaxKind::Number
        }
    }

    fn string(&mut self, quote: char) -> SyntaxKind {
        loop {
            match self.s.peek() {
                None => return self.error(LexErrorKind::UnterminatedString),
                Some(c) if is_newline(c) => return self.error(LexErrorKind::UnterminatedString),
                Some('\\') => {
                    self.s.eat();
                    if self.s.eat_if('\r') {
                        self.s.eat_if('\n');
                    } else {
                        self.s.eat();
                    }
                }
                Some(c) if c == quote => {
                    self.s.eat();
                    return SyntaxKind::String;
                }
                Some(_) => {
                    self.s.eat();
                }
            }
        }
    }

    fn hash(&mut self) -> SyntaxKind {
        if self.dialect == Dialect::Scss && self.s.eat_if('{') {
            return SyntaxKind::HashBrace;
        }
        if self.s.at(is_name_char) || self.at_escape() {
            self.eat_name();
            SyntaxKind::Hash
        } else {
            SyntaxKind::Delim
        }
    }

    fn at_sign(&mut self) -> SyntaxKind {
        if self.dialect == Dialect::Less {
            if self.s.eat_if('{') {
                return SyntaxKind::AtBrace;
            }
            if self.s.at('@') {
                return SyntaxKind::At;
            }
        }
        if !self.at_ident_start() {
            return SyntaxKind::Delim;
        }
        let name_start = self.s.cursor();
        self.eat_name();
        if self.dialect == Dialect::Less {
            let name = self.s.from(name_start);
            if self.s.at(':') || !is_css_at_rule(name) {
                self.s.jump(name_start);
                return SyntaxKind::At;
            }
        }
        SyntaxKind::AtKeyword
    }
}

/// Only these separate tokens; other Unicode spaces are name characters.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0C')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_css_at_rule(name: &str) -> bool {
    let unprefixed = match name.strip_prefix('-') {
        Some(rest) => rest.split_once('-').map_or(name, |(_, rest)| rest),
        None => name,
    };
    let unprefixed = unprefixed.to_ascii_lowercase();
    CSS_AT_RULES.binary_search(&unprefixed.as_str()).is_ok()
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::{LexError, LexErrorKind, Position};
    use crate::dialect::Dialect;
    use crate::lexer::{Lexer, CSS_AT_RULES};
    use crate::syntax_kind::SyntaxKind;
    use crate::syntax_kind::SyntaxKind::*;
    use crate::token::{reconstruct, Token};

    fn tokenize(text: &str, dialect: Dialect) -> (Vec<Token<'_>>, Vec<LexError>) {
        Lexer::new(text, dialect).tokenize()
    }

    fn kinds(text: &str, dialect: Dialect) -> Vec<SyntaxKind> {
        tokenize(text, dialect).0.iter().map(|token| token.kind).collect()
    }

    #[test]
    fn at_rule_table_is_sorted() {
        assert!(CSS_AT_RULES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn declaration() {
        assert_eq!(kinds("color: Red;", Dialect::Css), vec![Ident, Colon, Ident, Semicolon, Eof]);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("1 2.5 .5 10px 50% 1e3 -2 +.5em", Dialect::Css),
            vec![Number, Number, Number, Dimension, Percentage, Number, Number, Dimension, Eof]
        );
    }

    #[test]
    fn signs_after_values_are_operators() {
        assert_eq!(kinds("2n+1", Dialect::Css), vec![Dimension, Plus, Number, Eof]);
        assert_eq!(kinds("$a-1", Dialect::Scss), vec![Dollar, Ident, Eof]);
        assert_eq!(kinds("$a - 1", Dialect::Scss), vec![Dollar, Ident, Minus, Number, Eof]);
    }

    #[test]
    fn identifiers() {
        assert_eq!(
            kinds("-webkit-box --main-color _x \\31 0", Dialect::Css),
            vec![Ident, Ident, Ident, Ident, Number, Eof]
        );
    }

    #[test]
    fn punctuation_and_matchers() {
        assert_eq!(
            kinds("~= |= ^= $= *= > + ~ * | ! &", Dialect::Css),
            vec![
                IncludeMatch, DashMatch, PrefixMatch, SuffixMatch, SubstringMatch, Gt, Plus, Tilde, Star, Pipe,
                Bang, Ampersand, Eof
            ]
        );
    }

    #[test]
    fn urls() {
        assert_eq!(kinds("url(a/b.png)", Dialect::Css), vec![Url, Eof]);
        assert_eq!(kinds("url( \"a.png\" )", Dialect::Css), vec![Ident, OpenParen, String, CloseParen, Eof]);
        assert_eq!(kinds("url(#{$x})", Dialect::Scss), vec![Ident, OpenParen, HashBrace, Dollar, Ident, CloseBrace, CloseParen, Eof]);
    }

    #[test]
    fn at_keywords() {
        for dialect in Dialect::ALL {
            assert_eq!(kinds("@media", dialect), vec![AtKeyword, Eof]);
        }
        assert_eq!(kinds("@foo: 1;", Dialect::Css), vec![AtKeyword, Colon, Number, Semicolon, Eof]);
        assert_eq!(kinds("@foo: 1;", Dialect::Less), vec![At, Ident, Colon, Number, Semicolon, Eof]);
        assert_eq!(kinds("@media: 1;", Dialect::Less), vec![At, Ident, Colon, Number, Semicolon, Eof]);
        assert_eq!(kinds("@-webkit-keyframes", Dialect::Less), vec![AtKeyword, Eof]);
        assert_eq!(kinds("@@name", Dialect::Less), vec![At, At, Ident, Eof]);
        assert_eq!(kinds("@custom-media --narrow", Dialect::Less), vec![AtKeyword, Ident, Eof]);
        assert_eq!(kinds("@{name}", Dialect::Less), vec![AtBrace, Ident, CloseBrace, Eof]);
    }

    #[test]
    fn scss_sigils() {
        assert_eq!(kinds("$x %p #{a}", Dialect::Scss), vec![Dollar, Ident, Percent, Ident, HashBrace, Ident, CloseBrace, Eof]);
        assert_eq!(kinds("$x %p #{a}", Dialect::Css), vec![Delim, Ident, Delim, Ident, Delim, OpenBrace, Ident, CloseBrace, Eof]);
    }

    #[test]
    fn hashes() {
        assert_eq!(kinds("#fff #main", Dialect::Css), vec![Hash, Hash, Eof]);
    }

    #[test]
    fn line_comments_are_trivia_in_preprocessors() {
        let (tokens, _) = tokenize("a // note\nb", Dialect::Less);
        assert_eq!(tokens.iter().map(|token| token.kind).collect::<Vec<_>>(), vec![Ident, Ident, Eof]);
        let trivia: Vec<_> = tokens[1].leading.iter().map(|trivia| trivia.kind).collect();
        assert_eq!(trivia, vec![Whitespace, LineComment, Whitespace]);
        assert_eq!(kinds("a // b", Dialect::Css), vec![Ident, Slash, Slash, Ident, Eof]);
    }

    #[test]
    fn trivia_is_attached_to_the_following_token() {
        let (tokens, _) = tokenize("/* c */ a /* d */", Dialect::Css);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].leading.len(), 2);
        assert_eq!(tokens[0].leading[0].text, "/* c */");
        assert_eq!(tokens[1].kind, Eof);
        assert_eq!(tokens[1].leading.iter().map(|trivia| trivia.text).collect::<Vec<_>>(), vec![" ", "/* d */"]);
    }

    #[test]
    fn positions() {
        let (tokens, _) = tokenize("a {\n  b: c;\n}", Dialect::Css);
        let b = &tokens[2];
        assert_eq!(b.text, "b");
        assert_eq!(b.position, Position::new(2, 3));
    }

    #[test]
    fn unterminated_string_continues_lexing() {
        let text = "a: \"oops;\nb: c;";
        let (tokens, errors) = tokenize(text, Dialect::Css);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(errors[0].position, Position::new(1, 4));
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(kinds, vec![Ident, Colon, Error, Ident, Colon, Ident, Semicolon, Eof]);
        assert_eq!(tokens[2].text, "\"oops;");
        assert_eq!(reconstruct(&tokens), text);
    }

    #[test]
    fn unterminated_comment_runs_to_end_of_file() {
        let (tokens, errors) = tokenize("a /* b", Dialect::Css);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedComment);
        assert_eq!(tokens[1].kind, Error);
        assert_eq!(tokens[1].text, "/* b");
    }

    #[test]
    fn invalid_escape() {
        let (tokens, errors) = tokenize("a\\\nb", Dialect::Css);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidEscape);
        assert_eq!(tokens.iter().map(|token| token.kind).collect::<Vec<_>>(), vec![Ident, Error, Ident, Eof]);
    }

    #[test]
    fn string_escapes() {
        let (tokens, errors) = tokenize("'it\\'s' \"a\\\nb\"", Dialect::Css);
        assert!(errors.is_empty());
        assert_eq!(tokens.iter().map(|token| token.kind).collect::<Vec<_>>(), vec![String, String, Eof]);
    }

    #[test]
    fn round_trip() {
        let text = "@import 'x';\n/* c */ .a > b:hover, #id[x~=\"y\"] { margin: -1px auto !important; }\n";
        for dialect in Dialect::ALL {
            let (tokens, errors) = tokenize(text, dialect);
            assert!(errors.is_empty());
            assert_eq!(reconstruct(&tokens), text);
        }
    }

    #[test]
    fn only_css_whitespace_separates_tokens() {
        assert_eq!(kinds("a\u{A0}b", Dialect::Css), vec![Ident, Eof]);
        assert_eq!(kinds("a\u{2028}b\u{3000}", Dialect::Scss), vec![Ident, Eof]);
        let (tokens, _) = tokenize("a\x0C\tb", Dialect::Css);
        assert_eq!(tokens.iter().map(|token| token.kind).collect::<Vec<_>>(), vec![Ident, Ident, Eof]);
        assert_eq!(tokens[1].leading[0].kind, Whitespace);
        assert_eq!(kinds("x(\u{A0}-1)", Dialect::Css), vec![Ident, OpenParen, Ident, CloseParen, Eof]);
    }
}
