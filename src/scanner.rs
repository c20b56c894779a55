use crate::{
    error::{Error, Reporter, Result},
    token::{Literal, Token, TokenKind},
};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::CharIndices;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "nil" => TokenKind::Nil,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

/// Turns source text into tokens, one lexeme at a time.
///
/// As an iterator the scanner yields an `Err` for every malformed lexeme and
/// carries on with the next character. [`Scanner::scan_tokens`] drives it to
/// the end and hands the errors to a [`Reporter`].
pub struct Scanner<'a> {
    source: &'a str,
    src: PeekMoreIterator<CharIndices<'a>>,
    start: usize,
    current: usize,
    line: usize,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        loop {
            self.start = self.current;
            let start_line = self.line;
            let next_char = self.advance()?;

            if let Some(result) = self.scan_lexeme(next_char) {
                return Some(result.map(|(kind, literal)| Token {
                    kind,
                    lexeme: self.lexeme().to_string(),
                    literal,
                    line: start_line,
                }));
            }
        }
    }
}

impl <'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            src: source.char_indices().peekmore(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source. Every lexical error goes to `reporter`; the
    /// returned tokens always end with a single `EndOfFile`.
    pub fn scan_tokens<R: Reporter + ?Sized>(mut self, reporter: &mut R) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut errors = 0;

        for result in self.by_ref() {
            match result {
                Ok(token) => {
                    log::trace!("scanned {}", token);
                    tokens.push(token);
                },
                Err(e) => {
                    errors += 1;
                    reporter.report(&e);
                },
            }
        }

        tokens.push(Token::end_of_file(self.line));
        log::debug!(
            "scanned {} tokens over {} lines with {} errors",
            tokens.len(),
            self.line,
            errors,
        );
        tokens
    }

    /// `None` means the lexeme produced no token (whitespace or a comment).
    fn scan_lexeme(&mut self, c: char) -> Option<Result<(TokenKind, Option<Literal>)>> {
        use TokenKind::*;
        let kind = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '*' => Star,
            '!' => if self.does_next_match('=') { BangEqual } else { Bang },
            '=' => if self.does_next_match('=') { EqualEqual } else { Equal },
            '<' => if self.does_next_match('=') { LessEqual } else { Less },
            '>' => if self.does_next_match('=') { GreaterEqual } else { Greater },
            '/' => {
                if self.does_next_match('/') {
                    self.advance_until(|n| n == '\n');
                    return None;
                }
                Slash
            },
            ' ' | '\r' | '\t' => return None,
            '\n' => {
                self.line += 1;
                return None;
            },
            '"' => return Some(self.extract_string()),
            c if c.is_ascii_digit() => return Some(Ok(self.extract_number())),
            c if can_start_identifier(c) => self.extract_identifier(),
            c => return Some(Err(Error::unexpected_character(self.line, c))),
        };
        Some(Ok((kind, None)))
    }

    fn lexeme(&self) -> &'a str {
        let source = self.source;
        &source[self.start..self.current]
    }

    fn advance(&mut self) -> Option<char> {
        let (offset, c) = self.src.next()?;
        self.current = offset + c.len_utf8();
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.src.peek().map(|&(_, c)| c)
    }

    fn peek_second(&mut self) -> Option<char> {
        self.src.peek_nth(1).map(|&(_, c)| c)
    }

    fn does_next_match(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_until(&mut self, should_stop: impl Fn(char) -> bool) {
        while let Some(next) = self.peek() {
            if should_stop(next) {
                break;
            }
            self.advance();
        }
    }

    fn extract_string(&mut self) -> Result<(TokenKind, Option<Literal>)> {
        while let Some(next) = self.peek() {
            if next == '"' {
                break;
            }
            if next == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        match self.advance() {
            None => Err(Error::unterminated_string(self.line)),
            Some(_) => { // the closing quote
                let lexeme = self.lexeme();
                let value = &lexeme[1..lexeme.len() - 1];
                Ok((TokenKind::String, Some(Literal::String(value.to_string()))))
            },
        }
    }

    fn extract_number(&mut self) -> (TokenKind, Option<Literal>) {
        self.advance_until(|n| !n.is_ascii_digit());

        let has_fraction = self.peek() == Some('.')
            && self.peek_second().map_or(false, |n| n.is_ascii_digit());
        if has_fraction {
            self.advance();
            self.advance_until(|n| !n.is_ascii_digit());
        }

        // Digits with an optional fractional part always parse as a float.
        let value = self.lexeme().parse::<f64>();
        debug_assert!(value.is_ok(), "number lexeme {:?} did not parse", self.lexeme());
        let value = value.unwrap_or_default();
        (TokenKind::Number, Some(Literal::Number(value)))
    }

    fn extract_identifier(&mut self) -> TokenKind {
        self.advance_until(|n| !is_part_of_valid_identifier(n));

        match KEYWORDS.get(self.lexeme()) {
            Some(kind) => *kind,
            None => TokenKind::Identifier,
        }
    }
}

fn can_start_identifier(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_part_of_valid_identifier(c: char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}
