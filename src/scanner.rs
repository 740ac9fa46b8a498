//! Module `scanner` implements a one‑pass, streaming lexer for the Rox language.
//!
//! It transforms source text into a sequence of [`Token`]s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a
//! `FusedIterator`, it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &str) -> Scanner<'_>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token, LoxError>` on each `.next()`. A lexing error does
//!   not stop the scan: the following call resumes after the offending input.
//!
//! - `tokenize(src: &str) -> (Vec<Token>, Vec<LoxError>)`
//!   Drain a scanner, separating tokens from errors.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `.`, `-`, `+`, `;`, `*`.
//! - One‑or‑two character operators: `!`, `!=`, `=`, `==`, `<`, `<=`, `>`, `>=`.
//! - `/` or a `//` comment running to end of line (skipped via `memchr`).
//! - String literals: `"` … `"`, multi‑line allowed, unterminated is an error.
//! - Numeric literals: `digits ('.' digits)?`.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a
//!   perfect‑hash `KEYWORDS` map.
//!
//! # Example
//!
//! ```rust
//! use rox::scanner::Scanner;
//!
//! let mut scanner = Scanner::new("print 123; // example");
//! for result in &mut scanner {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("{}", err),
//!     }
//! }
//! ```

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    text: &'a str, // entire source, used for lexeme slicing
    src: &'a [u8], // same source viewed as bytes
    start: usize,  // first byte of the current lexeme
    curr: usize,   // one past the last byte examined
    line: usize,   // 1‑based
    done: bool,    // EOF already emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            done: false,
        }
    }

    // ───────────────────────────── byte cursor ─────────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.get(self.curr).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.src.get(self.curr + 1).copied().unwrap_or(0)
    }

    /// `double` when the next byte is `=` (consuming it), else `single`.
    #[inline(always)]
    fn with_equal(&mut self, double: TokenType, single: TokenType) -> TokenType {
        if self.peek() == b'=' {
            self.curr += 1;
            double
        } else {
            single
        }
    }

    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        &self.text[self.start..self.curr]
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Step over whitespace, newlines and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => self.curr += 1,

                b'\n' => {
                    self.line += 1;
                    self.curr += 1;
                }

                b'/' if self.peek_next() == b'/' => {
                    // Stop on the newline; the arm above counts it.
                    self.curr = match memchr(b'\n', &self.src[self.curr..]) {
                        Some(pos) => self.curr + pos,
                        None => self.src.len(),
                    };
                }

                _ => return,
            }
        }
    }

    /// Scan the lexeme starting at `self.start`.  Trivia has already been
    /// skipped, so every call yields a token kind or an error.
    fn scan_token(&mut self) -> Result<TokenType> {
        let tt = match self.advance() {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,
            b'/' => TokenType::SLASH,

            b'!' => self.with_equal(TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.with_equal(TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.with_equal(TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.with_equal(TokenType::GREATER_EQUAL, TokenType::GREATER),

            b'"' => self.string()?,
            b'0'..=b'9' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            _ => {
                // Take the rest of a multi‑byte character so the report names
                // all of it and scanning resumes on a char boundary.
                while (self.peek() & 0b1100_0000) == 0b1000_0000 {
                    self.curr += 1;
                }

                return Err(LoxError::lex(
                    self.line,
                    format!(" at '{}'", self.lexeme()),
                    "Unexpected character.",
                ));
            }
        };

        Ok(tt)
    }

    /// `"…"` with the opening quote already consumed.  Newlines are allowed
    /// inside and counted.
    fn string(&mut self) -> Result<TokenType> {
        let body: usize = self.curr;

        loop {
            match self.peek() {
                b'"' => break,
                b'\n' => self.line += 1,
                _ if self.is_at_end() => {
                    return Err(LoxError::lex(self.line, " at end", "Unterminated string."));
                }
                _ => {}
            }
            self.curr += 1;
        }

        let value: String = self.text[body..self.curr].to_owned();
        self.curr += 1;

        Ok(TokenType::STRING(value))
    }

    fn skip_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.curr += 1;
        }
    }

    /// `digits ('.' digits)?`.  A trailing `.` is left for the next token.
    fn number(&mut self) -> TokenType {
        self.skip_digits();

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.curr += 1;
            self.skip_digits();
        }

        // Only ASCII digits and at most one inner dot were taken.
        TokenType::NUMBER(self.lexeme().parse::<f64>().unwrap_or(0.0))
    }

    fn identifier(&mut self) -> TokenType {
        while matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.curr += 1;
        }

        KEYWORDS
            .get(self.lexeme().as_bytes())
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.skip_trivia();

        if self.is_at_end() {
            self.done = true;
            debug!("Reached end of input on line {}", self.line);
            return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
        }

        self.start = self.curr;

        Some(self.scan_token().map(|tt| {
            debug!("Scanned token ({:?}) on line {}", tt, self.line);
            Token::new(tt, self.lexeme(), self.line)
        }))
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan all of `source`, collecting every token and every lexical error.
/// The token list always ends with `EOF`.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LoxError>) {
    let mut tokens: Vec<Token> = Vec::new();
    let mut errors: Vec<LoxError> = Vec::new();

    for item in Scanner::new(source) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => {
                debug!("Lex error collected: {}", e);
                errors.push(e);
            }
        }
    }

    info!(
        "Tokenized {} token(s) with {} error(s)",
        tokens.len(),
        errors.len()
    );

    (tokens, errors)
}
