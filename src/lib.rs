//! A scanner for the Lox scripting language.
//!
//! [`scan_all`] turns a complete source text into tokens, always ending with
//! an `EndOfFile` marker. Malformed lexemes are skipped and handed to a
//! [`Reporter`] so one pass surfaces every lexical error.

pub mod error;
pub mod scanner;
pub mod token;

pub use crate::{
    error::{Error, ErrorKind, Reporter, Result, StreamReporter},
    scanner::Scanner,
    token::{Literal, Token, TokenKind},
};

pub fn scan_all<R: Reporter + ?Sized>(source: &str, reporter: &mut R) -> Vec<Token> {
    Scanner::new(source).scan_tokens(reporter)
}
