//! Lexical analysis module for the Lox language.
//!
//! Turns source text into an ordered sequence of [`Token`]s terminated by a
//! single `Eof` token. Lexical errors are reported through a
//! [`DiagnosticSink`](crate::error::DiagnosticSink) and never abort the scan.

mod literal_parser;
mod scanner;
mod token;

pub use scanner::{format_tokens, tokenize, Scanner};
pub use token::{Literal, Span, Token, TokenKind};
