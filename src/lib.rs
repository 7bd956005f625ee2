//! Lox Language Front End Library
//!
//! This library provides the scanner for the Lox language together with the
//! driver that runs it over script files and interactive lines.

pub mod driver;
pub mod error;
pub mod lexer;

// Re-export commonly used types
pub use driver::{RunOptions, RunStatus, Session};
pub use error::{Diagnostic, DiagnosticSink, ErrorCollector, LexError};
pub use lexer::{tokenize, Literal, Scanner, Token, TokenKind};
