//! 字句エラーと診断の受け渡し
//!
//! スキャナ全体が失敗することはない。不正な構文はそれぞれ [`Diagnostic`] として
//! [`DiagnosticSink`] に渡され、スキャンはそのまま続行する。

use crate::lexer::Span;
use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use std::fmt;
use thiserror::Error;

/// 字句解析エラーの詳細
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string.")]
    UnterminatedString,

    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
}

impl LexError {
    fn label(&self) -> &'static str {
        match self {
            LexError::UnterminatedString => "string starts here and is never closed",
            LexError::UnexpectedCharacter(_) => "no token starts with this character",
        }
    }
}

/// 行番号付きのエラー報告
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    /// 追加の位置情報（スキャナは常に空のまま）
    pub location: String,
    pub error: LexError,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(line: usize, error: LexError, span: Span) -> Self {
        Self {
            line,
            location: String::new(),
            error,
            span,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_codespan<FileId: Copy>(&self, file_id: FileId) -> CodespanDiagnostic<FileId> {
        CodespanDiagnostic::error()
            .with_message(self.message())
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message(self.error.label())
            ])
            .with_notes(vec![format!("line {}", self.line)])
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "[line {}] Error: {}", self.line, self.error)
        } else {
            write!(
                f,
                "[line {}] Error at {}: {}",
                self.line, self.location, self.error
            )
        }
    }
}

/// スキャン中に発生した診断の受け取り先
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// 複数のエラーを報告順に蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<Diagnostic>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

impl DiagnosticSink for ErrorCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.errors.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering() {
        let diagnostic = Diagnostic::new(3, LexError::UnexpectedCharacter('@'), 5..6);
        assert_eq!(
            diagnostic.to_string(),
            "[line 3] Error: Unexpected character '@'."
        );

        let mut qualified = Diagnostic::new(1, LexError::UnterminatedString, 0..4);
        qualified.location = "end".to_string();
        assert_eq!(
            qualified.to_string(),
            "[line 1] Error at end: Unterminated string."
        );
    }

    #[test]
    fn test_collector() {
        let mut collector = ErrorCollector::new();
        assert!(!collector.has_errors());

        collector.report(Diagnostic::new(1, LexError::UnterminatedString, 0..2));
        collector.report(Diagnostic::new(2, LexError::UnexpectedCharacter('#'), 3..4));
        assert!(collector.has_errors());
        assert_eq!(collector.error_count(), 2);
        assert_eq!(collector.errors()[1].line, 2);
    }

    #[test]
    fn test_to_codespan() {
        let diagnostic = Diagnostic::new(2, LexError::UnterminatedString, 4..9);
        let converted = diagnostic.to_codespan(());
        assert_eq!(converted.message, "Unterminated string.");
        assert_eq!(converted.labels.len(), 1);
        assert_eq!(converted.labels[0].range, 4..9);
    }
}
