//! レキサーのメイン実装
//!
//! 先読み1文字（`.` が数値の一部かを判定する場合のみ2文字）で左から右へ1回だけ走査する。
//! 不正な入力は [`DiagnosticSink`] に報告して読み飛ばし、スキャン自体は必ず最後まで進む。

use super::literal_parser::{parse_number, string_contents};
use super::token::{Literal, Token, TokenKind};
use crate::error::{Diagnostic, DiagnosticSink, LexError};

/// Lox言語のスキャナ
///
/// [`Scanner::scan_tokens`] が所有権を消費するので、スキャンは毎回新しい状態から始まる。
pub struct Scanner<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    /// 現在の字句の開始位置（バイト）
    start: usize,
    /// 次に読む文字の位置（バイト）
    current: usize,
    /// `start` 時点の行番号
    start_line: usize,
    line: usize,
    error_count: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            start: 0,
            current: 0,
            start_line: 1,
            line: 1,
            error_count: 0,
        }
    }

    /// バッファ全体をスキャン。結果の末尾には必ず `Eof` が1つだけ付く
    pub fn scan_tokens<S>(mut self, sink: &mut S) -> Vec<Token<'src>>
    where
        S: DiagnosticSink + ?Sized,
    {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.scan_token(sink);
        }

        let end = self.source.len();
        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Literal::None,
            self.line,
            end..end,
        ));

        log::debug!(
            "scanned {} tokens over {} lines with {} errors",
            self.tokens.len(),
            self.line,
            self.error_count
        );
        self.tokens
    }

    fn scan_token<S>(&mut self, sink: &mut S)
    where
        S: DiagnosticSink + ?Sized,
    {
        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => self.add_either('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.add_either('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.add_either('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.add_either('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '/' => {
                if self.match_char('/') {
                    // 改行は行番号の更新のためメインループに残す
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(sink),
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),
            c => self.report(sink, LexError::UnexpectedCharacter(c)),
        }
    }

    fn string<S>(&mut self, sink: &mut S)
    where
        S: DiagnosticSink + ?Sized,
    {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.report(sink, LexError::UnterminatedString);
            return;
        }

        // 閉じ引用符
        self.advance();
        let value = string_contents(self.lexeme());
        self.add_literal(TokenKind::String, Literal::Str(value));
    }

    fn number(&mut self) {
        self.consume_digits();

        // 後ろに数字のない `.` は次のトークンになる
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.consume_digits();
        }

        let value = parse_number(self.lexeme());
        self.add_literal(TokenKind::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }

        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next()
    }

    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    fn add_either(&mut self, second: char, matched: TokenKind, single: TokenKind) {
        let kind = if self.match_char(second) {
            matched
        } else {
            single
        };
        self.add_token(kind);
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal(kind, Literal::None);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Literal<'src>) {
        let token = Token::new(
            kind,
            self.lexeme(),
            literal,
            self.start_line,
            self.start..self.current,
        );
        log::trace!("line {}: {}", token.line, token);
        self.tokens.push(token);
    }

    fn report<S>(&mut self, sink: &mut S, error: LexError)
    where
        S: DiagnosticSink + ?Sized,
    {
        self.error_count += 1;
        sink.report(Diagnostic::new(
            self.start_line,
            error,
            self.start..self.current,
        ));
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// ソースコードをトークン化
pub fn tokenize<'src, S>(source: &'src str, sink: &mut S) -> Vec<Token<'src>>
where
    S: DiagnosticSink + ?Sized,
{
    Scanner::new(source).scan_tokens(sink)
}

/// デバッグ用：行番号付きでトークンストリームを文字列として出力
pub fn format_tokens(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| format!("{:>4} | {}", t.line, t))
        .collect::<Vec<_>>()
        .join("\n")
}
