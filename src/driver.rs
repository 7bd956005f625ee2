//! スクリプトファイルとREPL入力に対するスキャナの実行
//!
//! 実行ごとに新しい [`Session`] を作り、それぞれが自分の [`RunStatus`] を返す。
//! REPLのある行のエラーが次の行に持ち越されることはない。

use crate::error::ErrorCollector;
use crate::lexer::{format_tokens, tokenize, Token};
use anyhow::{Context, Result};
use clap::ValueEnum;
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::WriteColor;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

/// 字句エラーがあったスクリプトの終了コード（EX_DATAERR）
pub const EXIT_DATA_ERROR: i32 = 65;

/// トークンの出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// One token per line: `KIND lexeme literal`
    #[default]
    #[value(name = "tokens")]
    Tokens,
    /// A JSON array of tokens
    #[value(name = "json")]
    Json,
    /// Line numbers in a gutter, for debugging
    #[value(name = "debug")]
    Debug,
}

/// 診断メッセージの表示形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DiagnosticStyle {
    /// `[line N] Error: message`
    #[default]
    #[value(name = "plain")]
    Plain,
    /// Source snippet with the offending span underlined
    #[value(name = "rich")]
    Rich,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    pub emit: Emit,
    pub diagnostics: DiagnosticStyle,
}

/// 1回の実行結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    HadError,
}

impl RunStatus {
    pub fn had_error(self) -> bool {
        self == RunStatus::HadError
    }

    /// スクリプト実行時のプロセス終了コード
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::HadError => EXIT_DATA_ERROR,
        }
    }
}

/// 1回のスキャンで得られたトークンと診断
pub struct ScanOutcome<'src> {
    pub tokens: Vec<Token<'src>>,
    pub errors: ErrorCollector,
}

impl ScanOutcome<'_> {
    pub fn status(&self) -> RunStatus {
        if self.errors.has_errors() {
            RunStatus::HadError
        } else {
            RunStatus::Clean
        }
    }
}

/// 1つのソースバッファとその名前
pub struct Session {
    name: String,
    source: String,
}

impl Session {
    /// ディスクからスクリプトを読み込む（不正なUTF-8は置換文字になる）
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read source file: {}", path.display()))?;
        let source = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Self::from_string(path.display().to_string(), source))
    }

    pub fn from_string(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn scan(&self) -> ScanOutcome<'_> {
        let mut errors = ErrorCollector::new();
        let tokens = tokenize(&self.source, &mut errors);
        ScanOutcome { tokens, errors }
    }

    pub fn report_diagnostics(
        &self,
        errors: &ErrorCollector,
        style: DiagnosticStyle,
        err: &mut dyn WriteColor,
    ) -> Result<()> {
        match style {
            DiagnosticStyle::Plain => {
                for diagnostic in errors.errors() {
                    writeln!(err, "{}", diagnostic)?;
                }
            }
            DiagnosticStyle::Rich => {
                let config = term::Config::default();
                let file = SimpleFile::new(self.name(), self.source());
                for diagnostic in errors.errors() {
                    term::emit(err, &config, &file, &diagnostic.to_codespan(()))
                        .context("Failed to emit diagnostic")?;
                }
            }
        }
        Ok(())
    }
}

pub fn emit_tokens(tokens: &[Token<'_>], emit: Emit, out: &mut dyn Write) -> Result<()> {
    match emit {
        Emit::Tokens => {
            for token in tokens {
                writeln!(out, "{}", token)?;
            }
        }
        Emit::Json => {
            serde_json::to_writer_pretty(&mut *out, tokens)
                .context("Failed to serialize tokens")?;
            writeln!(out)?;
        }
        Emit::Debug => {
            writeln!(out, "{}", format_tokens(tokens))?;
        }
    }
    Ok(())
}

/// セッションをスキャンし、診断を報告してトークンを出力する
pub fn run(
    session: &Session,
    options: RunOptions,
    out: &mut dyn Write,
    err: &mut dyn WriteColor,
) -> Result<RunStatus> {
    let outcome = session.scan();
    session.report_diagnostics(&outcome.errors, options.diagnostics, err)?;
    emit_tokens(&outcome.tokens, options.emit, out)?;

    let status = outcome.status();
    log::debug!("{}: {:?}", session.name(), status);
    Ok(status)
}

pub fn run_file<P: AsRef<Path>>(
    path: P,
    options: RunOptions,
    out: &mut dyn Write,
    err: &mut dyn WriteColor,
) -> Result<RunStatus> {
    log::info!("Running {}", path.as_ref().display());
    let session = Session::from_path(path)?;
    run(&session, options, out, err)
}

const REPL_HELP: &str = "REPL commands:
  :quit, :q    Exit the REPL
  :help, :h    Show this help message

Any other line is scanned and its tokens are printed.";

/// EOFか `:quit` まで1行ずつ読み込み、各行を独立した実行としてスキャンする
pub fn repl(
    input: &mut dyn BufRead,
    options: RunOptions,
    out: &mut dyn Write,
    err: &mut dyn WriteColor,
) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let source = line.trim_end_matches(['\n', '\r']);

        match source.trim() {
            ":quit" | ":q" => break,
            ":help" | ":h" => {
                writeln!(out, "{}", REPL_HELP)?;
                continue;
            }
            _ => {}
        }

        let session = Session::from_string("<repl>", source);
        // エラーはその行だけに影響する
        run(&session, options, out, err)?;
    }
    Ok(())
}
