//! ドライバのテスト
//!
//! ファイル実行、REPL入力、実行ごとのエラー状態を検証する。

use codespan_reporting::term::termcolor::NoColor;
use loxlang::driver::{self, Emit, RunOptions, RunStatus, Session};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Write};

fn capture<F>(f: F) -> (String, String)
where
    F: FnOnce(&mut Vec<u8>, &mut NoColor<Vec<u8>>),
{
    let mut out = Vec::new();
    let mut err = NoColor::new(Vec::new());
    f(&mut out, &mut err);
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err.into_inner()).unwrap(),
    )
}

#[test]
fn test_run_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "print 1 + 2;").unwrap();

    let mut status = None;
    let (out, err) = capture(|out, err| {
        status = Some(driver::run_file(file.path(), RunOptions::default(), out, err).unwrap());
    });

    assert_eq!(status, Some(RunStatus::Clean));
    assert_eq!(err, "");
    assert_eq!(
        out,
        "PRINT print null\nNUMBER 1 1.0\nPLUS + null\nNUMBER 2 2.0\nSEMICOLON ; null\nEOF  null\n"
    );
}

#[test]
fn test_run_file_with_error_still_prints_tokens() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "a\nb ~ c").unwrap();

    let mut status = None;
    let (out, err) = capture(|out, err| {
        status = Some(driver::run_file(file.path(), RunOptions::default(), out, err).unwrap());
    });

    assert_eq!(status, Some(RunStatus::HadError));
    assert_eq!(status.map(RunStatus::exit_code), Some(65));
    assert_eq!(err, "[line 2] Error: Unexpected character '~'.\n");
    assert_eq!(
        out,
        "IDENTIFIER a null\nIDENTIFIER b null\nIDENTIFIER c null\nEOF  null\n"
    );
}

#[test]
fn test_run_file_decodes_invalid_utf8_lossily() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"x \xff y").unwrap();

    let session = Session::from_path(file.path()).unwrap();
    let outcome = session.scan();

    assert_eq!(outcome.status(), RunStatus::HadError);
    assert_eq!(outcome.errors.error_count(), 1);
    assert_eq!(outcome.tokens.len(), 3);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.lox");

    let result = Session::from_path(&missing);

    let message = format!("{:#}", result.err().unwrap());
    assert!(message.contains("Failed to read source file"));
    assert!(message.contains("missing.lox"));
}

#[test]
fn test_repl_runs_each_line_fresh() {
    let mut input = Cursor::new("var x = @;\nprint x;\n");

    let (out, err) = capture(|out, err| {
        driver::repl(&mut input, RunOptions::default(), out, err).unwrap();
    });

    // Both lines start at line 1 and the error stays with the first one.
    assert_eq!(err, "[line 1] Error: Unexpected character '@'.\n");
    assert_eq!(
        out,
        "> VAR var null\nIDENTIFIER x null\nEQUAL = null\nSEMICOLON ; null\nEOF  null\n\
         > PRINT print null\nIDENTIFIER x null\nSEMICOLON ; null\nEOF  null\n\
         > \n"
    );
}

#[test]
fn test_repl_commands() {
    let mut input = Cursor::new(":help\n:quit\nprint 1;\n");

    let (out, err) = capture(|out, err| {
        driver::repl(&mut input, RunOptions::default(), out, err).unwrap();
    });

    assert_eq!(err, "");
    assert!(out.contains(":quit, :q"));
    assert!(!out.contains("PRINT"));
}

#[test]
fn test_repl_json() {
    let mut input = Cursor::new("1\r\n");
    let options = RunOptions {
        emit: Emit::Json,
        ..RunOptions::default()
    };

    let (out, _) = capture(|out, err| {
        driver::repl(&mut input, options, out, err).unwrap();
    });

    let json = out
        .strip_prefix("> ")
        .and_then(|rest| rest.strip_suffix("> \n"))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value[0]["kind"], "NUMBER");
    assert_eq!(value[0]["literal"], 1.0);
    assert_eq!(value[0]["span"]["end"], 1);
    assert_eq!(value[1]["kind"], "EOF");
}
