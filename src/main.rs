use anyhow::Result;
use clap::Parser;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use loxlang::driver::{self, DiagnosticStyle, Emit, RunOptions};

/// Exit status for command line usage errors (EX_USAGE)
const EXIT_USAGE: i32 = 64;

#[derive(Parser)]
#[command(name = "loxlang")]
#[command(author, version, about = "Scan Lox source into tokens", long_about = None)]
struct Cli {
    /// Script to scan; starts an interactive prompt when omitted
    script: Option<PathBuf>,

    /// How to print the scanned tokens
    #[arg(long, value_enum, default_value_t = Emit::Tokens)]
    emit: Emit,

    /// How to render lexical errors
    #[arg(long, value_enum, default_value_t = DiagnosticStyle::Plain)]
    diagnostics: DiagnosticStyle,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            e.print()?;
            std::process::exit(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    };

    // RUST_LOG still wins over --verbose
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = RunOptions {
        emit: cli.emit,
        diagnostics: cli.diagnostics,
    };

    let color = if io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut err = StandardStream::stderr(color);

    if cli.script.is_none() && io::stdin().is_terminal() {
        println!("{}", "Lox REPL".blue().bold());
        println!("Type ':quit' or ':q' to exit, ':help' for help\n");
    }
    let mut out = io::stdout().lock();

    let result = match cli.script {
        Some(path) => driver::run_file(&path, options, &mut out, &mut err),
        None => driver::repl(&mut io::stdin().lock(), options, &mut out, &mut err)
            .map(|()| driver::RunStatus::Clean),
    };
    out.flush()?;

    match result {
        Ok(status) if status.had_error() => std::process::exit(status.exit_code()),
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}
