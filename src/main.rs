use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use slice_lang::printer::{self, Format};
use slice_lang::report::{ErrorStyle, StderrReporter};
use slice_lang::{repl, scanner};

// sysexits.h
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_IOERR: u8 = 74;

#[derive(Parser, Debug)]
#[command(name = "slice", version, about = "Scan Slice scripts into tokens")]
struct Cli {
    /// Slice script to scan (omit for an interactive prompt)
    script: Option<PathBuf>,

    /// Token output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Report errors as `[line N] Error: ...` instead of annotated source
    #[arg(long)]
    plain_errors: bool,
}

impl Cli {
    fn error_style(&self) -> ErrorStyle {
        if self.plain_errors {
            ErrorStyle::Plain
        } else {
            ErrorStyle::Fancy
        }
    }
}

/// Install a stderr subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=slice_lang=trace` to see every token.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read script '{}'", path.display()))
}

fn run_file(path: &Path, format: Format, style: ErrorStyle) -> Result<ExitCode> {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Ok(ExitCode::from(EX_IOERR));
        }
    };
    debug!(path = %path.display(), bytes = source.len(), "scanning script");

    let name = path.display().to_string();
    let mut reporter = StderrReporter::new(&name, &source, style);
    let tokens = scanner::scan(&source, &mut reporter);
    print!("{}", printer::render(&tokens, format).context("render tokens")?);

    if reporter.had_error() {
        Ok(ExitCode::from(EX_DATAERR))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let format: Format = cli.format.parse().context("token format")?;
    match &cli.script {
        Some(path) => run_file(path, format, cli.error_style()),
        None => {
            repl::run_repl(format, cli.error_style())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EX_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
