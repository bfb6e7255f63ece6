use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::printer::{self, Format};
use crate::report::{ErrorStyle, StderrReporter};
use crate::scanner;

const PROMPT: &str = "> ";
/// Ctrl-D typed as a literal character.
const END_OF_TRANSMISSION: char = '\u{4}';

/// Run the interactive prompt. Each line is scanned on its own and its
/// tokens printed; a scan error never ends the session.
pub fn run_repl(format: Format, style: ErrorStyle) -> Result<()> {
    let mut editor = DefaultEditor::new().context("open terminal for interactive prompt")?;

    println!("Welcome to Slice");
    println!("Press Ctrl-C/Ctrl-D to exit");

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("read line"),
        };

        if is_exit_request(&line) {
            break;
        }
        if is_blank(&line) {
            continue;
        }
        // History is a convenience; a full buffer is not worth stopping for.
        let _ = editor.add_history_entry(line.as_str());

        let mut reporter = StderrReporter::new("<repl>", &line, style);
        let output = scan_line(&line, format, &mut reporter)?;
        print!("{output}");
        if reporter.had_error() {
            debug!(line = %line, "line had scan errors");
        }
    }

    println!("Sayonara!");
    Ok(())
}

fn scan_line(line: &str, format: Format, reporter: &mut StderrReporter<'_>) -> Result<String> {
    let tokens = scanner::scan(line, reporter);
    printer::render(&tokens, format).context("render tokens")
}

fn is_exit_request(line: &str) -> bool {
    line.starts_with(END_OF_TRANSMISSION)
}

/// Blank lines print nothing, not even `EOF`.
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
