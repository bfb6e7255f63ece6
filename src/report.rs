//! Error side channel for the scanner.
//!
//! The scanner never stops on a bad character; it hands each [`ScanError`]
//! to a [`Reporter`] and keeps going. Whether any report makes a run fatal is
//! up to the caller, which asks its reporter afterwards.

use miette::GraphicalReportHandler;

use crate::error::ScanError;

pub trait Reporter {
    fn report(&mut self, error: ScanError);
}

impl Reporter for Vec<ScanError> {
    fn report(&mut self, error: ScanError) {
        self.push(error);
    }
}

/// Collects every reported error for later inspection.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ScanError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ScanError> {
        self.errors
    }

    pub fn reset(&mut self) {
        self.errors.clear();
    }
}

impl Reporter for ErrorCollector {
    fn report(&mut self, error: ScanError) {
        self.errors.push(error);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStyle {
    /// `[line N] Error: <message>`
    Plain,
    /// miette graphical report with the offending source excerpt.
    #[default]
    Fancy,
}

/// Prints each error to stderr as it arrives and remembers that one did.
pub struct StderrReporter<'a> {
    name: &'a str,
    source: &'a str,
    style: ErrorStyle,
    had_error: bool,
}

impl<'a> StderrReporter<'a> {
    pub fn new(name: &'a str, source: &'a str, style: ErrorStyle) -> Self {
        Self {
            name,
            source,
            style,
            had_error: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn render(&self, error: ScanError) -> String {
        match self.style {
            ErrorStyle::Plain => error.to_string(),
            ErrorStyle::Fancy => {
                let error = error.with_source_code(self.name, self.source);
                let mut out = String::new();
                match GraphicalReportHandler::new().render_report(&mut out, &error) {
                    Ok(()) => out,
                    Err(_) => error.to_string(),
                }
            }
        }
    }
}

impl Reporter for StderrReporter<'_> {
    fn report(&mut self, error: ScanError) {
        self.had_error = true;
        eprintln!("{}", self.render(error));
    }
}
