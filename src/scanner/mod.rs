pub mod lexer;
pub mod token;

use crate::error::ScanError;
use crate::report::{ErrorCollector, Reporter};
use lexer::Scanner;
use token::Token;

/// Scan source code into a list of tokens, handing errors to `reporter`.
///
/// The returned list always ends with a single `EOF` token, whatever was
/// reported along the way.
pub fn scan(source: &str, reporter: &mut dyn Reporter) -> Vec<Token> {
    Scanner::new(source, reporter).scan_tokens()
}

/// Scan source code, returning the tokens only if nothing was reported.
pub fn scan_all(source: &str) -> Result<Vec<Token>, Vec<ScanError>> {
    let mut collector = ErrorCollector::new();
    let tokens = scan(source, &mut collector);
    if collector.had_error() {
        Err(collector.into_errors())
    } else {
        Ok(tokens)
    }
}
