use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::scanner::token::Span;

/// What went wrong while scanning, without location.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unterminated string")]
    UnterminatedString,
}

/// A recoverable scan error. Display renders `[line N] Error: <message>`.
#[derive(Error, Debug, Diagnostic)]
pub enum ScanError {
    #[error("[line {line}] Error: unexpected character '{character}'")]
    #[diagnostic(code(slice::scan::unexpected_character))]
    UnexpectedCharacter {
        character: char,
        line: usize,
        #[label("here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("[line {line}] Error: unterminated string")]
    #[diagnostic(
        code(slice::scan::unterminated_string),
        help("close the string with a '\"' before the end of the input")
    )]
    UnterminatedString {
        /// Line of the opening quote.
        line: usize,
        #[label("string starts here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

impl ScanError {
    pub fn unexpected_character(character: char, line: usize, span: Span) -> Self {
        Self::UnexpectedCharacter {
            character,
            line,
            span: span.into(),
            src: NamedSource::new("input", String::new()),
        }
    }

    pub fn unterminated_string(line: usize, span: Span) -> Self {
        Self::UnterminatedString {
            line,
            span: span.into(),
            src: NamedSource::new("input", String::new()),
        }
    }

    pub fn kind(&self) -> ScanErrorKind {
        match self {
            Self::UnexpectedCharacter { character, .. } => {
                ScanErrorKind::UnexpectedCharacter(*character)
            }
            Self::UnterminatedString { .. } => ScanErrorKind::UnterminatedString,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. } | Self::UnterminatedString { line, .. } => *line,
        }
    }

    pub fn span(&self) -> Span {
        let span = match self {
            Self::UnexpectedCharacter { span, .. } | Self::UnterminatedString { span, .. } => span,
        };
        Span::new(span.offset(), span.len())
    }

    /// The message without the `[line N] Error:` prefix.
    pub fn message(&self) -> String {
        self.kind().to_string()
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        let src = NamedSource::new(name.into(), source.into());
        match self {
            Self::UnexpectedCharacter {
                character,
                line,
                span,
                ..
            } => Self::UnexpectedCharacter {
                character,
                line,
                span,
                src,
            },
            Self::UnterminatedString { line, span, .. } => {
                Self::UnterminatedString { line, span, src }
            }
        }
    }
}
