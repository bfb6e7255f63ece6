pub mod error;
pub mod printer;
pub mod repl;
pub mod report;
pub mod scanner;

// Re-export the common types for convenience
pub use error::{ScanError, ScanErrorKind};
pub use report::{ErrorCollector, Reporter};
pub use scanner::token::{Literal, Token, TokenKind};
