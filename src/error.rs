// Error types
// Everything the library can fail with lives in one enum

use thiserror::Error;

/// Errors raised by the library
///
/// The five query operations only ever produce `QueryExecution`; the other
/// variants come from validating ad-hoc SQL in the read-only shell.
#[derive(Debug, Error)]
pub enum Error {
    /// The store rejected or failed to execute a statement
    #[error("query execution failed: {0}")]
    QueryExecution(#[from] rusqlite::Error),

    #[error("SQL parsing error: {0}")]
    SqlParse(#[from] sqlparser::parser::ParserError),

    /// Ad-hoc SQL that is not a single read-only query
    #[error("only a single SELECT statement is allowed: {0}")]
    NotReadOnly(String),
}

pub type Result<T> = std::result::Result<T, Error>;
