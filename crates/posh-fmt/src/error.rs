//! Error types for the printer.

use posh_ast::ParseError;
use thiserror::Error;

/// Errors that can occur while pretty-printing.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Source code failed to parse.
    #[error("parse error: {0:?}")]
    Parse(Vec<ParseError>),

    /// Parser returned no syntax tree (unexpected state).
    #[error("parser produced no syntax tree")]
    NoAst,

    /// The tree contains a construct with no formatting rule. Fatal for
    /// the render call; there is no partial output.
    #[error("cannot print {0}")]
    Unsupported(String),

    /// I/O error reading the input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrintError {
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        PrintError::Unsupported(what.into())
    }
}
