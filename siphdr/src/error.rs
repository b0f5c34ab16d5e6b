use thiserror::Error;

use crate::message::UriError;

pub type Result<T> = std::result::Result<T, Error>;

/// A malformed header value, with the position where the
/// scanner stopped.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
#[error("{message} (line {line}, column {col})")]
pub struct SyntaxError {
    /// Message in error
    pub message: String,
    /// The line where the error occurred.
    pub line: usize,
    /// The column where the error occurred.
    pub col: usize,
}

impl SyntaxError {
    pub(crate) fn new<T>(message: T, position: &util::Position) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            message: message.as_ref().to_string(),
            line: position.line(),
            col: position.col(),
        }
    }
}

impl std::convert::From<util::Error> for SyntaxError {
    fn from(err: util::Error) -> Self {
        SyntaxError {
            message: err.kind.to_string(),
            line: err.line,
            col: err.col,
        }
    }
}

impl std::convert::From<util::Error> for Error {
    fn from(err: util::Error) -> Self {
        Self::Syntax(err.into())
    }
}

/// Errors returned by the header codecs.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum Error {
    #[error("the raw header is empty")]
    EmptyInput,

    #[error("raw is not a '{expected}' header")]
    WrongHeaderType { expected: &'static str },

    #[error("raw is not a supported header")]
    UnknownHeader,

    #[error("missing required '{0}' field")]
    MissingRequiredField(&'static str),

    #[error("the '{0}' field can not be encoded")]
    InvalidField(&'static str),

    #[error(transparent)]
    Uri(#[from] UriError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}
