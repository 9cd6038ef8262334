use thiserror::Error;

use super::Lit;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// The literal refers to a node which does not exist (yet) in the AIG.
    /// Either the ingestion stream is malformed, or a transform has a defect.
    #[error("literal {0} refers to a node which does not exist")]
    InvalidReference(Lit),

    /// The AIG has reached an invalid state. This should never happen
    /// through the public API; it is reported by [`Aig::check_integrity`].
    ///
    /// [`Aig::check_integrity`]: crate::Aig::check_integrity
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// The simulator received a number of pattern words different from the number of inputs.
    #[error("expected {expected} input pattern words, got {found}")]
    InputCountMismatch { expected: usize, found: usize },

    /// Exhaustive simulation was requested on too many inputs.
    #[error("{0} inputs is too many for exhaustive simulation")]
    TooManyInputs(usize),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),
}

/// Error returned when parsing from file failed.
///
/// It is defined here because the `parser` module is private.
#[derive(Debug, Error)]
pub enum ParserError {
    /// All features are not supported (only the combinational core and opaque latches).
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid token, something else was expected.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A literal refers to a variable which has not been defined before.
    #[error("literal {0} refers to an undefined variable")]
    UndefinedLiteral(u64),

    /// An IO error occured (file doesn't exist, or doesn't have the right extension, ...).
    #[error("io error: {0}")]
    IoError(String),
}
