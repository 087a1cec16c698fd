use thiserror::Error;

/// The result type for the `rgx` crate.
pub type Result<T> = std::result::Result<T, RgxError>;

/// The error type for the `rgx` crate.
#[derive(Error, Debug)]
pub struct RgxError {
    /// The source of the error.
    pub source: Box<RgxErrorKind>,
}

impl RgxError {
    /// Create a new `RgxError`.
    pub fn new(kind: RgxErrorKind) -> Self {
        RgxError {
            source: Box::new(kind),
        }
    }

    /// Create a parse error with the given message and pattern offset.
    pub(crate) fn parse<T: Into<String>>(message: T, position: usize) -> Self {
        RgxError::new(RgxErrorKind::ParseError {
            message: message.into(),
            position,
        })
    }

    /// Create an invalid argument error with the given reason.
    pub(crate) fn invalid_argument<T: Into<String>>(reason: T) -> Self {
        RgxError::new(RgxErrorKind::InvalidArgument {
            reason: reason.into(),
        })
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &RgxErrorKind {
        &self.source
    }
}

impl std::fmt::Display for RgxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum RgxErrorKind {
    /// A syntactic failure detected while compiling a pattern.
    /// The position is a 0-based code point offset into the pattern.
    #[error("parse error at offset {position}: {message}")]
    ParseError {
        /// Description of the syntactic failure.
        message: String,
        /// 0-based code point offset into the pattern.
        position: usize,
    },

    /// An over-length pattern or input, or an invalid configuration value.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the violated constraint.
        reason: String,
    },

    /// The backtracking matcher exhausted its backtrack budget.
    #[error("backtrack limit exceeded: {actual} backtracks, limit {limit}")]
    BacktrackLimitExceeded {
        /// The configured backtrack budget.
        limit: u64,
        /// The number of backtracks performed when the budget was hit.
        actual: u64,
    },

    /// A matcher exceeded its wall-clock budget.
    #[error("operation timed out after {elapsed_ms} ms, budget {timeout_ms} ms")]
    Timeout {
        /// The configured wall-clock budget in milliseconds.
        timeout_ms: u64,
        /// The elapsed wall-clock time in milliseconds.
        elapsed_ms: u64,
    },

    /// An internal invariant was violated. Should never occur.
    #[error("internal error: {0}")]
    Internal(String),
}
