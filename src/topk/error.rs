use thiserror::Error;

/// Errors surfaced by loading transactions and running a mining session.
#[derive(Error, Debug)]
pub enum MiningError {
    /// Reading the transaction file or writing the rules failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token in the transaction file is not a non-negative integer.
    #[error("line {line}: invalid item '{token}'")]
    Parse { line: usize, token: String },

    /// A run parameter or the input database cannot be mined.
    #[error("invalid parameter: {detail}")]
    InvalidParameter { detail: String },

    /// The cancellation flag was raised while expanding candidates.
    #[error("mining cancelled")]
    Cancelled,
}

impl MiningError {
    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;
