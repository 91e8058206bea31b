use thiserror::Error;

/// Coarse failure category shared by every core operation.
///
/// A presentation shell only needs to branch on this; the variant of
/// [`MarketError`] carries the detail for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Schema,
    Parse,
    Validation,
    CountMismatch,
    SameMarket,
    Persist,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Schema => write!(f, "schema"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::CountMismatch => write!(f, "count_mismatch"),
            ErrorKind::SameMarket => write!(f, "same_market"),
            ErrorKind::Persist => write!(f, "persist"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MarketError {
    /// The backing record store does not exist.
    #[error("market file not found: {path}")]
    SourceNotFound { path: String },

    #[error("market '{0}' not found")]
    MarketNotFound(String),

    #[error("market file is missing required column '{0}'")]
    MissingColumn(String),

    #[error("failed to read {path}: {source}")]
    SourceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed market data at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("{0}")]
    Validation(String),

    #[error("expected {expected} staff counts (one per market), got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("cannot compare market '{0}' with itself")]
    SameMarket(String),

    #[error("failed to save {path}: {reason}")]
    Persist { path: String, reason: String },
}

impl MarketError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::SourceNotFound { .. } | MarketError::MarketNotFound(_) => {
                ErrorKind::NotFound
            }
            MarketError::MissingColumn(_) => ErrorKind::Schema,
            MarketError::SourceIo { .. } | MarketError::Parse { .. } => ErrorKind::Parse,
            MarketError::Validation(_) => ErrorKind::Validation,
            MarketError::CountMismatch { .. } => ErrorKind::CountMismatch,
            MarketError::SameMarket(_) => ErrorKind::SameMarket,
            MarketError::Persist { .. } => ErrorKind::Persist,
        }
    }
}

/// Errors raised while reading runtime configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
