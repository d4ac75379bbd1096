//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board storage, loading and editing.
///
/// Drag reconciliation never produces these: resolution misses are no-ops.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Board not found
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Duplicate ID
    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// A loaded board violates the data model invariants
    #[error("malformed board: {message}")]
    MalformedBoard { message: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The REST service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport-level failure talking to the REST service
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// Configuration could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a malformed board error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBoard {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(item_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.into(),
        }
    }

    /// Check if this error came from the network rather than from the data
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Http { .. })
    }
}

impl From<figment::Error> for BoardError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
