//! Storage error types.

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to initialize the storage backend.
    #[error("storage initialization failed: {0}")]
    Init(String),

    /// Malformed caller input (empty names, reserved characters).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Object not found under the given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend unreachable or rejected our credentials.
    #[error("store unavailable during {operation} on {key:?}: {message}")]
    Unavailable {
        /// Operation that was in flight.
        operation: &'static str,
        /// Storage key involved, if any.
        key: String,
        /// Backend-reported reason.
        message: String,
    },

    /// Backend reported a capacity or rate limit.
    #[error("quota exceeded during {operation} on {key:?}: {message}")]
    QuotaExceeded {
        /// Operation that was in flight.
        operation: &'static str,
        /// Storage key involved, if any.
        key: String,
        /// Backend-reported reason.
        message: String,
    },

    /// Any other backend failure, kept with its operation context.
    #[error("{operation} failed on {key:?}: {source}")]
    Backend {
        /// Operation that was in flight.
        operation: &'static str,
        /// Storage key involved, if any.
        key: String,
        /// Underlying OpenDAL error.
        #[source]
        source: opendal::Error,
    },
}

impl StorageError {
    /// Creates a new initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Creates a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a new not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Maps a backend error into the storage taxonomy, keeping the
    /// originating operation and key as context.
    ///
    /// Not-found and auth/transport failures get their own variants so
    /// callers can translate them into status codes without inspecting
    /// OpenDAL error kinds themselves.
    pub fn from_op(operation: &'static str, key: &str, err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(key.to_string()),
            ErrorKind::PermissionDenied => Self::Unavailable {
                operation,
                key: key.to_string(),
                message: err.to_string(),
            },
            ErrorKind::RateLimited => Self::QuotaExceeded {
                operation,
                key: key.to_string(),
                message: err.to_string(),
            },
            // Transient transport failures are still "store unavailable"
            // from the caller's point of view.
            ErrorKind::Unexpected if err.is_temporary() => Self::Unavailable {
                operation,
                key: key.to_string(),
                message: err.to_string(),
            },
            _ => Self::Backend {
                operation,
                key: key.to_string(),
                source: err,
            },
        }
    }

    /// Returns whether this error indicates a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
