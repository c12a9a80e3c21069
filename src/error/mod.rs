use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Session store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// API request failure
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Workflow failure
    #[error("{0}")]
    Portal(#[from] PortalError),
}

/// Session store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not open the database
    #[error("Database connection failed: {message}")]
    Connection {
        /// Underlying cause
        message: String,
    },

    /// Statement failed
    #[error("Query failed: {message}")]
    Query {
        /// Underlying cause
        message: String,
    },

    /// Schema migration failed
    #[error("Migration failed: {message}")]
    Migration {
        /// Underlying cause
        message: String,
    },

    /// Value could not be serialized for storage
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Underlying cause
        message: String,
    },

    /// Raw driver error
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Authenticated request errors
///
/// Every variant renders as a single human-readable message; callers that
/// only show a banner can use `to_string()` without matching.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Transport failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No response within the configured timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Body was not valid JSON
    #[error("Invalid response: {message}")]
    ResponseParse {
        /// Parser error
        message: String,
    },

    /// Server answered with a failure status; `message` is the server's
    /// `error` field or the generic fallback.
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message shown to the user
        message: String,
    },

    /// Body was JSON but not the expected shape
    #[error("Unexpected response shape: {message}")]
    Decode {
        /// Decoder error
        message: String,
    },

    /// Request URL could not be built
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// Offending URL
        url: String,
    },

    /// Header name or value is not valid HTTP
    #[error("Invalid header: {name}")]
    InvalidHeader {
        /// Header name
        name: String,
    },

    /// Request body could not be serialized
    #[error("Failed to encode request body: {message}")]
    Encode {
        /// Serializer error
        message: String,
    },
}

/// Client-side form validation errors, raised before any network call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// No trading product selected
    #[error("Select at least one trading product")]
    NoTradingProduct,

    /// A required field is blank
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name
        field: String,
    },
}

/// Portal workflow errors
#[derive(Debug, Error)]
pub enum PortalError {
    /// API request failed
    #[error("{0}")]
    Request(#[from] RequestError),

    /// Session store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Form rejected locally
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No token stored
    #[error("Not logged in")]
    NotLoggedIn,

    /// The server answered 2xx but reported `success: false`.
    #[error("{message}")]
    Rejected {
        /// Server message or workflow default
        message: String,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for API requests
pub type RequestResult<T> = Result<T, RequestError>;

/// Result type alias for portal workflows
pub type PortalResult<T> = Result<T, PortalError>;
