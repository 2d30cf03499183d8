//! Error types and handling for the Vault KV SDK
//!
//! Every failure is surfaced to the caller as an [`Error`]. Errors that
//! originate from an HTTP response carry the status code and the messages the
//! server put in its `{"errors": [...]}` body. Token values never appear in
//! error messages.
//!
//! # Error Categories
//!
//! [`Error::kind`] groups the variants into a small taxonomy:
//!
//! - **Configuration**: invalid client construction inputs
//! - **Authentication**: token missing, rejected or expired (401/403)
//! - **NotFound**: the path does not exist or its latest version is deleted (404)
//! - **Validation**: malformed request, rejected locally or by the server (400)
//! - **Transport**: connection, TLS and timeout failures
//! - **Server**: remote-side failure (5xx)
//!
//! # Example
//!
//! ```no_run
//! # use vault_kv_sdk::{Client, Error, ErrorKind};
//! # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
//! match client.read("secret/data/app").await {
//!     Ok(secret) => println!("Got secret v{}", secret.metadata.version),
//!     Err(Error::NotFound { .. }) => println!("Secret not found"),
//!     Err(e) if e.kind() == ErrorKind::Authentication => println!("Access denied"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration
    #[error("config: {0}")]
    Config(String),

    /// Missing, invalid or expired token
    #[error("auth: {message}")]
    Auth {
        /// HTTP status code, `None` when rejected before sending
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Path absent, or its latest version deleted or destroyed
    #[error("not found: {path}")]
    NotFound {
        /// Logical path that was requested
        path: String,
        /// Messages from the server, if any
        messages: Vec<String>,
    },

    /// Malformed request
    #[error("validation: {message}")]
    Validation {
        /// HTTP status code, `None` when rejected before sending
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Network, DNS or TLS failure
    #[error("transport: {0}")]
    Transport(String),

    /// Request deadline exceeded
    #[error("timeout")]
    Timeout,

    /// Remote-side failure (5xx)
    #[error("server {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Any other non-success status
    #[error("http {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Response body could not be decoded
    #[error("deserialize: {0}")]
    Deserialize(String),
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad client construction inputs
    Configuration,
    /// Token missing or rejected
    Authentication,
    /// Path absent
    NotFound,
    /// Malformed request body or path
    Validation,
    /// Connectivity, timeout or TLS failures
    Transport,
    /// Remote-side failure
    Server,
    /// Unexpected statuses and undecodable responses
    Other,
}

impl Error {
    /// Get the error kind for categorization
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Auth { .. } => ErrorKind::Authentication,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Transport(_) | Error::Timeout => ErrorKind::Transport,
            Error::Server { .. } => ErrorKind::Server,
            Error::Http { .. } | Error::Deserialize(_) => ErrorKind::Other,
        }
    }

    /// Get the HTTP status code if the error came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } | Error::Validation { status, .. } => *status,
            Error::NotFound { .. } => Some(404),
            Error::Server { status, .. } | Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Build an error from a non-success response status and the messages
    /// found in its body.
    pub(crate) fn from_response(status: u16, path: &str, messages: Vec<String>) -> Self {
        let message = if messages.is_empty() {
            format!("HTTP error {}", status)
        } else {
            messages.join("; ")
        };

        match status {
            400 => Error::Validation {
                status: Some(status),
                message,
            },
            401 | 403 => Error::Auth {
                status: Some(status),
                message,
            },
            404 => Error::NotFound {
                path: path.to_string(),
                messages,
            },
            500..=599 => Error::Server { status, message },
            _ => Error::Http { status, message },
        }
    }
}

/// Server error response structure
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() || err.is_request() {
            Error::Transport(with_sources(&err))
        } else if err.is_decode() {
            Error::Deserialize(with_sources(&err))
        } else if err.is_builder() {
            Error::Config(with_sources(&err))
        } else {
            Error::Transport(with_sources(&err))
        }
    }
}

/// Render an error followed by its source chain, `outer: inner: root`
fn with_sources(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message in their own
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Deserialize(err.to_string())
    }
}
