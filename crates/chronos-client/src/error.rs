//! Error types for scheduler requests.
//!
//! Errors are categorized so the CLI can tell the operator whether the
//! scheduler, the network, or the request itself is at fault. Nothing in this
//! crate retries on its own.

use std::fmt;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout, TLS.
    Network,
    /// The scheduler answered with a 5xx.
    Server,
    /// The scheduler rejected the request (4xx).
    Client,
    /// The response couldn't be understood.
    Format,
    /// Bad URI or credentials given to the client.
    Config,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Server => "Scheduler error",
            Self::Client => "Request rejected by the scheduler",
            Self::Format => "Unexpected response",
            Self::Config => "Invalid client configuration",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that the scheduler URI is reachable",
            Self::Server => "Check the scheduler logs; the job may reference unknown parents",
            Self::Client => "Check the job definition and the credentials",
            Self::Format => "Check that the URI points at a Chronos scheduler",
            Self::Config => "Check the --uri and --http-auth values",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur talking to the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scheduler answered with an error status.
    #[error("HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body couldn't be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A delete answered with something other than an empty body.
    #[error("unexpected response deleting {name}: {body}")]
    UnexpectedBody {
        /// Job being deleted.
        name: String,
        /// What came back.
        body: String,
    },

    /// The base URI can't be used.
    #[error("invalid scheduler URI '{0}'")]
    InvalidUri(String),

    /// Credentials not of the form `user:password`.
    #[error("credentials must be of the form user:password")]
    InvalidCredentials,
}

impl Error {
    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status } if *status >= 500 => ErrorCategory::Server,
            Self::Http { .. } => ErrorCategory::Client,
            Self::Transport(_) => ErrorCategory::Network,
            Self::InvalidResponse(_) | Self::UnexpectedBody { .. } => ErrorCategory::Format,
            Self::InvalidUri(_) | Self::InvalidCredentials => ErrorCategory::Config,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::Http { status },
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
