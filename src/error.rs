//! Defines the crate level error type shared by the API client and the CLI.

use reqwest::StatusCode;

/// The errors that may occur while talking to the pocketbook backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-2xx status code.
    ///
    /// `message` is the server-supplied `error` field when present,
    /// otherwise a default derived from the status code. Callers should
    /// branch on `status`, never on the message text.
    #[error("{message}")]
    Api {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// A human-readable description of the failure.
        message: String,
        /// The parsed response body, `{}` if the body was not valid JSON.
        body: serde_json::Value,
    },

    /// The request never completed: DNS failure, refused connection,
    /// timeout, or a dropped socket mid-response.
    ///
    /// This is a deliberately weaker guarantee than [Error::Api]: there is
    /// no status code to branch on, so callers should fall back to a
    /// generic per-operation failure message.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response body did not match the expected shape.
    #[error("could not decode the response body: {0}")]
    Decode(String),

    /// A file selected for upload exceeds the 3 MiB document limit.
    ///
    /// This error is raised before any network call is made.
    #[error("File too large")]
    FileTooLarge {
        /// The size of the rejected file in bytes.
        size: usize,
    },
}

impl Error {
    /// The HTTP status code of the failure, if the server produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(inner) => inner.status(),
            _ => None,
        }
    }

    /// Whether this error is the structured 401 that also triggers the
    /// global session teardown.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
