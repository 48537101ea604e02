//! Client configuration sourced from the environment.

use std::env;

/// The environment variable that overrides the API base URL.
pub const API_URL_VAR: &str = "POCKETBOOK_API_URL";

/// The base URL used when [API_URL_VAR] is not set.
///
/// Points at a local development server.
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// Settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The base URL of the backend, without a trailing slash.
    pub base_url: String,
}

impl Config {
    /// Create a config with an explicit base URL.
    ///
    /// A trailing slash is stripped so endpoint paths can always be
    /// appended verbatim.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create a config from the environment, falling back to the local
    /// development address.
    pub fn from_env() -> Self {
        match env::var(API_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Self::new(DEFAULT_API_URL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
