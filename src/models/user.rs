//! The user account type returned by the authentication endpoints.

use serde::{Deserialize, Serialize};

/// Database identifier for a user.
pub type UserId = i64;

/// A user of the application.
///
/// The client only ever holds a read-only copy for the lifetime of the
/// session; the backend owns the authoritative record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the backend database.
    pub id: UserId,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// When the account was created, as the ISO 8601 string the server
    /// sends. The client only displays this value.
    #[serde(default)]
    pub created_at: Option<String>,
}
