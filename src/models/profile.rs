//! The profile type: an isolated financial context belonging to one user.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Database identifier for a profile.
pub type ProfileId = i64;

/// A named financial context scoped to one user.
///
/// Each profile has its own transactions, categories, tags, accounts, and
/// budgets. A user may own many profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The profile's ID in the backend database.
    pub id: ProfileId,
    /// The display name of the profile.
    pub name: String,
    /// The ID of the user that owns this profile.
    pub user_id: UserId,
    /// When the profile was created. The server sends this field in
    /// camelCase, unlike every other entity.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}
