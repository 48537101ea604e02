//! The tag type. Tags are free-form labels with a many-to-many
//! relationship to transactions, scoped to a single profile.

use serde::{Deserialize, Serialize};

/// Database identifier for a tag.
pub type TagId = i64;

/// A tag for labelling transactions (e.g., 'work', 'holiday').
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// The tag's ID in the backend database.
    pub id: TagId,
    /// The display name of the tag.
    pub name: String,
    /// The display color as a hex string.
    pub color: String,
}

/// The request body for creating a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTag {
    /// The display name of the tag.
    pub name: String,
    /// The display color as a hex string.
    pub color: String,
}
