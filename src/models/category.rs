//! This file defines the `Category` type and the types needed to create
//! and edit a category. Categories label transactions with a display name,
//! icon, and color, and are scoped to a single profile.

use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Database identifier for a category.
pub type CategoryId = i64;

/// A saved transaction category scoped to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The category's ID in the backend database.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// Whether the category applies to income or expenses.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The emoji icon shown next to the name.
    pub icon: String,
    /// The display color as a hex string, e.g. "#6B7280".
    pub color: String,
}

/// The request body for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    /// The display name of the category.
    pub name: String,
    /// Whether the category applies to income or expenses.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The emoji icon shown next to the name.
    pub icon: String,
    /// The display color as a hex string.
    pub color: String,
}

/// The request body for updating a category. Fields left as `None` are
/// omitted and keep their server-side value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryChanges {
    /// A new display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A new icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// A new display color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
