//! The account type: a source or destination of money (e.g. a bank
//! account or a cash wallet) scoped to a single profile.

use serde::{Deserialize, Serialize};

/// Database identifier for an account.
pub type AccountId = i64;

/// A money account scoped to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The account's ID in the backend database.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The kind of account, e.g. "checking", "savings", "cash".
    #[serde(rename = "type")]
    pub kind: String,
    /// The current balance as tracked by the server.
    pub balance: f64,
    /// The ISO 4217 currency code, e.g. "USD".
    pub currency: String,
    /// The emoji icon shown next to the name.
    pub icon: String,
    /// The display color as a hex string.
    pub color: String,
    /// Whether the account is active. Inactive accounts are hidden from
    /// pickers but keep their history.
    pub is_active: bool,
}

/// The request body for creating an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The kind of account, e.g. "checking".
    #[serde(rename = "type")]
    pub kind: String,
    /// The opening balance.
    pub balance: f64,
    /// The ISO 4217 currency code.
    pub currency: String,
    /// The emoji icon shown next to the name.
    pub icon: String,
    /// The display color as a hex string.
    pub color: String,
}

/// The request body for updating an account. Fields left as `None` are
/// omitted and keep their server-side value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountChanges {
    /// A new display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A corrected balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// A new icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// A new display color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Whether the account should be active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
