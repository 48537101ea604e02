//! This file defines the type `Transaction`, the core type of the finance
//! tracking part of the application, and its request-side counterparts.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use super::{
    account::AccountId, category::CategoryId, document::DocumentMeta, profile::ProfileId,
    tag::TagId,
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether a transaction records money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// The lowercase wire representation, e.g. for query display.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or
/// earned, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the profile the transaction belongs to.
    pub profile_id: ProfileId,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money involved. Always positive; the sign is carried
    /// by `kind`.
    pub amount: f64,
    /// The category display name recorded at creation time.
    ///
    /// This string is denormalized: renaming a [super::Category] later does
    /// not rewrite it on existing transactions.
    pub category: String,
    /// The ID of the category, when the transaction was created from a
    /// saved category rather than a custom string.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// The ID of the account the transaction was booked against, if any.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// The IDs of the tags attached to this transaction. Order carries no
    /// meaning.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    /// A free-text description of what the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
    /// The date the transaction happened.
    pub date: Date,
    /// When the transaction was recorded, as an ISO 8601 string.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Receipt documents attached to this transaction.
    #[serde(default)]
    pub documents: Vec<DocumentMeta>,
}

/// The category of a new transaction.
///
/// The backend accepts either a free-form category string or a reference to
/// a saved category (which still carries the display name so the server can
/// denormalize it onto the transaction). Modelling this as a sum type keeps
/// "custom string" and "saved category" distinguishable instead of being
/// inferred from null checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryChoice {
    /// A custom category typed by the user.
    Named {
        /// The category display string.
        category: String,
    },
    /// A saved category selected from the profile's category list.
    Existing {
        /// The category display string at selection time.
        category: String,
        /// The ID of the saved category.
        category_id: CategoryId,
    },
}

impl CategoryChoice {
    /// A custom category string.
    pub fn named(category: &str) -> Self {
        Self::Named {
            category: category.to_owned(),
        }
    }

    /// A saved category, keeping its display name for denormalization.
    pub fn existing(category_id: CategoryId, category: &str) -> Self {
        Self::Existing {
            category: category.to_owned(),
            category_id,
        }
    }

    /// The display string of the chosen category.
    pub fn name(&self) -> &str {
        match self {
            CategoryChoice::Named { category } | CategoryChoice::Existing { category, .. } => {
                category
            }
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The positive amount of money involved.
    pub amount: f64,
    /// The category, either free-form or a saved category reference.
    #[serde(flatten)]
    pub category: CategoryChoice,
    /// The account to book the transaction against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// The tags to attach.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<TagId>,
    /// A free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The date the transaction happened.
    pub date: Date,
}

/// Raw form input for a transaction, before validation.
///
/// Fields hold the strings exactly as the user typed them; passing this to
/// [crate::validation::validate_transaction] yields either a clean bill or
/// the full list of user-facing error messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    /// The transaction type as typed or selected, expected to be "income"
    /// or "expense".
    pub kind: String,
    /// The amount as typed, not yet parsed.
    pub amount: String,
    /// The category display string.
    pub category: String,
    /// The transaction date as typed.
    pub date: String,
    /// The optional free-text description.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{CategoryChoice, NewTransaction, TransactionKind};

    #[test]
    fn new_transaction_serializes_named_category_without_id() {
        let request = NewTransaction {
            kind: TransactionKind::Expense,
            amount: 12.5,
            category: CategoryChoice::named("Food"),
            account_id: None,
            tag_ids: Vec::new(),
            description: None,
            date: date!(2024 - 01 - 15),
        };

        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["type"], "expense");
        assert_eq!(body["category"], "Food");
        assert!(body.get("category_id").is_none());
        assert!(body.get("account_id").is_none());
        assert!(body.get("tag_ids").is_none());
    }

    #[test]
    fn new_transaction_serializes_existing_category_with_id() {
        let request = NewTransaction {
            kind: TransactionKind::Income,
            amount: 1000.0,
            category: CategoryChoice::existing(3, "Salary"),
            account_id: Some(2),
            tag_ids: vec![5, 9],
            description: Some("July".to_owned()),
            date: date!(2024 - 07 - 01),
        };

        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["type"], "income");
        assert_eq!(body["category"], "Salary");
        assert_eq!(body["category_id"], 3);
        assert_eq!(body["account_id"], 2);
        assert_eq!(body["tag_ids"], serde_json::json!([5, 9]));
        assert_eq!(body["date"], "2024-07-01");
    }

    #[test]
    fn transaction_kind_round_trips_through_lowercase_strings() {
        let kind: TransactionKind = serde_json::from_str("\"income\"").unwrap();

        assert_eq!(kind, TransactionKind::Income);
        assert_eq!(kind.to_string(), "income");
    }
}
