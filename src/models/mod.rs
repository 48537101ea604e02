//! This module defines the wire types for the entities served by the
//! backend.
//!
//! The client holds read-only mirrors of server state. Every struct here is
//! created by deserializing a response body; the `New*` and `*Changes`
//! structs are the request-side counterparts. Amounts use `f64` to match
//! the JSON number representation the server produces.

mod account;
mod budget;
mod category;
mod document;
mod profile;
mod tag;
mod transaction;
mod user;

pub use account::{Account, AccountChanges, AccountId, NewAccount};
pub use budget::{Budget, BudgetChanges, BudgetId, NewBudget};
pub use category::{Category, CategoryChanges, CategoryId, NewCategory};
pub use document::{
    Document, DocumentId, DocumentMeta, DocumentUpload, MAX_DOCUMENT_BYTES,
};
pub use profile::{Profile, ProfileId};
pub use tag::{NewTag, Tag, TagId};
pub use transaction::{
    CategoryChoice, NewTransaction, Transaction, TransactionDraft, TransactionId, TransactionKind,
};
pub use user::{User, UserId};
