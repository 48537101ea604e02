//! Pocketbook is a typed client for the pocketbook personal finance
//! tracker REST API.
//!
//! The library covers the client-side core of the application: form input
//! validation, the HTTP client with its error contract, the session state
//! machine, and the in-memory aggregation that turns a profile's
//! transaction list into totals and category breakdowns. The companion
//! binary wraps all of it in a command line interface.
//!
//! The backend is the sole authority over data: this client validates
//! input only to fail fast in the UI, mirrors server state after each
//! round trip, and never persists anything locally beyond the session
//! cookie held by the HTTP client.

#![warn(missing_docs)]

mod aggregation;
mod api;
mod config;
mod endpoints;
mod error;
mod models;
mod session;

pub mod validation;

pub use aggregation::{
    CategoryTotals, FilterSummary, Totals, TransactionFilter, aggregate_totals,
    category_breakdown, filtered_summary,
};
pub use api::{ApiClient, AuthStatus};
pub use config::{API_URL_VAR, Config, DEFAULT_API_URL};
pub use endpoints::format_endpoint;
pub use error::Error;
pub use models::{
    Account, AccountChanges, AccountId, Budget, BudgetChanges, BudgetId, Category,
    CategoryChanges, CategoryChoice, CategoryId, Document, DocumentId, DocumentMeta,
    DocumentUpload, MAX_DOCUMENT_BYTES, NewAccount, NewBudget, NewCategory, NewTag,
    NewTransaction, Profile, ProfileId, Tag, TagId, Transaction, TransactionDraft,
    TransactionId, TransactionKind, User, UserId,
};
pub use session::{LogoutReason, Session, SessionState, SubscriptionId};
