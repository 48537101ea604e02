//! The REST client for the pocketbook backend.
//!
//! Every operation issues one HTTP request with the session cookie
//! attached and normalizes the response: 2xx bodies deserialize into typed
//! models, non-2xx responses become [Error::Api] with the status code, a
//! message, and the parsed body. A 401 additionally fires the registered
//! unauthorized hook before the error is returned, so the session store
//! can tear down regardless of how the call site handles the failure.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error,
    config::Config,
    endpoints::{self, format_endpoint},
    models::{
        Account, AccountChanges, AccountId, Budget, BudgetChanges, BudgetId, Category,
        CategoryChanges, CategoryId, Document, DocumentId, DocumentMeta, DocumentUpload,
        NewAccount, NewBudget, NewCategory, NewTag, NewTransaction, Profile, ProfileId, Tag,
        TagId, Transaction, TransactionId, User,
    },
};

/// The result of the check-auth call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthStatus {
    /// Whether the session cookie maps to a live server session.
    pub authenticated: bool,
    /// The current user, present when `authenticated` is true.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: User,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateProfileRequest<'a> {
    name: &'a str,
}

type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// A client for the pocketbook REST API.
///
/// The client keeps a cookie store so the server's session cookie set at
/// login rides along on every subsequent request. Cloning is cheap and all
/// clones share the cookie store and the unauthorized hook.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    unauthorized_hook: Arc<RwLock<Option<UnauthorizedHook>>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Network] if the underlying HTTP client could not be
    /// constructed.
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            unauthorized_hook: Arc::new(RwLock::new(None)),
        })
    }

    /// Register a callback invoked whenever any request comes back 401.
    ///
    /// The hook fires once per failed call, before the error is returned
    /// to the caller. Registering replaces any previous hook.
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.unauthorized_hook.write() {
            *slot = Some(Arc::new(hook));
        }
    }

    pub(crate) fn notify_unauthorized(&self) {
        // Clone out of the lock so a hook that re-enters the client cannot
        // deadlock.
        let hook = self
            .unauthorized_hook
            .read()
            .ok()
            .and_then(|slot| slot.clone());

        if let Some(hook) = hook {
            hook();
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Normalize a response into a typed payload or an [Error::Api].
    async fn handle<T: DeserializeOwned>(&self, response: Response) -> Result<T, Error> {
        let status = response.status();
        let url = response.url().clone();
        let text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|error| Error::Decode(error.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("request to {url} was rejected as unauthorized");
            self.notify_unauthorized();
        } else {
            tracing::debug!("request to {url} failed with status {status}");
        }

        Err(normalize_error(status, &text))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self.http.get(self.url(path)).send().await?;
        self.handle(response).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        self.handle(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        self.handle(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self.http.post(self.url(path)).send().await?;
        self.handle(response).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        self.handle(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let response = self.http.delete(self.url(path)).send().await?;
        let body: Value = self.handle(response).await?;
        if let Some(message) = body.get("message").and_then(Value::as_str) {
            tracing::debug!("{message}");
        }
        Ok(())
    }

    // Authentication

    /// Create a new user account. The server also starts a session, so a
    /// successful registration doubles as a login.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, Error> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        let response: AuthResponse = self.post(endpoints::REGISTER, &body).await?;
        Ok(response.user)
    }

    /// Log in with a username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, Error> {
        let body = LoginRequest { username, password };
        let response: AuthResponse = self.post(endpoints::LOG_IN, &body).await?;
        Ok(response.user)
    }

    /// End the server-side session.
    pub async fn log_out(&self) -> Result<(), Error> {
        let _: Value = self.post_empty(endpoints::LOG_OUT).await?;
        Ok(())
    }

    /// Ask the server whether the session cookie is still valid.
    ///
    /// The server answers 200 either way; an unauthenticated session is
    /// reported through the payload, not an error status.
    pub async fn check_auth(&self) -> Result<AuthStatus, Error> {
        self.get(endpoints::CHECK_AUTH).await
    }

    // Profiles

    /// List the current user's profiles.
    pub async fn profiles(&self) -> Result<Vec<Profile>, Error> {
        self.get(endpoints::PROFILES).await
    }

    /// Create a profile.
    pub async fn create_profile(&self, name: &str) -> Result<Profile, Error> {
        self.post(endpoints::PROFILES, &CreateProfileRequest { name })
            .await
    }

    /// Delete a profile and everything scoped to it.
    pub async fn delete_profile(&self, profile_id: ProfileId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::PROFILE, profile_id))
            .await
    }

    // Transactions

    /// List a profile's transactions.
    pub async fn transactions(&self, profile_id: ProfileId) -> Result<Vec<Transaction>, Error> {
        self.get(&format_endpoint(endpoints::PROFILE_TRANSACTIONS, profile_id))
            .await
    }

    /// Record a transaction against a profile.
    pub async fn create_transaction(
        &self,
        profile_id: ProfileId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        self.post(
            &format_endpoint(endpoints::PROFILE_TRANSACTIONS, profile_id),
            transaction,
        )
        .await
    }

    /// Delete a transaction.
    pub async fn delete_transaction(&self, transaction_id: TransactionId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::TRANSACTION, transaction_id))
            .await
    }

    // Categories

    /// List a profile's saved categories.
    pub async fn categories(&self, profile_id: ProfileId) -> Result<Vec<Category>, Error> {
        self.get(&format_endpoint(endpoints::PROFILE_CATEGORIES, profile_id))
            .await
    }

    /// Create a saved category.
    pub async fn create_category(
        &self,
        profile_id: ProfileId,
        category: &NewCategory,
    ) -> Result<Category, Error> {
        self.post(
            &format_endpoint(endpoints::PROFILE_CATEGORIES, profile_id),
            category,
        )
        .await
    }

    /// Update a saved category.
    ///
    /// Existing transactions keep the category name they were created
    /// with; the rename only affects transactions recorded afterwards.
    pub async fn update_category(
        &self,
        category_id: CategoryId,
        changes: &CategoryChanges,
    ) -> Result<Category, Error> {
        self.put(&format_endpoint(endpoints::CATEGORY, category_id), changes)
            .await
    }

    /// Delete a saved category.
    pub async fn delete_category(&self, category_id: CategoryId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::CATEGORY, category_id))
            .await
    }

    // Tags

    /// List a profile's tags.
    pub async fn tags(&self, profile_id: ProfileId) -> Result<Vec<Tag>, Error> {
        self.get(&format_endpoint(endpoints::PROFILE_TAGS, profile_id))
            .await
    }

    /// Create a tag.
    pub async fn create_tag(&self, profile_id: ProfileId, tag: &NewTag) -> Result<Tag, Error> {
        self.post(&format_endpoint(endpoints::PROFILE_TAGS, profile_id), tag)
            .await
    }

    /// Delete a tag. The tag is detached from any transactions carrying it.
    pub async fn delete_tag(&self, tag_id: TagId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::TAG, tag_id)).await
    }

    // Accounts

    /// List a profile's accounts.
    pub async fn accounts(&self, profile_id: ProfileId) -> Result<Vec<Account>, Error> {
        self.get(&format_endpoint(endpoints::PROFILE_ACCOUNTS, profile_id))
            .await
    }

    /// Create an account.
    pub async fn create_account(
        &self,
        profile_id: ProfileId,
        account: &NewAccount,
    ) -> Result<Account, Error> {
        self.post(
            &format_endpoint(endpoints::PROFILE_ACCOUNTS, profile_id),
            account,
        )
        .await
    }

    /// Update an account.
    pub async fn update_account(
        &self,
        account_id: AccountId,
        changes: &AccountChanges,
    ) -> Result<Account, Error> {
        self.put(&format_endpoint(endpoints::ACCOUNT, account_id), changes)
            .await
    }

    /// Delete an account.
    pub async fn delete_account(&self, account_id: AccountId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::ACCOUNT, account_id))
            .await
    }

    // Budgets

    /// List a profile's budgets, optionally filtered to one calendar
    /// month.
    pub async fn budgets(
        &self,
        profile_id: ProfileId,
        month: Option<u8>,
        year: Option<i32>,
    ) -> Result<Vec<Budget>, Error> {
        let mut query = Vec::new();

        if let Some(month) = month {
            query.push(("month", month.to_string()));
        }

        if let Some(year) = year {
            query.push(("year", year.to_string()));
        }

        self.get_with_query(
            &format_endpoint(endpoints::PROFILE_BUDGETS, profile_id),
            &query,
        )
        .await
    }

    /// Create a budget for one calendar month.
    pub async fn create_budget(
        &self,
        profile_id: ProfileId,
        budget: &NewBudget,
    ) -> Result<Budget, Error> {
        self.post(
            &format_endpoint(endpoints::PROFILE_BUDGETS, profile_id),
            budget,
        )
        .await
    }

    /// Update a budget.
    pub async fn update_budget(
        &self,
        budget_id: BudgetId,
        changes: &BudgetChanges,
    ) -> Result<Budget, Error> {
        self.put(&format_endpoint(endpoints::BUDGET, budget_id), changes)
            .await
    }

    /// Delete a budget.
    pub async fn delete_budget(&self, budget_id: BudgetId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::BUDGET, budget_id))
            .await
    }

    // Documents

    /// Attach a document to a transaction.
    ///
    /// Construct the upload with [DocumentUpload::new], which enforces the
    /// 3 MiB size gate before this method is ever reached.
    pub async fn upload_document(
        &self,
        transaction_id: TransactionId,
        upload: &DocumentUpload,
    ) -> Result<DocumentMeta, Error> {
        self.post(
            &format_endpoint(endpoints::TRANSACTION_DOCUMENTS, transaction_id),
            upload,
        )
        .await
    }

    /// Fetch a document with its file content.
    pub async fn document_data(&self, document_id: DocumentId) -> Result<Document, Error> {
        self.get(&format_endpoint(endpoints::DOCUMENT_DATA, document_id))
            .await
    }

    /// Delete a document.
    pub async fn delete_document(&self, document_id: DocumentId) -> Result<(), Error> {
        self.delete(&format_endpoint(endpoints::DOCUMENT, document_id))
            .await
    }
}

/// Turn a non-2xx response body into an [Error::Api].
///
/// The body is parsed as JSON, defaulting to `{}` when unparseable. A
/// server-supplied `error` field becomes the message; otherwise the
/// message defaults by status code.
fn normalize_error(status: StatusCode, body_text: &str) -> Error {
    let body: Value =
        serde_json::from_str(body_text).unwrap_or_else(|_| Value::Object(Default::default()));

    let message = body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| default_message(status).to_owned());

    Error::Api {
        status,
        message,
        body,
    }
}

/// The fallback message for a status code when the server supplied none.
fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::TOO_MANY_REQUESTS => "Too many requests. Please try again later.",
        StatusCode::FORBIDDEN => "Access denied",
        _ => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::Error;

    use super::{default_message, normalize_error};

    fn assert_api_error(error: Error, status: StatusCode, message: &str) {
        match error {
            Error::Api {
                status: got_status,
                message: got_message,
                ..
            } => {
                assert_eq!(got_status, status);
                assert_eq!(got_message, message);
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn server_message_wins_over_default() {
        let error = normalize_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Username already exists"}"#,
        );

        assert_api_error(error, StatusCode::BAD_REQUEST, "Username already exists");
    }

    #[test]
    fn rate_limit_defaults_to_try_again_later() {
        let error = normalize_error(StatusCode::TOO_MANY_REQUESTS, "{}");

        assert_api_error(
            error,
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please try again later.",
        );
    }

    #[test]
    fn forbidden_defaults_to_access_denied() {
        let error = normalize_error(StatusCode::FORBIDDEN, "");

        assert_api_error(error, StatusCode::FORBIDDEN, "Access denied");
    }

    #[test]
    fn unauthorized_uses_the_generic_default() {
        // The special handling for 401 is the hook, not the message.
        let error = normalize_error(StatusCode::UNAUTHORIZED, "{}");

        assert_api_error(error, StatusCode::UNAUTHORIZED, "Request failed");
    }

    #[test]
    fn unparseable_body_normalizes_to_empty_object() {
        let error = normalize_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");

        match error {
            Error::Api { body, message, .. } => {
                assert_eq!(body, json!({}));
                assert_eq!(message, "Request failed");
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn error_body_is_preserved_for_callers() {
        let error = normalize_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Invalid input", "field": "amount"}"#,
        );

        match error {
            Error::Api { body, .. } => assert_eq!(body["field"], "amount"),
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn defaults_cover_the_documented_status_codes() {
        assert_eq!(
            default_message(StatusCode::TOO_MANY_REQUESTS),
            "Too many requests. Please try again later."
        );
        assert_eq!(default_message(StatusCode::FORBIDDEN), "Access denied");
        assert_eq!(default_message(StatusCode::NOT_FOUND), "Request failed");
        assert_eq!(
            default_message(StatusCode::INTERNAL_SERVER_ERROR),
            "Request failed"
        );
    }

    #[test]
    fn is_unauthorized_matches_only_401() {
        assert!(normalize_error(StatusCode::UNAUTHORIZED, "{}").is_unauthorized());
        assert!(!normalize_error(StatusCode::FORBIDDEN, "{}").is_unauthorized());
    }
}
