//! The backend API endpoint paths, relative to the configured base URL.
//!
//! For endpoints that take a parameter, e.g., '/profiles/{profile_id}', use
//! [format_endpoint].

/// The route for creating a new user account.
pub const REGISTER: &str = "/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for checking whether the session cookie is still valid.
pub const CHECK_AUTH: &str = "/check-auth";
/// The route to list and create profiles.
pub const PROFILES: &str = "/profiles";
/// The route to delete a profile.
pub const PROFILE: &str = "/profiles/{profile_id}";
/// The route to list and create a profile's transactions.
pub const PROFILE_TRANSACTIONS: &str = "/profiles/{profile_id}/transactions";
/// The route to delete a transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route to list and create a profile's categories.
pub const PROFILE_CATEGORIES: &str = "/profiles/{profile_id}/categories";
/// The route to update or delete a category.
pub const CATEGORY: &str = "/categories/{category_id}";
/// The route to list and create a profile's tags.
pub const PROFILE_TAGS: &str = "/profiles/{profile_id}/tags";
/// The route to delete a tag.
pub const TAG: &str = "/tags/{tag_id}";
/// The route to list and create a profile's accounts.
pub const PROFILE_ACCOUNTS: &str = "/profiles/{profile_id}/accounts";
/// The route to update or delete an account.
pub const ACCOUNT: &str = "/accounts/{account_id}";
/// The route to list and create a profile's budgets.
///
/// Listing accepts optional `month` and `year` query parameters.
pub const PROFILE_BUDGETS: &str = "/profiles/{profile_id}/budgets";
/// The route to update or delete a budget.
pub const BUDGET: &str = "/budgets/{budget_id}";
/// The route to attach a document to a transaction.
pub const TRANSACTION_DOCUMENTS: &str = "/transactions/{transaction_id}/documents";
/// The route to fetch a document's file content.
pub const DOCUMENT_DATA: &str = "/documents/{document_id}/data";
/// The route to delete a document.
pub const DOCUMENT: &str = "/documents/{document_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/profiles/{profile_id}',
/// '{profile_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII
/// characters and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
