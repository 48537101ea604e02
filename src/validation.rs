//! Client-side validation for form input.
//!
//! These checks exist to fail fast in the UI before a request is made. The
//! backend re-validates everything independently; nothing here may be
//! relied on for security or data integrity.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::TransactionDraft;

/// The largest amount a transaction may carry.
pub const MAX_TRANSACTION_AMOUNT: f64 = 999_999_999.0;

/// The reasons a username can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    /// The username is shorter than 3 or longer than 80 characters.
    #[error("Username must be between 3 and 80 characters")]
    InvalidLength,
    /// The username contains something other than letters, digits,
    /// underscores, or hyphens.
    #[error("Username can only contain letters, numbers, underscores, and hyphens")]
    InvalidCharacters,
}

/// The reasons a password can be rejected.
///
/// [validate_password] short-circuits, so a caller only ever sees the
/// first failing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The password has fewer than 8 characters.
    #[error("Password must be at least 8 characters long")]
    TooShort,
    /// The password has more than 128 characters.
    #[error("Password must be less than 128 characters")]
    TooLong,
    /// The password has no uppercase letter.
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
    /// The password has no lowercase letter.
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    /// The password has no digit.
    #[error("Password must contain at least one number")]
    MissingDigit,
}

/// The reasons a profile name can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileNameError {
    /// The name is empty or whitespace-only.
    #[error("Profile name is required")]
    Empty,
    /// The name is longer than 100 characters.
    #[error("Profile name is too long (max 100 characters)")]
    TooLong,
}

/// A coarse password strength rating for a UI meter.
///
/// This rating never gates submission; [validate_password] alone decides
/// whether a password is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    /// Score 0 to 2.
    Weak,
    /// Score 3 or 4.
    Medium,
    /// Score 5 or 6.
    Strong,
}

impl PasswordStrength {
    /// The label shown next to the strength meter.
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Medium => "Medium",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// Check that `email` looks like `local@domain.tld`.
///
/// The local part may contain letters, digits, and `._%+-`; the domain
/// letters, digits, and `.-`; the TLD must be at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern must compile")
    });

    pattern.is_match(email)
}

/// Check that `username` is 3 to 80 characters of letters, digits,
/// underscores, and hyphens.
///
/// # Errors
///
/// Returns [UsernameError::InvalidLength] before
/// [UsernameError::InvalidCharacters] when both rules fail.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    let length = username.chars().count();

    if !(3..=80).contains(&length) {
        return Err(UsernameError::InvalidLength);
    }

    static PATTERN: OnceLock<Regex> = OnceLock::new();

    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("username pattern must compile"));

    if !pattern.is_match(username) {
        return Err(UsernameError::InvalidCharacters);
    }

    Ok(())
}

/// Check the password policy: 8 to 128 characters with at least one
/// uppercase letter, one lowercase letter, and one digit.
///
/// # Errors
///
/// Returns the first failing rule in policy order; later rules are not
/// checked.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();

    if length < 8 {
        return Err(PasswordError::TooShort);
    }

    if length > 128 {
        return Err(PasswordError::TooLong);
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::MissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordError::MissingLowercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }

    Ok(())
}

/// Rate a password for the strength meter.
///
/// One point each for: length of at least 8, length of at least 12, a
/// lowercase letter, an uppercase letter, a digit, and a symbol. A score
/// of 2 or less is [PasswordStrength::Weak], 4 or less is
/// [PasswordStrength::Medium], anything above is
/// [PasswordStrength::Strong].
pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let mut score = 0;

    if length >= 8 {
        score += 1;
    }
    if length >= 12 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }

    match score {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

/// Check a transaction draft against the field constraints, accumulating
/// every violation rather than stopping at the first.
///
/// The returned messages are user-facing and appear in check order: type,
/// amount positive, amount bound, category presence, category length, date
/// presence, description length.
///
/// # Errors
///
/// Returns the full list of violation messages when any check fails.
pub fn validate_transaction(draft: &TransactionDraft) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if draft.kind != "income" && draft.kind != "expense" {
        errors.push("Transaction type must be either income or expense".to_owned());
    }

    let amount = draft.amount.trim().parse::<f64>().ok();

    match amount {
        Some(amount) if amount > 0.0 => {}
        _ => errors.push("Amount must be a positive number".to_owned()),
    }

    if let Some(amount) = amount
        && amount > MAX_TRANSACTION_AMOUNT
    {
        errors.push("Amount is too large".to_owned());
    }

    if draft.category.trim().is_empty() {
        errors.push("Category is required".to_owned());
    }

    if draft.category.chars().count() > 100 {
        errors.push("Category is too long (max 100 characters)".to_owned());
    }

    if draft.date.is_empty() {
        errors.push("Date is required".to_owned());
    }

    if let Some(description) = &draft.description
        && description.chars().count() > 500
    {
        errors.push("Description is too long (max 500 characters)".to_owned());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check that a profile name is non-blank and at most 100 characters.
///
/// # Errors
///
/// Returns [ProfileNameError::Empty] for empty or whitespace-only names,
/// [ProfileNameError::TooLong] for names over 100 characters.
pub fn validate_profile_name(name: &str) -> Result<(), ProfileNameError> {
    if name.trim().is_empty() {
        return Err(ProfileNameError::Empty);
    }

    if name.chars().count() > 100 {
        return Err(ProfileNameError::TooLong);
    }

    Ok(())
}
