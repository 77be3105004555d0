//! Input Validation
//!
//! Field-level checks applied to request bodies before they reach the record
//! store. Each check returns the normalized value or a `SharedError` whose
//! reason is the message shown to the client.

use uuid::Uuid;

use crate::shared::error::SharedError;

/// Characters accepted as the special character of a password
pub const PASSWORD_SPECIALS: &str = "#!&?@$%^&*";

/// Card color used when none (or an invalid one) is supplied
pub const DEFAULT_CARD_COLOR: &str = "#D3D3D3";

/// Trim and length-check a username (3-25 characters)
pub fn validate_username(username: &str) -> Result<String, SharedError> {
    let username = username.trim();
    let len = username.chars().count();
    if !(3..=25).contains(&len) {
        return Err(SharedError::validation(
            "username",
            "Username must be between 3 and 25 characters.",
        ));
    }
    Ok(username.to_string())
}

/// Trim and check the shape of an email address
///
/// Requires exactly one `@`, a non-empty local part and a dotted domain
/// without empty labels.
pub fn validate_email(email: &str) -> Result<String, SharedError> {
    let email = email.trim();
    let invalid = || SharedError::validation("email", "Please enter a valid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(email.to_string())
}

/// Check the password policy
///
/// At least 8 characters with an uppercase letter, a digit and one of
/// [`PASSWORD_SPECIALS`]. The first failing rule is reported.
pub fn validate_password(password: &str) -> Result<(), SharedError> {
    let fail = |message: &str| Err(SharedError::validation("password", message));

    if password.chars().count() < 8 {
        return fail("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return fail("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return fail("Password must contain at least one number");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return fail("Password must contain at least one special character");
    }
    Ok(())
}

/// `#RRGGBB` with hexadecimal digits
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// A present, non-blank text field
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a record identifier
///
/// Identifiers that are not UUIDs cannot name any record, so callers treat
/// `None` as "not found".
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
