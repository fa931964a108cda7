//! Credential checks applied before the store is touched.

use super::{AccountError, Credentials};
use regex::Regex;

/// Longest address accepted by [`valid_email`], the forward-path limit.
const MAX_EMAIL_LENGTH: usize = 254;
/// Longest local part (before `@`) accepted by [`valid_email`].
const MAX_LOCAL_PART: usize = 64;
/// Longest domain part (after `@`) accepted by [`valid_email`].
const MAX_DOMAIN_PART: usize = 254;
const MAX_LABEL: usize = 63;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols counted towards password strength.
const PASSWORD_SYMBOLS: &str = "-#!$@£%^&*()_+|~=`{}[]:\";'<>?,./\\ ";

/// Both fields present and non-empty, borrowed out of the request.
///
/// # Errors
/// Returns [`AccountError::MissingFields`] otherwise.
pub fn require_fields(credentials: &Credentials) -> Result<(&str, &str), AccountError> {
    match (credentials.email.as_deref(), credentials.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(AccountError::MissingFields),
    }
}

/// Checks for signup, in order: presence, email grammar, password strength.
///
/// # Errors
/// Returns the first failing check.
pub fn signup(credentials: &Credentials) -> Result<(&str, &str), AccountError> {
    let (email, password) = require_fields(credentials)?;

    if !valid_email(email) {
        return Err(AccountError::InvalidEmail);
    }

    if !strong_password(password) {
        return Err(AccountError::WeakPassword);
    }

    Ok((email, password))
}

/// Login only checks presence, anything else is up to the stored account.
///
/// # Errors
/// Returns [`AccountError::MissingFields`].
pub fn login(credentials: &Credentials) -> Result<(&str, &str), AccountError> {
    require_fields(credentials)
}

/// `local@domain.tld` with a dot-atom or quoted local part and hostname labels.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    if local.len() > MAX_LOCAL_PART || domain.len() > MAX_DOMAIN_PART {
        return false;
    }

    if domain.split('.').any(|label| label.len() > MAX_LABEL) {
        return false;
    }

    let local_ok = if local.starts_with('"') {
        // printable ASCII, `"` and `\` only when escaped
        Regex::new(r#"^"(?:[\x20\x21\x23-\x5B\x5D-\x7E]|\\[\x20-\x7E])+"$"#)
            .is_ok_and(|re| re.is_match(local))
    } else {
        Regex::new(r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*$")
            .is_ok_and(|re| re.is_match(local))
    };

    let domain_ok = Regex::new(
        r"^(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+(?:\p{L}{2,}|xn--[a-zA-Z0-9-]+)$",
    )
    .is_ok_and(|re| re.is_match(domain));

    local_ok && domain_ok
}

/// At least [`MIN_PASSWORD_LENGTH`] characters with one lowercase, one uppercase,
/// one digit and one symbol.
#[must_use]
pub fn strong_password(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if PASSWORD_SYMBOLS.contains(c) {
            symbol = true;
        }
    }

    password.chars().count() >= MIN_PASSWORD_LENGTH && lower && upper && digit && symbol
}
