//! Email validation.
//!
//! [`validate_email`] is the full check run before a subscription is
//! accepted. [`is_email_format_valid`] is the cheaper pattern-only check used
//! for as-you-type feedback. Both accept the same shape:
//! `local@host.tld` with no whitespace, exactly one `@`, and an alphabetic
//! TLD of at least two letters.

use std::borrow::Cow;

use sokushuu_types::ValidationOutcome;

/// Shown when the field is blank.
pub const MSG_REQUIRED: &str = "Email is required";

/// Shown for any malformed address.
pub const MSG_INVALID: &str = "Please enter a valid email address";

/// Shown when the top-level domain is too short.
pub const MSG_BAD_DOMAIN: &str = "Please enter a valid email address with a proper domain";

/// Longest accepted local part (before `@`), in characters.
const MAX_LOCAL_LEN: usize = 64;

/// Longest accepted domain part (after `@`), in characters.
const MAX_DOMAIN_LEN: usize = 255;

/// Shortest accepted top-level domain, in characters.
const MIN_TLD_LEN: usize = 2;

/// Validate an email address, trimming surrounding whitespace first.
pub fn validate_email(email: &str) -> ValidationOutcome {
    let email = email.trim();

    if email.is_empty() {
        return ValidationOutcome::invalid(MSG_REQUIRED);
    }
    if !email.contains('@') || !email.contains('.') {
        return ValidationOutcome::invalid(MSG_INVALID);
    }
    if !matches_email_pattern(email) {
        return ValidationOutcome::invalid(MSG_INVALID);
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return ValidationOutcome::invalid(MSG_INVALID);
    };

    let local_len = local.chars().count();
    if local_len == 0 || local_len > MAX_LOCAL_LEN {
        return ValidationOutcome::invalid(MSG_INVALID);
    }
    let domain_len = domain.chars().count();
    if domain_len == 0 || domain_len > MAX_DOMAIN_LEN {
        return ValidationOutcome::invalid(MSG_INVALID);
    }
    if email.contains("..") {
        return ValidationOutcome::invalid(MSG_INVALID);
    }
    if local.starts_with('.') || local.ends_with('.') {
        return ValidationOutcome::invalid(MSG_INVALID);
    }

    let tld = domain.rsplit('.').next().unwrap_or_default();
    if tld.chars().count() < MIN_TLD_LEN {
        return ValidationOutcome::invalid(MSG_BAD_DOMAIN);
    }

    ValidationOutcome::valid()
}

/// Pattern-only check for real-time feedback while typing.
pub fn is_email_format_valid(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && matches_email_pattern(email)
}

/// Canonical form used as a storage key: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// [`validate_email`] in the shape `#[validate(custom(...))]` expects.
///
/// # Errors
///
/// Returns a [`validator::ValidationError`] with code `email` carrying the
/// display message when the address is rejected.
pub fn email_rule(email: &str) -> Result<(), validator::ValidationError> {
    let outcome = validate_email(email);
    if outcome.is_valid {
        return Ok(());
    }
    let message = outcome.error.unwrap_or_else(|| MSG_INVALID.to_owned());
    Err(validator::ValidationError::new("email").with_message(Cow::Owned(message)))
}

/// `local@host.tld`: no whitespace, a single `@`, non-empty local and host,
/// and a TLD of two or more ASCII letters ending the string.
fn matches_email_pattern(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= MIN_TLD_LEN && tld.chars().all(|c| c.is_ascii_alphabetic())
}
