//! Key names used by the landing page.
//!
//! | Key | Value |
//! |-----|-------|
//! | `SOKUSHUU_LANDING_PAGE_LAUNCH_DATE` | ISO 8601 launch timestamp |
//! | `SOKUSHUU_LANDING_PAGE_WAITING_TOTAL` | Decimal waiting list size |
//! | `SOKUSHUU_LANDING_PAGE_WAITLIST:{email}` | Subscription timestamp |

use crate::error::KvError;

/// Launch date of the product.
pub const LAUNCH_DATE: &str = "SOKUSHUU_LANDING_PAGE_LAUNCH_DATE";

/// Number of people on the waiting list.
pub const WAITING_TOTAL: &str = "SOKUSHUU_LANDING_PAGE_WAITING_TOTAL";

/// Prefix of per-subscriber keys.
pub const WAITLIST_PREFIX: &str = "SOKUSHUU_LANDING_PAGE_WAITLIST:";

/// Longest key Workers KV accepts, in UTF-8 bytes.
pub const MAX_KEY_BYTES: usize = 512;

/// Key recording that `email` joined the waiting list.
///
/// The caller is expected to pass an already normalized address.
///
/// # Errors
///
/// Returns [`KvError::KeyTooLong`] if the key would exceed
/// [`MAX_KEY_BYTES`]. Address rules count characters, so a valid
/// non-ASCII address can still be too long here.
pub fn waitlist_entry(email: &str) -> Result<String, KvError> {
    let key = format!("{WAITLIST_PREFIX}{email}");
    if key.len() > MAX_KEY_BYTES {
        return Err(KvError::KeyTooLong {
            bytes: key.len(),
            max: MAX_KEY_BYTES,
        });
    }
    Ok(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn waitlist_entry_is_prefixed() {
        assert_eq!(
            waitlist_entry("a@b.co").unwrap(),
            "SOKUSHUU_LANDING_PAGE_WAITLIST:a@b.co"
        );
    }

    #[test]
    fn waitlist_entry_limits_bytes_not_chars() {
        // Within the character limits of an address, but mostly 4-byte characters.
        let email = format!("{}@{}.jp", "\u{1f600}".repeat(64), "\u{1f600}".repeat(252));
        let err = waitlist_entry(&email).unwrap_err();
        assert!(matches!(err, KvError::KeyTooLong { max: 512, .. }), "{err}");

        let ascii = format!("{}@{}.com", "a".repeat(64), "b".repeat(251));
        assert!(waitlist_entry(&ascii).is_ok());
    }
}
