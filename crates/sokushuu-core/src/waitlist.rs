//! Waiting list counter arithmetic.
//!
//! The counter lives in KV as free text and is edited by hand as well as by
//! the subscribe endpoint, so reads are lenient: anything that does not start
//! with a number counts as zero.

/// Parse a stored waiting total.
///
/// Leading whitespace and an optional `+` are skipped, then the leading run
/// of ASCII digits is taken (`"12 people"` is 12). No digits, or a negative
/// number, yields 0. Values past `u64::MAX` saturate.
pub fn parse_waiting_total(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('-') {
        return 0;
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = unsigned.get(..end).unwrap_or_default();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// The counter after one more subscription.
pub const fn next_waiting_total(current: u64) -> u64 {
    current.saturating_add(1)
}
