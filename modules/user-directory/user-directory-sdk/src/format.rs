//! Display helpers for profile cards.

use time::OffsetDateTime;
use time::macros::format_description;

/// Compact count: `999`, `1.5K`, `2.3M`.
///
/// One decimal, rounded half up, so `1000` renders as `1.0K`.
#[must_use]
pub fn format_count(n: u64) -> String {
    let (unit, suffix): (u64, char) = match n {
        1_000_000.. => (1_000_000, 'M'),
        1_000.. => (1_000, 'K'),
        _ => return n.to_string(),
    };
    let tenths = n
        .saturating_add(unit.div_euclid(20))
        .div_euclid(unit.div_euclid(10));
    format!("{}.{}{suffix}", tenths.div_euclid(10), tenths.rem_euclid(10))
}

/// Short US-style date such as `Jan 25, 2011`.
#[must_use]
pub fn format_joined_date(at: OffsetDateTime) -> String {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    at.format(&format).unwrap_or_else(|_| at.date().to_string())
}
