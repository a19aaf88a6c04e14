/*!
 * Store Locations
 * Canonical `/vssN` naming of store volume entries
 */

use crate::core::limits::{STORE_LOCATION_PREFIX, STORE_NAME_PREFIX};

/// Parse a store location into its zero-based store index
///
/// Only the canonical form is accepted: `/vss` followed by a positive decimal
/// number without leading zeros. Anything else (`/vss0`, `/vss01`, `/vss`,
/// `/vss+1`, `/VSS1`, trailing characters) yields `None`.
#[must_use]
pub fn store_index_from_location(location: &str) -> Option<u32> {
    let digits = location.strip_prefix(STORE_LOCATION_PREFIX)?;
    if digits.is_empty() || digits.starts_with('0') {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    Some(number - 1)
}

/// Location of the store at `index`
#[must_use]
pub fn store_location(index: u32) -> String {
    format!("{}{}", STORE_LOCATION_PREFIX, u64::from(index) + 1)
}

/// Entry name of the store at `index`
#[must_use]
pub fn store_name(index: u32) -> String {
    format!("{}{}", STORE_NAME_PREFIX, u64::from(index) + 1)
}
