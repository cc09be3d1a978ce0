//! Dotted version string comparison
//!
//! Simplistic major.minor.patch comparison: pad each component with zeros
//! and compare the padded strings. This sidesteps numeric parsing and
//! overflow edge cases and handles missing trailing components
//! (`"2" < "2.1" < "2.1.3"` shapes). Non-numeric components sort
//! lexicographically within their padded slot, which is a documented
//! limitation rather than something to silently correct.

use std::cmp::Ordering;

/// Width each component is zero-padded to; components up to 9999 compare
/// numerically.
const COMPONENT_WIDTH: usize = 4;

/// Minimum number of components after right-padding with "0".
const MIN_COMPONENTS: usize = 3;

/// Compare two dotted version strings.
///
/// A single leading `v` or `V` is ignored, so `compare("v1.2", "1.2")` is
/// `Equal`.
pub fn compare(a: &str, b: &str) -> Ordering {
    padded(a).cmp(&padded(b))
}

fn padded(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed);

    let mut components: Vec<String> = stripped
        .split('.')
        .map(|c| format!("{:0>width$}", c, width = COMPONENT_WIDTH))
        .collect();

    while components.len() < MIN_COMPONENTS {
        components.push("0".repeat(COMPONENT_WIDTH));
    }

    components.join(".")
}
