//! Discovered installation candidates and their ranking
//!
//! One [`AppCandidate`] is produced per metadata match, carrying the three
//! properties the ranking cares about: version, bundle identifier, and
//! store-signing status. The ranking is a pure total order; sorting with it
//! puts the preferred installation at index 0.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::version;

/// Wildcard search key matching every Marked 2 distribution
pub const BUNDLE_ID_PATTERN: &str = "com.brettterpstra.marked*";

/// Bundle identifier of the Setapp distribution, ranked below the others
pub const SETAPP_BUNDLE_ID: &str = "com.brettterpstra.marked-setapp";

/// Metadata property names fetched per candidate
pub const PROP_VERSION: &str = "kMDItemVersion";
pub const PROP_STORE_SIGNED: &str = "kMDItemAppStoreIsAppleSigned";
pub const PROP_BUNDLE_ID: &str = "kMDItemCFBundleIdentifier";

/// One discovered installation of Marked 2
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppCandidate {
    pub path: PathBuf,
    pub version: String,
    pub bundle_id: String,
    /// App Store signing status; `None` when the metadata index has no answer
    pub store_signed: Option<bool>,
}

impl AppCandidate {
    /// Build a candidate from captured `mdls` output lines.
    ///
    /// Each property line has the shape `name = value`; values keep their
    /// surrounding quotes in raw output, so those are trimmed. Unknown or
    /// missing properties are simply absent.
    pub fn from_metadata(path: PathBuf, lines: &[String]) -> Self {
        let mut props: HashMap<&str, String> = HashMap::new();
        for line in lines {
            if let Some((name, value)) = line.split_once(" = ") {
                props.insert(name.trim(), value.trim().trim_matches('"').to_string());
            }
        }

        let store_signed = match props.get(PROP_STORE_SIGNED).map(String::as_str) {
            Some("1") => Some(true),
            Some("0") => Some(false),
            _ => None,
        };

        Self {
            path,
            version: props.remove(PROP_VERSION).unwrap_or_default(),
            bundle_id: props.remove(PROP_BUNDLE_ID).unwrap_or_default(),
            store_signed,
        }
    }
}

/// Total order over candidates; ascending puts the preferred build first.
///
/// Tie-breaks, in order: newer version wins; on equal versions the Setapp
/// bundle loses to any other distribution; on equal bundle identifiers the
/// store-signed build loses to the direct build. Inputs are never mutated,
/// so the order is safe for a stable sort.
pub fn rank(a: &AppCandidate, b: &AppCandidate) -> Ordering {
    // Different versions? Newest wins.
    match version::compare(&a.version, &b.version) {
        Ordering::Equal => {}
        ord => return ord.reverse(),
    }

    // Same version? The Setapp distribution ranks below the rest.
    if a.bundle_id != b.bundle_id {
        return if a.bundle_id == SETAPP_BUNDLE_ID {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }

    // Same bundle? The App Store build ranks below the direct build.
    if a.store_signed != b.store_signed {
        return if a.store_signed == Some(true) {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }

    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(
        path: &str,
        version: &str,
        bundle_id: &str,
        store_signed: Option<bool>,
    ) -> AppCandidate {
        AppCandidate {
            path: PathBuf::from(path),
            version: version.to_string(),
            bundle_id: bundle_id.to_string(),
            store_signed,
        }
    }

    #[test]
    fn test_newer_version_ranks_first() {
        let newer = candidate("/A", "2.6.8", "com.brettterpstra.marked2", None);
        let older = candidate("/B", "2.5.0", "com.brettterpstra.marked2", None);
        assert_eq!(rank(&newer, &older), Ordering::Less);
        assert_eq!(rank(&older, &newer), Ordering::Greater);
    }

    #[test]
    fn test_setapp_ranks_last_on_equal_version() {
        let setapp = candidate("/S", "2.6.8", SETAPP_BUNDLE_ID, None);
        let direct = candidate("/D", "2.6.8", "com.brettterpstra.marked2", None);
        assert_eq!(rank(&direct, &setapp), Ordering::Less);
        assert_eq!(rank(&setapp, &direct), Ordering::Greater);
    }

    #[test]
    fn test_store_signed_ranks_last_on_equal_bundle() {
        // End-to-end scenario from the observed behavior: /A (direct) before
        // /B (store-signed) at the same version and bundle id.
        let direct = candidate("/A", "2.0", "x.main", Some(false));
        let signed = candidate("/B", "2.0", "x.main", Some(true));

        let mut list = vec![signed.clone(), direct.clone()];
        list.sort_by(rank);
        assert_eq!(list[0].path, PathBuf::from("/A"));
        assert_eq!(list[1].path, PathBuf::from("/B"));
    }

    #[test]
    fn test_identical_candidates_are_equal() {
        let a = candidate("/A", "2.0", "x.main", Some(false));
        let b = candidate("/B", "2.0", "x.main", Some(false));
        assert_eq!(rank(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_sort_result_independent_of_input_order() {
        let best = candidate("/best", "2.7", "com.brettterpstra.marked2", Some(false));
        let setapp = candidate("/setapp", "2.7", SETAPP_BUNDLE_ID, None);
        let old = candidate("/old", "2.3", "com.brettterpstra.marked2", None);

        let mut forward = vec![best.clone(), setapp.clone(), old.clone()];
        let mut reversed = vec![old.clone(), setapp.clone(), best.clone()];
        forward.sort_by(rank);
        reversed.sort_by(rank);

        assert_eq!(forward[0].path, PathBuf::from("/best"));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_from_metadata_parses_quoted_values() {
        let lines = vec![
            r#"kMDItemVersion = "2.6.8""#.to_string(),
            "kMDItemAppStoreIsAppleSigned = 1".to_string(),
            r#"kMDItemCFBundleIdentifier = "com.brettterpstra.marked2""#.to_string(),
        ];
        let c = AppCandidate::from_metadata(PathBuf::from("/Applications/Marked 2.app"), &lines);

        assert_eq!(c.version, "2.6.8");
        assert_eq!(c.bundle_id, "com.brettterpstra.marked2");
        assert_eq!(c.store_signed, Some(true));
    }

    #[test]
    fn test_from_metadata_missing_properties() {
        let lines = vec![
            "kMDItemVersion = (null)".to_string(),
            "kMDItemAppStoreIsAppleSigned = (null)".to_string(),
        ];
        let c = AppCandidate::from_metadata(PathBuf::from("/X.app"), &lines);

        assert_eq!(c.version, "(null)");
        assert_eq!(c.bundle_id, "");
        assert_eq!(c.store_signed, None);
    }
}
