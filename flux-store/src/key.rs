//! Case-insensitive store keys
//!
//! Every store keyed by a free-form identifier (names, GUIDs) goes through
//! `NormalizedKey`, so `"ABC"` and `"abc"` address the same entry everywhere.

use std::cmp::Ordering;
use std::fmt;

/// Lower-cased identifier used for lookups, inserts and load-state tracking
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Normalize `key` by lower-casing it
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NormalizedKey {
    fn from(s: &str) -> Self {
        NormalizedKey::new(s)
    }
}

impl From<String> for NormalizedKey {
    fn from(s: String) -> Self {
        NormalizedKey::new(s)
    }
}

impl From<&String> for NormalizedKey {
    fn from(s: &String) -> Self {
        NormalizedKey::new(s)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Case-insensitive ordering for display names
///
/// Compares the lower-cased forms first and falls back to the original
/// strings so the order is total and stable.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_keys_collide_across_case() {
        assert_eq!(NormalizedKey::new("Abc"), NormalizedKey::new("abc"));
        assert_eq!(NormalizedKey::new("ABC"), NormalizedKey::from("abc"));
        assert_eq!(NormalizedKey::new("ABC").as_str(), "abc");
    }

    #[test]
    fn test_map_lookup_is_case_insensitive() {
        let mut map = HashMap::new();
        map.insert(NormalizedKey::new("Abc"), 1);

        assert_eq!(map.get(&NormalizedKey::new("abc")), Some(&1));
        assert_eq!(map.get(&NormalizedKey::new("ABC")), Some(&1));
    }

    #[test]
    fn test_guid_keys() {
        let upper = NormalizedKey::new("6F2C1B4E-9A3D-4E7B-8C11-0D5A2F3E4B6C");
        let lower = NormalizedKey::new("6f2c1b4e-9a3d-4e7b-8c11-0d5a2f3e4b6c");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_compare_ignore_case() {
        let mut names = vec!["beta", "Alpha", "alpha", "Gamma"];
        names.sort_by(|a, b| compare_ignore_case(a, b));
        assert_eq!(names, vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    proptest! {
        #[test]
        fn prop_case_variants_normalize_equal(s in "[a-zA-Z0-9_-]{0,24}") {
            prop_assert_eq!(NormalizedKey::new(&s), NormalizedKey::new(s.to_uppercase()));
            prop_assert_eq!(NormalizedKey::new(&s), NormalizedKey::new(s.to_lowercase()));
        }
    }
}
