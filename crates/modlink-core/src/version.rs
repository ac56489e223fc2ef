//! Version constraints used by [`crate::ModuleIdQuery`].

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A version constraint admitting a subset of [`Version`]s.
///
/// Stored as the raw constraint string and normalized to a [`VersionReq`]
/// lazily on match, so queries round-trip through the durable configuration
/// store byte-for-byte regardless of how `semver` would re-render them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionConstraint {
    raw: String,
}

impl VersionConstraint {
    /// Create from a raw constraint string.
    #[must_use]
    pub fn new(constraint: impl Into<String>) -> Self {
        Self {
            raw: constraint.into(),
        }
    }

    /// A constraint admitting any version.
    #[must_use]
    pub fn any() -> Self {
        Self::new("*")
    }

    /// A constraint admitting exactly one version.
    #[must_use]
    pub fn exact(version: &Version) -> Self {
        Self::new(format!("={version}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True iff the constraint admits `version`.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        if self.raw.trim() == "*" {
            return true;
        }
        self.to_semver_req().is_some_and(|req| req.matches(version))
    }

    fn to_semver_req(&self) -> Option<VersionReq> {
        VersionReq::parse(&self.normalize()).ok()
    }

    /// Normalize caret/tilde/wildcard/OR syntax into something
    /// `semver::VersionReq` can parse.
    fn normalize(&self) -> String {
        let s = self.raw.trim();

        if s == "*" {
            return "*".to_string();
        }

        if s.ends_with(".*") || s.ends_with(".x") {
            let prefix = &s[..s.len() - 2];
            let parts: Vec<&str> = prefix.split('.').collect();
            return match parts.len() {
                1 => format!(
                    ">={}.0.0, <{}.0.0",
                    parts[0],
                    parts[0].parse::<u64>().unwrap_or(0) + 1
                ),
                2 => format!(
                    ">={}.{}.0, <{}.{}.0",
                    parts[0],
                    parts[1],
                    parts[0],
                    parts[1].parse::<u64>().unwrap_or(0) + 1
                ),
                _ => s.to_string(),
            };
        }

        if let Some(rest) = s.strip_prefix('^') {
            return Self::bare_version(rest);
        }

        if let Some(rest) = s.strip_prefix('~') {
            return Self::tilde_range(rest);
        }

        if s.starts_with(">=") || s.starts_with("<=") || s.starts_with('>') || s.starts_with('<')
        {
            return s.to_string();
        }
        if let Some(rest) = s.strip_prefix('=') {
            return format!("={}", Self::bare_version(rest));
        }

        if s.contains("||") {
            return s
                .split("||")
                .map(|p| Self::new(p.trim()).normalize())
                .collect::<Vec<_>>()
                .join(" || ");
        }

        if s.contains(',') {
            return s
                .split(',')
                .map(|p| Self::new(p.trim()).normalize())
                .collect::<Vec<_>>()
                .join(", ");
        }

        // Bare version: caret semantics (the semver crate's default).
        Self::bare_version(s)
    }

    fn tilde_range(v: &str) -> String {
        let bare = Self::bare_version(v);
        let parts: Vec<&str> = bare.split('.').collect();
        let (major, minor) = (
            parts[0].parse::<u64>().unwrap_or(0),
            parts[1].parse::<u64>().unwrap_or(0),
        );
        format!(">={bare}, <{major}.{}.0", minor + 1)
    }

    /// Fill a partial version (`"1"`, `"1.2"`) out to `major.minor.patch`.
    fn bare_version(v: &str) -> String {
        let v = v.trim().trim_start_matches('v');
        match v.chars().filter(|&c| c == '.').count() {
            0 => format!("{v}.0.0"),
            1 => format!("{v}.0"),
            _ => v.to_string(),
        }
    }
}

impl Default for VersionConstraint {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for VersionConstraint {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn wildcard_matches_everything() {
        let c = VersionConstraint::any();
        assert!(c.matches(&Version::new(0, 0, 0)));
        assert!(c.matches(&Version::new(99, 99, 99)));
    }

    #[test]
    fn exact_matches_only_itself() {
        let c = VersionConstraint::exact(&Version::new(1, 2, 3));
        assert!(c.matches(&Version::new(1, 2, 3)));
        assert!(!c.matches(&Version::new(1, 2, 4)));
    }

    #[test_case("^1.2", 1, 2, 0, true; "caret matches floor")]
    #[test_case("^1.2", 1, 9, 9, true; "caret matches higher minor")]
    #[test_case("^1.2", 2, 0, 0, false; "caret rejects next major")]
    #[test_case("~1.2.0", 1, 2, 5, true; "tilde matches higher patch")]
    #[test_case("~1.2.0", 1, 3, 0, false; "tilde rejects higher minor")]
    #[test_case(">=1.0.0", 2, 0, 0, true; "gte matches higher")]
    #[test_case("3.*", 3, 5, 0, true; "major wildcard matches")]
    #[test_case("3.*", 4, 0, 0, false; "major wildcard rejects other major")]
    fn table(constraint: &str, major: u64, minor: u64, patch: u64, expected: bool) {
        let c = VersionConstraint::new(constraint);
        assert_eq!(c.matches(&Version::new(major, minor, patch)), expected);
    }

    #[test]
    fn serde_roundtrip() {
        let c = VersionConstraint::new("^1.0");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"^1.0\"");
        let back: VersionConstraint = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    proptest! {
        #[test]
        fn wildcard_matches_any_version(major in 0u64..50, minor in 0u64..50, patch in 0u64..50) {
            prop_assert!(VersionConstraint::any().matches(&Version::new(major, minor, patch)));
        }

        #[test]
        fn exact_matches_are_reflexive(major in 0u64..50, minor in 0u64..50, patch in 0u64..50) {
            let v = Version::new(major, minor, patch);
            prop_assert!(VersionConstraint::exact(&v).matches(&v));
        }
    }
}
