//! [`ModuleId`]: a module name with an optional version.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Identifies a module: a name, and optionally the version of that name.
///
/// Versions form a total order; a missing version sorts least, so an
/// unversioned id is always ordered before any versioned id with the same
/// name (`spec.md` §3, "Versions form a total order; null sorts least").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    name: String,
    version: Option<Version>,
}

impl ModuleId {
    /// Build an id with no version.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Build an id with a version.
    #[must_use]
    pub fn versioned(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version: Some(version),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl FromStr for ModuleId {
    type Err = Error;

    /// Parse `"name"` or `"name@version"`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('@') {
            None => {
                if s.is_empty() || s.contains('@') {
                    return Err(Error::InvalidName(s.to_string()));
                }
                Ok(Self::new(s))
            }
            Some((name, version)) => {
                if name.is_empty() {
                    return Err(Error::InvalidName(s.to_string()));
                }
                let version = Version::parse(version).map_err(|e| Error::InvalidVersion {
                    name: name.to_string(),
                    version: version.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Self::versioned(name, version))
            }
        }
    }
}

impl PartialOrd for ModuleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| match (&self.version, &other.version) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{v}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_sorts_before_versioned() {
        let a = ModuleId::new("m");
        let b = ModuleId::versioned("m", Version::new(1, 0, 0));
        assert!(a < b);
    }

    #[test]
    fn ordering_is_by_name_then_version() {
        let a = ModuleId::versioned("a", Version::new(9, 0, 0));
        let b = ModuleId::versioned("b", Version::new(0, 0, 1));
        assert!(a < b);

        let a1 = ModuleId::versioned("m", Version::new(1, 0, 0));
        let a2 = ModuleId::versioned("m", Version::new(2, 0, 0));
        assert!(a1 < a2);
    }

    #[test]
    fn display_includes_version_when_present() {
        assert_eq!(ModuleId::new("base").to_string(), "base");
        assert_eq!(
            ModuleId::versioned("base", Version::new(1, 2, 3)).to_string(),
            "base@1.2.3"
        );
    }

    #[test]
    fn parse_roundtrips_through_display() {
        let id: ModuleId = "base@1.2.3".parse().unwrap();
        assert_eq!(id, ModuleId::versioned("base", Version::new(1, 2, 3)));
        assert_eq!(id.to_string(), "base@1.2.3");

        let id: ModuleId = "base".parse().unwrap();
        assert_eq!(id, ModuleId::new("base"));
    }

    #[test]
    fn parse_rejects_empty_name_and_bad_version() {
        assert!("".parse::<ModuleId>().is_err());
        assert!("@1.0.0".parse::<ModuleId>().is_err());
        assert!("base@not-a-version".parse::<ModuleId>().is_err());
    }
}
