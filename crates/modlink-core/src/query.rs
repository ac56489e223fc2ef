//! [`ModuleIdQuery`]: a name plus an optional version constraint.

use crate::{ModuleId, VersionConstraint};
use std::fmt;

/// A query against a module name, optionally narrowed by version.
///
/// `matches(id)` is true iff the names are equal and the constraint, if
/// present, admits the id's version. An id with no version only matches a
/// query with no constraint (there is nothing for the constraint to test).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdQuery {
    name: String,
    constraint: Option<VersionConstraint>,
}

impl ModuleIdQuery {
    /// A query matching any version of `name`.
    #[must_use]
    pub fn unconstrained(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    /// A query matching only versions of `name` admitted by `constraint`.
    #[must_use]
    pub fn constrained(name: impl Into<String>, constraint: VersionConstraint) -> Self {
        Self {
            name: name.into(),
            constraint: Some(constraint),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn constraint(&self) -> Option<&VersionConstraint> {
        self.constraint.as_ref()
    }

    /// True iff `id` satisfies this query.
    #[must_use]
    pub fn matches(&self, id: &ModuleId) -> bool {
        if id.name() != self.name {
            return false;
        }
        match (&self.constraint, id.version()) {
            (None, _) => true,
            (Some(c), Some(v)) => c.matches(v),
            (Some(_), None) => false,
        }
    }
}

impl fmt::Display for ModuleIdQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(c) => write!(f, "{}@{c}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn unconstrained_matches_any_version() {
        let q = ModuleIdQuery::unconstrained("m");
        assert!(q.matches(&ModuleId::new("m")));
        assert!(q.matches(&ModuleId::versioned("m", Version::new(1, 0, 0))));
    }

    #[test]
    fn constrained_rejects_unversioned_id() {
        let q = ModuleIdQuery::constrained("m", VersionConstraint::any());
        assert!(!q.matches(&ModuleId::new("m")));
    }

    #[test]
    fn constrained_checks_name_and_version() {
        let q = ModuleIdQuery::constrained("m", VersionConstraint::new("^1.0"));
        assert!(q.matches(&ModuleId::versioned("m", Version::new(1, 2, 0))));
        assert!(!q.matches(&ModuleId::versioned("m", Version::new(2, 0, 0))));
        assert!(!q.matches(&ModuleId::versioned("other", Version::new(1, 0, 0))));
    }

    #[test]
    fn display_includes_constraint_when_present() {
        assert_eq!(ModuleIdQuery::unconstrained("m").to_string(), "m");
        assert_eq!(
            ModuleIdQuery::constrained("m", VersionConstraint::new("^1.0")).to_string(),
            "m@^1.0"
        );
    }
}
