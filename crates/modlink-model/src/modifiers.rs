//! Dependence modifiers: LOCAL, OPTIONAL, PUBLIC, SYNTHESIZED.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of [`Modifier`] flags attached to a view- or service-dependence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

/// A single dependence modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// The dependence requires the target to share a context with the requester.
    Local = 0b0001,
    /// Resolution failure of this dependence does not fail the overall resolve.
    Optional = 0b0010,
    /// The dependence is re-exported to the requester's own dependents.
    Public = 0b0100,
    /// The dependence was synthesized by service discovery, not declared.
    Synthesized = 0b1000,
}

impl Modifiers {
    pub const NONE: Self = Self(0);

    #[must_use]
    pub fn contains(self, m: Modifier) -> bool {
        self.0 & m as u8 != 0
    }

    #[must_use]
    pub fn is_local(self) -> bool {
        self.contains(Modifier::Local)
    }

    #[must_use]
    pub fn is_optional(self) -> bool {
        self.contains(Modifier::Optional)
    }

    #[must_use]
    pub fn is_public(self) -> bool {
        self.contains(Modifier::Public)
    }

    #[must_use]
    pub fn is_synthesized(self) -> bool {
        self.contains(Modifier::Synthesized)
    }
}

impl From<Modifier> for Modifiers {
    fn from(m: Modifier) -> Self {
        Self(m as u8)
    }
}

impl BitOr for Modifier {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Modifiers {
        Modifiers(self as u8 | rhs as u8)
    }
}

impl BitOr<Modifier> for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Modifier) -> Self {
        Self(self.0 | rhs as u8)
    }
}

impl BitOrAssign<Modifier> for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifier) {
        self.0 |= rhs as u8;
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, |acc, m| acc | m)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.is_local() {
            parts.push("LOCAL");
        }
        if self.is_optional() {
            parts.push("OPTIONAL");
        }
        if self.is_public() {
            parts.push("PUBLIC");
        }
        if self.is_synthesized() {
            parts.push("SYNTHESIZED");
        }
        write!(f, "{}", parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_flags() {
        let m: Modifiers = [Modifier::Local, Modifier::Public].into_iter().collect();
        assert!(m.is_local());
        assert!(m.is_public());
        assert!(!m.is_optional());
    }

    #[test]
    fn display_lists_set_flags_in_order() {
        let m: Modifiers = [Modifier::Optional, Modifier::Local].into_iter().collect();
        assert_eq!(m.to_string(), "LOCAL|OPTIONAL");
    }
}
