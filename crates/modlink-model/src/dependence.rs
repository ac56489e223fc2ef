//! View-dependences and service-dependences.

use crate::modifiers::Modifiers;
use modlink_core::ModuleIdQuery;

/// A directed requirement from one module (view) to another, declared on
/// the requesting module.
///
/// Called `Requires` at call sites that only ever add LOCAL, non-optional
/// dependences and `Exports` where PUBLIC is set; both are the same type,
/// `spec.md` §3 draws no further distinction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDependence {
    modifiers: Modifiers,
    query: ModuleIdQuery,
}

impl ViewDependence {
    #[must_use]
    pub fn new(modifiers: impl Into<Modifiers>, query: ModuleIdQuery) -> Self {
        Self {
            modifiers: modifiers.into(),
            query,
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub fn query(&self) -> &ModuleIdQuery {
        &self.query
    }
}

/// A decoupled requirement on a service interface, independent of which
/// module provides it (`Provides` on the other side of the same
/// interface name is just a view's `exported_services` entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDependence {
    modifiers: Modifiers,
    interface: String,
}

impl ServiceDependence {
    #[must_use]
    pub fn new(modifiers: impl Into<Modifiers>, interface: impl Into<String>) -> Self {
        Self {
            modifiers: modifiers.into(),
            interface: interface.into(),
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }
}
