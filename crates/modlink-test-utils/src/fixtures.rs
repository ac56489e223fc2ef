//! Pre-built catalog fixtures for the configurator pipeline's common
//! testable scenarios.

use modlink_catalog::MapCatalog;
use modlink_core::{ModuleId, VersionConstraint};
use modlink_model::{Modifier, ModuleInfoBuilder, ServiceDependence, View, ViewDependence};
use semver::Version;

/// Collection of pre-built catalog fixtures.
#[derive(Debug)]
pub struct Fixtures;

impl Fixtures {
    /// Shorthand for a plain `major.0.0` version.
    #[must_use]
    pub fn version(major: u64) -> Version {
        Version::new(major, 0, 0)
    }

    /// A single module with no dependences.
    #[must_use]
    pub fn single_module(name: &str) -> MapCatalog {
        let mut catalog = MapCatalog::new();
        catalog.insert(ModuleInfoBuilder::new(ModuleId::versioned(name, Self::version(1))).build());
        catalog
    }

    /// `app` LOCAL-requires `base`: one context after partitioning
    /// (`spec.md` §8 scenario 2).
    #[must_use]
    pub fn local_dependence_pair() -> MapCatalog {
        let mut catalog = MapCatalog::new();
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", Self::version(1)))
                .requires(ViewDependence::new(
                    Modifier::Local,
                    modlink_core::ModuleIdQuery::unconstrained("base"),
                ))
                .build(),
        );
        catalog.insert(ModuleInfoBuilder::new(ModuleId::versioned("base", Self::version(1))).build());
        catalog
    }

    /// `app` PUBLIC-requires `base` and imports a package only `base`
    /// defines: two contexts, one remote-package route (`spec.md` §8
    /// scenario 3).
    #[must_use]
    pub fn remote_package_pair() -> MapCatalog {
        let mut catalog = MapCatalog::new();
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", Self::version(1)))
                .requires(ViewDependence::new(
                    Modifier::Public,
                    modlink_core::ModuleIdQuery::unconstrained("base"),
                ))
                .imports_package("base.pkg")
                .build(),
        );
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("base", Self::version(1)))
                .defines_class("base.pkg", "Thing")
                .build(),
        );
        catalog
    }

    /// Two versions of `lib` available; `app` requires `>=2`, so the
    /// resolver must skip `lib@1.0.0`.
    #[must_use]
    pub fn version_choice() -> MapCatalog {
        let mut catalog = MapCatalog::new();
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", Self::version(1)))
                .requires(ViewDependence::new(
                    Modifier::Public,
                    modlink_core::ModuleIdQuery::constrained("lib", VersionConstraint::new(">=2.0.0")),
                ))
                .build(),
        );
        catalog.insert(ModuleInfoBuilder::new(ModuleId::versioned("lib", Self::version(1))).build());
        catalog.insert(ModuleInfoBuilder::new(ModuleId::versioned("lib", Self::version(2))).build());
        catalog
    }

    /// `app` uses service `S`; `prov` exports a view implementing it.
    #[must_use]
    pub fn service_provider_pair() -> MapCatalog {
        let mut catalog = MapCatalog::new();
        let mut provider_view = View::new("prov");
        provider_view.add_exported_service("S", "prov.Impl");
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("prov", Self::version(1)))
                .view(provider_view)
                .build(),
        );
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", Self::version(1)))
                .uses(ServiceDependence::new(Modifier::Public, "S"))
                .build(),
        );
        catalog
    }

    /// `app` PUBLIC-requires `base`, but `base`'s primary view permits
    /// only `other` (`spec.md` §8 scenario 5): resolution must fail.
    #[must_use]
    pub fn permits_violation_pair() -> MapCatalog {
        let mut catalog = MapCatalog::new();
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", Self::version(1)))
                .requires(ViewDependence::new(
                    Modifier::Public,
                    modlink_core::ModuleIdQuery::unconstrained("base"),
                ))
                .build(),
        );
        let mut base_view = View::new("base");
        base_view.add_permit("other");
        catalog.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("base", Self::version(1)))
                .view(base_view)
                .build(),
        );
        catalog
    }
}
