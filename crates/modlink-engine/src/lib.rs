//! Ties the configurator's phases together: catalog lookup through
//! [`modlink_resolver`], partitioning and linking through
//! [`modlink_context`], and persistence through [`modlink_config`]
//! (`spec.md` §2 "System overview").

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod configuration;
mod error;

pub use configuration::{build_configuration, root_ids};
pub use error::{EngineError, Result};

use ahash::AHashMap;
use modlink_catalog::Library;
use modlink_config::Configuration;
use modlink_context::{link_installed, link_path_contexts, Context, PathContext};
use modlink_core::{ModuleId, ModuleIdQuery};
use modlink_resolver::{Resolution, Resolver, ResolverConfig};
use std::path::Path;

/// The pipeline's entry point: a [`Library`] to resolve against, plus the
/// resolver tuning this engine runs with.
pub struct Engine<'a> {
    library: &'a dyn Library,
    resolver_config: ResolverConfig,
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("resolver_config", &self.resolver_config)
            .finish_non_exhaustive()
    }
}

impl<'a> Engine<'a> {
    #[must_use]
    pub fn new(library: &'a dyn Library) -> Self {
        Self {
            library,
            resolver_config: ResolverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_resolver_config(library: &'a dyn Library, resolver_config: ResolverConfig) -> Self {
        Self {
            library,
            resolver_config,
        }
    }

    /// Phase 1: resolve a set of root module queries.
    pub fn resolve(&self, roots: &[ModuleIdQuery]) -> Result<Resolution> {
        let resolver = Resolver::with_config(self.library, self.resolver_config.clone());
        Ok(resolver.resolve(roots)?)
    }

    /// Phases 2-4: partition `resolution` and link it for installation,
    /// recording which on-disk library each module came from.
    pub fn link_installed(
        &self,
        resolution: &Resolution,
        library_for_module: &AHashMap<ModuleId, String>,
    ) -> Result<Vec<Context>> {
        Ok(link_installed(resolution, library_for_module)?)
    }

    /// Phases 2-4, compile-time variant: non-failing dominator ordering and
    /// a flat remote-context search path per partition.
    pub fn link_for_compile(&self, resolution: &Resolution) -> Result<Vec<PathContext>> {
        Ok(link_path_contexts(resolution)?)
    }

    /// Run the full installed pipeline and persist the resulting
    /// [`Configuration`] to `destination`.
    pub fn install(
        &self,
        roots: &[ModuleIdQuery],
        library_for_module: &AHashMap<ModuleId, String>,
        destination: &Path,
    ) -> Result<Configuration> {
        let resolution = self.resolve(roots)?;
        let contexts = self.link_installed(&resolution, library_for_module)?;
        let cfg = build_configuration(root_ids(roots, &resolution), &contexts);
        modlink_config::save(destination, &cfg)?;
        Ok(cfg)
    }

    /// Load a previously persisted [`Configuration`].
    pub fn load(&self, source: &Path) -> Result<Configuration> {
        Ok(modlink_config::load(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_catalog::MapCatalog;
    use modlink_model::{Modifier, ModuleInfoBuilder};
    use semver::Version;

    fn v(major: u64) -> Version {
        Version::new(major, 0, 0)
    }

    #[test]
    fn install_persists_a_loadable_configuration() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", v(1)))
                .requires(modlink_model::ViewDependence::new(
                    Modifier::Local,
                    ModuleIdQuery::unconstrained("base"),
                ))
                .build(),
        );
        cat.insert(ModuleInfoBuilder::new(ModuleId::versioned("base", v(1))).build());

        let engine = Engine::new(&cat);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("config");

        let cfg = engine
            .install(
                &[ModuleIdQuery::unconstrained("app")],
                &AHashMap::default(),
                &dest,
            )
            .unwrap();

        assert_eq!(cfg.root_ids(), &[ModuleId::versioned("app", v(1))]);
        // app and base are LOCAL-linked, so they land in one context.
        assert_eq!(cfg.contexts().len(), 1);

        let loaded = engine.load(&dest).unwrap();
        assert_eq!(loaded, cfg);
    }
}
