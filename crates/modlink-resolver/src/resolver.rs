//! Phase 1: depth-first backtracking version resolution (`spec.md` §4.1).

use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::types::Resolution;
use ahash::{AHashMap, AHashSet};
use modlink_catalog::{Catalog, Library, RemoteRepository};
use modlink_core::{ModuleId, ModuleIdQuery};
use modlink_model::{Modifier, Modifiers, ModuleInfo, View};
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, trace, warn};
use url::Url;

/// The mutable side-state the search threads through recursion, cloned
/// as a checkpoint before each tentative bind and restored on failure
/// (`spec.md` §9 "Backtracking state"): an explicit, non-exception-based
/// revert rather than persistent structures, which is simpler to audit
/// for a search this shallow.
#[derive(Default, Clone)]
struct State {
    chosen: AHashMap<String, Rc<ModuleInfo>>,
    origins: AHashMap<String, Url>,
    needed: AHashSet<ModuleId>,
    download_size: u64,
    install_size: u64,
    service_queue: VecDeque<(String, Modifiers)>,
    service_cache: AHashMap<String, Vec<String>>,
}

/// Depth-first backtracking resolver over a [`Library`]'s catalog and, on
/// local exhaustion, its first remote repository.
pub struct Resolver<'a> {
    library: &'a dyn Library,
    config: ResolverConfig,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").field("config", &self.config).finish()
    }
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(library: &'a dyn Library) -> Self {
        Self::with_config(library, ResolverConfig::default())
    }

    #[must_use]
    pub fn with_config(library: &'a dyn Library, config: ResolverConfig) -> Self {
        Self { library, config }
    }

    /// Resolve `roots`, returning the chosen module set or `Unresolvable`.
    pub fn resolve(&self, roots: &[ModuleIdQuery]) -> Result<Resolution> {
        let mut state = State::default();

        for query in roots {
            debug!(root = %query, "resolving root query");
            self.resolve_choice(None, Modifiers::NONE, query, &mut state, 0)?;
        }

        self.resolve_services(&mut state)?;
        self.post_check(&state)?;

        Ok(Resolution::new(
            state.chosen,
            state.origins,
            state.needed,
            state.download_size,
            state.install_size,
        ))
    }

    /// Resolve one choice: a (requester, modifiers, query) triple, per
    /// `spec.md` §4.1 steps 1-5.
    fn resolve_choice(
        &self,
        requester: Option<&str>,
        modifiers: Modifiers,
        query: &ModuleIdQuery,
        state: &mut State,
        depth: usize,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(ResolveError::Unresolvable {
                query: query.clone(),
                cause: None,
            });
        }

        let name = query.name();

        // Step 1: already bound.
        if let Some(info) = state.chosen.get(name).cloned() {
            return self.accept_existing_binding(requester, modifiers, query, &info);
        }

        // Track the most specific failure seen across backtracked
        // candidates, so a caller can learn *why* resolution ultimately
        // failed (e.g. a permits violation) rather than just that it did.
        let mut last_err: Option<ResolveError> = None;

        // Step 2: local candidates, descending by version.
        let mut candidates = self.library.find_module_ids(name);
        candidates.sort_by(|a, b| b.cmp(a));
        for candidate in &candidates {
            if !query.matches(candidate) {
                continue;
            }
            let checkpoint = state.clone();
            match self.try_bind(requester, modifiers, name, candidate, None, state, depth) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    trace!(%candidate, %err, "candidate failed, backtracking");
                    *state = checkpoint;
                    last_err = Some(err);
                }
            }
        }

        // Step 3: optional dependences may go unsatisfied.
        if modifiers.is_optional() {
            debug!(%name, "optional dependence unresolved, skipping");
            return Ok(());
        }

        // Step 4: first remote repository.
        if let Some(repo) = self.library.repository_list().first() {
            let mut remote_candidates = repo.find_module_ids(name);
            remote_candidates.sort_by(|a, b| b.cmp(a));
            for candidate in &remote_candidates {
                if !query.matches(candidate) {
                    continue;
                }
                let checkpoint = state.clone();
                match self.try_bind(
                    requester,
                    modifiers,
                    name,
                    candidate,
                    Some(repo.as_ref()),
                    state,
                    depth,
                ) {
                    Ok(()) => return Ok(()),
                    Err(err) => {
                        trace!(%candidate, %err, "remote candidate failed, backtracking");
                        *state = checkpoint;
                        last_err = Some(err);
                    }
                }
            }
        }

        Err(ResolveError::Unresolvable {
            query: query.clone(),
            cause: last_err.map(Box::new),
        })
    }

    fn accept_existing_binding(
        &self,
        requester: Option<&str>,
        modifiers: Modifiers,
        query: &ModuleIdQuery,
        info: &ModuleInfo,
    ) -> Result<()> {
        // Open question (spec.md §9, "Aliases with versions"): a
        // SYNTHESIZED dependence accepts the existing binding by name
        // alone, regardless of whether its version constraint matches.
        let name_matches = info.view_for(query.name()).is_some();
        let accepted = if modifiers.is_synthesized() {
            name_matches
        } else {
            name_matches && query.matches(info.id())
        };
        if !accepted {
            return Err(ResolveError::Unresolvable {
                query: query.clone(),
                cause: None,
            });
        }

        let view = info
            .view_for(query.name())
            .ok_or_else(|| ResolveError::Unresolvable {
                query: query.clone(),
                cause: None,
            })?;
        check_permits(requester, info, view, modifiers)
    }

    fn try_bind(
        &self,
        requester: Option<&str>,
        modifiers: Modifiers,
        name: &str,
        candidate: &ModuleId,
        repo: Option<&dyn RemoteRepository>,
        state: &mut State,
        depth: usize,
    ) -> Result<()> {
        let info = Rc::new(self.library.read_module_info(candidate)?);
        let view = info
            .view_for(name)
            .ok_or_else(|| ResolveError::Unresolvable {
                query: ModuleIdQuery::unconstrained(name),
                cause: None,
            })?;
        check_permits(requester, &info, view, modifiers)?;

        state.chosen.insert(name.to_string(), Rc::clone(&info));

        if let Some(repo) = repo {
            let meta = repo
                .fetch_meta_data(candidate)
                .map_err(|_| ResolveError::Unresolvable {
                    query: ModuleIdQuery::unconstrained(name),
                    cause: None,
                })?;
            state.needed.insert(candidate.clone());
            state.download_size += meta.download_size;
            state.install_size += meta.install_size;
            state
                .origins
                .insert(name.to_string(), repo.location().clone());
        }

        // Source order preserved by pushing in reverse (spec.md §4.1
        // "Determinism": dependence push order is reverse source order so
        // choices are explored in source order).
        for dep in info.view_dependences().iter().rev() {
            self.resolve_choice(Some(name), dep.modifiers(), dep.query(), state, depth + 1)?;
        }

        for sd in info.service_dependences() {
            state
                .service_queue
                .push_back((sd.interface().to_string(), sd.modifiers()));
        }

        Ok(())
    }

    /// Drain the service-interface FIFO, synthesizing one OPTIONAL
    /// SYNTHESIZED view-dependence per declaring module per interface,
    /// caching the provider list per interface (`spec.md` §4.1
    /// "Services").
    fn resolve_services(&self, state: &mut State) -> Result<()> {
        while let Some((interface, _modifiers)) = state.service_queue.pop_front() {
            let providers = if let Some(cached) = state.service_cache.get(&interface) {
                cached.clone()
            } else {
                let computed = self.providers_of(&interface);
                state
                    .service_cache
                    .insert(interface.clone(), computed.clone());
                computed
            };

            let synth = Modifier::Optional | Modifier::Synthesized;
            for provider_name in providers {
                let query = ModuleIdQuery::unconstrained(&provider_name);
                if let Err(err) = self.resolve_choice(None, synth, &query, state, 0) {
                    // spec.md §9, open question: log and continue rather
                    // than fail the overall resolve.
                    warn!(%interface, provider = %provider_name, %err, "service provider resolution failed, ignoring");
                }
            }
        }
        Ok(())
    }

    fn providers_of(&self, interface: &str) -> Vec<String> {
        self.library
            .list_declaring_module_ids()
            .iter()
            .filter_map(|id| self.library.read_module_info(id).ok())
            .filter(|info| info.provides(interface))
            .map(|info| info.name().to_string())
            .collect()
    }

    fn post_check(&self, state: &State) -> Result<()> {
        let provided: AHashSet<&str> = state
            .chosen
            .values()
            .flat_map(|m| {
                m.views()
                    .iter()
                    .flat_map(|v| v.exported_services().keys().map(String::as_str))
            })
            .collect();

        for info in state.chosen.values() {
            for sd in info.service_dependences() {
                if !sd.modifiers().is_optional() && !provided.contains(sd.interface()) {
                    return Err(ResolveError::MissingService(sd.interface().to_string()));
                }
            }
        }
        Ok(())
    }
}

/// `spec.md` §4.1 "Permits": requester is the synthetic root, or the
/// view's permits are empty and the dependence is not LOCAL, or the
/// requester is explicitly permitted.
fn check_permits(
    requester: Option<&str>,
    info: &ModuleInfo,
    view: &View,
    modifiers: Modifiers,
) -> Result<()> {
    let ok = requester.is_none()
        || (view.permits().is_empty() && !modifiers.is_local())
        || requester.is_some_and(|r| view.permits().contains(r));

    if ok {
        Ok(())
    } else {
        Err(ResolveError::PermitsViolation {
            requester: requester.unwrap_or("<root>").to_string(),
            module: info.id().to_string(),
            view: view.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_catalog::MapCatalog;
    use modlink_core::VersionConstraint;
    use modlink_model::{ServiceDependence, ViewDependence};
    use semver::Version;

    fn v(major: u64) -> Version {
        Version::new(major, 0, 0)
    }

    #[test]
    fn single_root_happy_path() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("app", v(1)))
                .requires(ViewDependence::new(
                    Modifier::Local,
                    ModuleIdQuery::constrained("base", VersionConstraint::new(">=1.0.0")),
                ))
                .build(),
        );
        cat.insert(ModuleInfo::builder(ModuleId::versioned("base", v(1))).build());
        cat.insert(ModuleInfo::builder(ModuleId::versioned("base", v(0))).build());

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();

        assert_eq!(resolution.len(), 2);
        assert_eq!(resolution.get("base").unwrap().id().version(), Some(&v(1)));
    }

    #[test]
    fn backtracks_over_versions() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("app", v(1)))
                .requires(ViewDependence::new(
                    Modifiers::NONE,
                    ModuleIdQuery::constrained("x", VersionConstraint::new(">=2.0.0")),
                ))
                .build(),
        );
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("x", v(3)))
                .requires(ViewDependence::new(
                    Modifiers::NONE,
                    ModuleIdQuery::constrained(
                        "y",
                        VersionConstraint::exact(&Version::new(1, 0, 0)),
                    ),
                ))
                .build(),
        );
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("x", v(2)))
                .requires(ViewDependence::new(
                    Modifiers::NONE,
                    ModuleIdQuery::constrained("y", VersionConstraint::new(">=1.0.0")),
                ))
                .build(),
        );
        cat.insert(ModuleInfo::builder(ModuleId::versioned("y", v(1))).build());

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();

        assert_eq!(resolution.get("x").unwrap().id().version(), Some(&v(2)));
    }

    #[test]
    fn permits_violation_is_unresolvable() {
        let mut cat = MapCatalog::new();
        let mut lib_view = View::new("lib");
        lib_view.add_permit("friend");
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("lib", v(1)))
                .view(lib_view)
                .build(),
        );
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("app", v(1)))
                .requires(ViewDependence::new(
                    Modifiers::NONE,
                    ModuleIdQuery::unconstrained("lib"),
                ))
                .build(),
        );

        let err = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap_err();
        let ResolveError::Unresolvable { cause, .. } = &err else {
            panic!("expected Unresolvable, got {err}");
        };
        assert!(
            matches!(cause.as_deref(), Some(ResolveError::PermitsViolation { module, .. }) if module == "lib@1.0.0"),
            "expected cause to cite a PermitsViolation on lib@1, got {cause:?}"
        );
    }

    #[test]
    fn service_discovery_resolves_optional_provider() {
        let mut cat = MapCatalog::new();
        let mut prov_view = View::new("prov");
        prov_view.add_exported_service("S", "prov.Impl");
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("prov", v(1)))
                .view(prov_view)
                .build(),
        );
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("app", v(1)))
                .uses(ServiceDependence::new(Modifiers::NONE, "S"))
                .build(),
        );

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();

        assert!(resolution.get("prov").is_some());
    }

    #[test]
    fn missing_required_service_fails_post_check() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfo::builder(ModuleId::versioned("app", v(1)))
                .uses(ServiceDependence::new(Modifier::Public, "S"))
                .build(),
        );

        let err = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingService(iface) if iface == "S"));
    }
}
