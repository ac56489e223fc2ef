//! Phases 3 & 4: local-class dominance and remote-package routing
//! (`spec.md` §4.3 "Linker").

use crate::context::Context;
use crate::error::{ContextError, Result};
use crate::partition::{partition, Partitioned};
use ahash::{AHashMap, AHashSet};
use modlink_core::ModuleId;
use modlink_model::ModuleInfo;
use modlink_resolver::Resolution;
use std::collections::BTreeSet;

/// Run phases 2-4 over `resolution`, producing the installed contexts.
///
/// `library_for_module` lets callers record which on-disk library
/// directory each module came from, for path-stacked installations
/// (`spec.md` §3 "libraryForModule"); pass an empty map when building
/// purely in-memory configurations.
pub fn link_installed(
    resolution: &Resolution,
    library_for_module: &AHashMap<ModuleId, String>,
) -> Result<Vec<Context>> {
    let partitions = partition(resolution)?;

    let mut contexts: Vec<Context> = partitions
        .iter()
        .map(|p| {
            let libs = p
                .modules
                .keys()
                .map(|id| (id.clone(), library_for_module.get(id).cloned()))
                .collect();
            Context::new(p.name.clone(), p.modules.clone(), libs)
        })
        .collect();

    for (ctx, partitioned) in contexts.iter_mut().zip(&partitions) {
        link_local_classes(ctx, partitioned)?;
    }

    link_remote_packages(&mut contexts, &partitions)?;
    link_services(&mut contexts);

    Ok(contexts)
}

/// Phase 3: assign a single supplying module per class, failing
/// `AmbiguousClass` when two modules define the same class and neither
/// dominates the other.
fn link_local_classes(ctx: &mut Context, partitioned: &Partitioned) -> Result<()> {
    let mut definers: AHashMap<&str, Vec<&ModuleId>> = AHashMap::default();
    for module in partitioned.modules.values() {
        for classes in module.classes_by_package().values() {
            for class in classes {
                definers.entry(class.as_str()).or_default().push(module.id());
            }
        }
    }

    for (class, ids) in definers {
        let winner = if ids.len() == 1 {
            ids[0]
        } else {
            dominant(&ids, partitioned)?.ok_or_else(|| ContextError::AmbiguousClass {
                class: class.to_string(),
                candidates: ids.iter().map(|id| id.to_string()).collect(),
            })?
        };
        ctx.set_local_class(class.to_string(), winner.clone());
    }
    Ok(())
}

/// The unique module among `ids` whose view declarations dominate every
/// other definer, or `None` if no such module exists.
fn dominant<'a>(ids: &[&'a ModuleId], partitioned: &Partitioned) -> Result<Option<&'a ModuleId>> {
    for &candidate in ids {
        let info = &partitioned.modules[candidate];
        let dominates_all = ids
            .iter()
            .all(|&other| other == candidate || info.dominates(other.name()));
        if dominates_all {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Phase 4: for every package a context imports but does not itself
/// define, find the single other context that defines it.
fn link_remote_packages(contexts: &mut [Context], partitions: &[Partitioned]) -> Result<()> {
    let mut routes: Vec<(usize, String, String)> = Vec::new();

    let by_name: AHashMap<&str, &ModuleInfo> = partitions
        .iter()
        .flat_map(|p| p.modules.values())
        .map(|m| (m.name(), m))
        .collect();

    for (i, partitioned) in partitions.iter().enumerate() {
        let imported = public_import_closure(partitioned, &by_name);

        for package in imported {
            if partitioned.defines_package(&package) {
                continue;
            }
            let suppliers: Vec<&str> = partitions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .filter(|(_, p)| p.defines_package(&package))
                .map(|(_, p)| p.name.as_str())
                .collect();

            if suppliers.len() != 1 {
                return Err(ContextError::AmbiguousPackage {
                    package: package.clone(),
                    candidates: suppliers.into_iter().map(String::from).collect(),
                });
            }
            routes.push((i, package, suppliers[0].to_string()));
        }
    }

    for (i, package, supplier) in routes {
        contexts[i].set_remote_package(package, supplier);
    }
    Ok(())
}

/// The packages a partition must resolve remotely: its own modules' direct
/// imports, plus the imports of every module reachable by following
/// view-dependences marked PUBLIC (`spec.md` line 94: "direct imports +
/// transitive imports through view-dependences marked PUBLIC"). A module
/// re-exports what it imports through a PUBLIC dependence to its own
/// dependents, so the closure must walk PUBLIC edges past the partition's
/// own modules rather than stopping at the first hop.
pub(crate) fn public_import_closure<'a>(
    partitioned: &'a Partitioned,
    by_name: &AHashMap<&str, &'a ModuleInfo>,
) -> BTreeSet<String> {
    let mut imported = BTreeSet::new();
    let mut visited: AHashSet<ModuleId> = AHashSet::default();
    let mut stack: Vec<&ModuleInfo> = partitioned.modules.values().collect();

    while let Some(m) = stack.pop() {
        if !visited.insert(m.id().clone()) {
            continue;
        }
        imported.extend(m.imported_packages().iter().cloned());
        for dep in m.view_dependences() {
            if dep.modifiers().is_public() {
                if let Some(&target) = by_name.get(dep.query().name()) {
                    stack.push(target);
                }
            }
        }
    }

    imported
}

/// Populate each context's service map, preserving provider declaration
/// order (ascending module id within the context).
fn link_services(contexts: &mut [Context]) {
    for ctx in contexts.iter_mut() {
        let modules: Vec<_> = ctx.modules().cloned().collect();
        for module in modules {
            for view in module.views() {
                for (interface, impls) in view.exported_services() {
                    for impl_class in impls {
                        ctx.push_service_impl(interface.clone(), impl_class.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_catalog::MapCatalog;
    use modlink_core::ModuleIdQuery;
    use modlink_model::{Modifier, ModuleInfoBuilder, View};
    use modlink_resolver::Resolver;
    use semver::Version;

    fn v(major: u64) -> Version {
        Version::new(major, 0, 0)
    }

    #[test]
    fn single_root_happy_path_routes_remote_package() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", v(1)))
                .requires(modlink_model::ViewDependence::new(
                    Modifier::Public,
                    ModuleIdQuery::unconstrained("base"),
                ))
                .imports_package("base.pkg")
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("base", v(1)))
                .defines_class("base.pkg", "Thing")
                .build(),
        );

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();
        let contexts = link_installed(&resolution, &AHashMap::default()).unwrap();

        assert_eq!(contexts.len(), 2);
        let app_ctx = contexts.iter().find(|c| c.name().contains("app")).unwrap();
        assert_eq!(
            app_ctx.context_for_remote_package("base.pkg"),
            Some("+base")
        );
    }

    #[test]
    fn transitive_public_import_is_routed_to_the_defining_context() {
        // app PUBLIC-requires base; base PUBLIC-requires core and imports
        // core.pkg; app never mentions core or core.pkg directly, but must
        // still route core.pkg to core's context through the PUBLIC chain.
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", v(1)))
                .requires(modlink_model::ViewDependence::new(
                    Modifier::Public,
                    ModuleIdQuery::unconstrained("base"),
                ))
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("base", v(1)))
                .requires(modlink_model::ViewDependence::new(
                    Modifier::Public,
                    ModuleIdQuery::unconstrained("core"),
                ))
                .imports_package("core.pkg")
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("core", v(1)))
                .defines_class("core.pkg", "Thing")
                .build(),
        );

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();
        let contexts = link_installed(&resolution, &AHashMap::default()).unwrap();

        assert_eq!(contexts.len(), 3);
        let app_ctx = contexts.iter().find(|c| c.name().contains("app")).unwrap();
        assert_eq!(
            app_ctx.context_for_remote_package("core.pkg"),
            Some("+core")
        );
    }

    #[test]
    fn service_discovery_lists_impl_under_context() {
        let mut cat = MapCatalog::new();
        let mut prov_view = View::new("prov");
        prov_view.add_exported_service("S", "prov.Impl");
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("prov", v(1)))
                .view(prov_view)
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", v(1)))
                .uses(modlink_model::ServiceDependence::new(Modifier::Public, "S"))
                .build(),
        );

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();
        let contexts = link_installed(&resolution, &AHashMap::default()).unwrap();

        let prov_ctx = contexts
            .iter()
            .find(|c| c.name().contains("prov"))
            .unwrap();
        assert_eq!(
            prov_ctx.services().get("S"),
            Some(&vec!["prov.Impl".to_string()])
        );
    }
}
