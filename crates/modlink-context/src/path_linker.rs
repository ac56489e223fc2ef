//! §4.4 "PathLinker": the compile-time alternative to phases 3 & 4.

use crate::error::Result;
use crate::linker::public_import_closure;
use crate::partition::{partition, Partitioned};
use crate::path_context::PathContext;
use ahash::AHashMap;
use modlink_model::ModuleInfo;
use modlink_resolver::Resolution;
use std::collections::BTreeSet;

/// Build [`PathContext`]s for `resolution`.
///
/// Unlike [`crate::link_installed`], an unresolvable class dominance
/// (no unique dominant definition) is not an error here — `spec.md` §4.4:
/// "an arbitrary dominant-when-present ordering is acceptable". Module
/// order within a component otherwise follows ascending id.
pub fn link_path_contexts(resolution: &Resolution) -> Result<Vec<PathContext>> {
    let partitions = partition(resolution)?;

    let by_name: AHashMap<&str, &ModuleInfo> = partitions
        .iter()
        .flat_map(|p| p.modules.values())
        .map(|m| (m.name(), m))
        .collect();

    Ok(partitions
        .iter()
        .map(|p| build_one(p, &partitions, &by_name))
        .collect())
}

fn build_one(
    partitioned: &Partitioned,
    all: &[Partitioned],
    by_name: &AHashMap<&str, &ModuleInfo>,
) -> PathContext {
    let search_path = dominator_order(partitioned);

    // Direct imports plus transitive imports through PUBLIC
    // view-dependences (`spec.md` line 94), same closure the installed
    // linker uses for phase 4.
    let imported = public_import_closure(partitioned, by_name);

    let mut remote_contexts = BTreeSet::new();
    for package in &imported {
        if partitioned.defines_package(package) {
            continue;
        }
        for other in all {
            if other.name != partitioned.name && other.defines_package(package) {
                remote_contexts.insert(other.name.clone());
            }
        }
    }

    PathContext::new(
        partitioned.name.clone(),
        partitioned.modules.clone(),
        search_path,
        remote_contexts,
    )
}

/// Order modules ascending by id, moving any module that dominates
/// another definer of the same class ahead of it.
fn dominator_order(partitioned: &Partitioned) -> Vec<modlink_core::ModuleId> {
    let mut ids: Vec<_> = partitioned.modules.keys().cloned().collect();
    ids.sort_by(|a, b| {
        let a_info = &partitioned.modules[a];
        let b_info = &partitioned.modules[b];
        if a_info.dominates(b_info.name()) {
            std::cmp::Ordering::Less
        } else if b_info.dominates(a_info.name()) {
            std::cmp::Ordering::Greater
        } else {
            a.cmp(b)
        }
    });
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_catalog::MapCatalog;
    use modlink_core::{ModuleId, ModuleIdQuery};
    use modlink_model::ModuleInfoBuilder;
    use modlink_resolver::Resolver;
    use semver::Version;

    #[test]
    fn search_path_orders_dominant_module_first() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("a", Version::new(1, 0, 0)))
                .defines_class("p", "Thing")
                .dominates("b")
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("b", Version::new(1, 0, 0)))
                .defines_class("p", "Thing")
                .requires(modlink_model::ViewDependence::new(
                    modlink_model::Modifier::Local,
                    ModuleIdQuery::unconstrained("a"),
                ))
                .build(),
        );

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("b")])
            .unwrap();
        let contexts = link_path_contexts(&resolution).unwrap();

        assert_eq!(contexts.len(), 1);
        let path = contexts[0].search_path();
        let a_pos = path.iter().position(|id| id.name() == "a").unwrap();
        let b_pos = path.iter().position(|id| id.name() == "b").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn transitive_public_import_reaches_remote_context() {
        let mut cat = MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", Version::new(1, 0, 0)))
                .requires(modlink_model::ViewDependence::new(
                    modlink_model::Modifier::Public,
                    ModuleIdQuery::unconstrained("base"),
                ))
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("base", Version::new(1, 0, 0)))
                .requires(modlink_model::ViewDependence::new(
                    modlink_model::Modifier::Public,
                    ModuleIdQuery::unconstrained("core"),
                ))
                .imports_package("core.pkg")
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("core", Version::new(1, 0, 0)))
                .defines_class("core.pkg", "Thing")
                .build(),
        );

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();
        let contexts = link_path_contexts(&resolution).unwrap();

        let app_ctx = contexts
            .iter()
            .find(|c| c.name().contains("app"))
            .unwrap();
        assert!(app_ctx.remote_contexts().iter().any(|n| n.contains("core")));
    }
}
