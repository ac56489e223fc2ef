//! Phase 2: undirected-connected-components partitioning
//! (`spec.md` §4.2 "ContextBuilder").

use crate::error::{ContextError, Result};
use ahash::{AHashMap, AHashSet};
use modlink_core::ModuleId;
use modlink_model::ModuleInfo;
use modlink_resolver::Resolution;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Dfs;
use std::collections::BTreeMap;

/// One connected component, named after freezing.
///
/// Modeled as a builder output rather than a tagged `Building`/`Frozen`
/// enum (`spec.md` §9 "Freezing"): [`partition`] never hands out an
/// unnamed value, so there is no intermediate state for callers to observe.
#[derive(Debug, Clone)]
pub struct Partitioned {
    pub name: String,
    pub modules: BTreeMap<ModuleId, ModuleInfo>,
}

impl Partitioned {
    #[must_use]
    pub fn defines_package(&self, package: &str) -> bool {
        self.modules.values().any(|m| m.defines_package(package))
    }
}

/// Partition `resolution`'s modules into connected components joined by
/// LOCAL view-dependences (either direction), freeze each component's
/// canonical name, and reject packages split across components.
pub fn partition(resolution: &Resolution) -> Result<Vec<Partitioned>> {
    let mut modules: Vec<ModuleInfo> = Vec::new();
    let mut seen = AHashSet::new();
    for m in resolution.modules() {
        if seen.insert(m.id().clone()) {
            modules.push(m.clone());
        }
    }

    let mut graph = UnGraph::<(), ()>::with_capacity(modules.len(), modules.len());
    let mut node_of: AHashMap<String, NodeIndex> = AHashMap::default();
    for m in &modules {
        let idx = graph.add_node(());
        node_of.insert(m.name().to_string(), idx);
        if let Some(view) = m.primary_view() {
            for alias in view.aliases() {
                node_of.insert(alias.clone(), idx);
            }
        }
    }

    for (i, m) in modules.iter().enumerate() {
        let from = NodeIndex::new(i);
        for dep in m.view_dependences() {
            if !dep.modifiers().is_local() {
                continue;
            }
            if let Some(&to) = node_of.get(dep.query().name()) {
                graph.update_edge(from, to, ());
            }
            // A LOCAL dependence to a module absent from the resolved set
            // is an OPTIONAL dependence that went unsatisfied; ignored
            // per contract.
        }
    }

    let mut visited: AHashSet<NodeIndex> = AHashSet::default();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for node in graph.node_indices() {
        if visited.contains(&node) {
            continue;
        }
        let mut dfs = Dfs::new(&graph, node);
        let mut members = Vec::new();
        while let Some(n) = dfs.next(&graph) {
            visited.insert(n);
            members.push(n.index());
        }
        components.push(members);
    }

    let mut partitions: Vec<Partitioned> = components
        .into_iter()
        .map(|indices| {
            let mut members: BTreeMap<ModuleId, ModuleInfo> = BTreeMap::new();
            for i in indices {
                let m = modules[i].clone();
                members.insert(m.id().clone(), m);
            }
            let mut names: Vec<&str> = members.values().map(ModuleInfo::name).collect();
            names.sort_unstable();
            let name = format!("+{}", names.join("+"));
            Partitioned {
                name,
                modules: members,
            }
        })
        .collect();

    partitions.sort_by(|a, b| a.name.cmp(&b.name));
    check_no_split_packages(&partitions)?;
    Ok(partitions)
}

fn check_no_split_packages(partitions: &[Partitioned]) -> Result<()> {
    let mut owner: BTreeMap<&str, &str> = BTreeMap::new();
    for p in partitions {
        for m in p.modules.values() {
            for package in m.classes_by_package().keys() {
                match owner.get(package.as_str()) {
                    None => {
                        owner.insert(package.as_str(), p.name.as_str());
                    }
                    Some(&other) if other != p.name => {
                        return Err(ContextError::SplitPackage {
                            package: package.clone(),
                            contexts: vec![other.to_string(), p.name.clone()],
                        });
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_core::{ModuleIdQuery, VersionConstraint};
    use modlink_model::{Modifier, Modifiers, ModuleInfoBuilder, ViewDependence};
    use modlink_resolver::Resolver;
    use semver::Version;

    fn v(major: u64) -> Version {
        Version::new(major, 0, 0)
    }

    #[test]
    fn local_dependence_merges_into_one_component() {
        let mut cat = modlink_catalog::MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("a", v(1)))
                .requires(ViewDependence::new(
                    Modifier::Local,
                    ModuleIdQuery::unconstrained("b"),
                ))
                .build(),
        );
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("b", v(1)))
                .requires(ViewDependence::new(
                    Modifier::Local,
                    ModuleIdQuery::unconstrained("c"),
                ))
                .build(),
        );
        cat.insert(ModuleInfoBuilder::new(ModuleId::versioned("c", v(1))).build());

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("a")])
            .unwrap();
        let partitions = partition(&resolution).unwrap();

        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].name, "+a+b+c");
    }

    #[test]
    fn no_local_dependence_keeps_modules_separate() {
        let mut cat = modlink_catalog::MapCatalog::new();
        cat.insert(
            ModuleInfoBuilder::new(ModuleId::versioned("app", v(1)))
                .requires(ViewDependence::new(
                    Modifiers::NONE,
                    ModuleIdQuery::constrained("base", VersionConstraint::new(">=1")),
                ))
                .build(),
        );
        cat.insert(ModuleInfoBuilder::new(ModuleId::versioned("base", v(1))).build());

        let resolution = Resolver::new(&cat)
            .resolve(&[ModuleIdQuery::unconstrained("app")])
            .unwrap();
        let partitions = partition(&resolution).unwrap();

        assert_eq!(partitions.len(), 2);
    }
}
