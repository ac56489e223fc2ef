//! [`PathContext`]: the compile-time variant of [`crate::Context`]
//! (`spec.md` §3 "PathContext", §9 "Two-file variants").

use modlink_core::ModuleId;
use modlink_model::ModuleInfo;
use std::collections::{BTreeMap, BTreeSet};

/// A context as seen by a compile-time linker: an ordered local search
/// path instead of a class-name map, and a flat set of remote context ids
/// instead of a per-package map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    name: String,
    modules: BTreeMap<ModuleId, ModuleInfo>,
    search_path: Vec<ModuleId>,
    remote_contexts: BTreeSet<String>,
}

impl PathContext {
    pub(crate) fn new(
        name: String,
        modules: BTreeMap<ModuleId, ModuleInfo>,
        search_path: Vec<ModuleId>,
        remote_contexts: BTreeSet<String>,
    ) -> Self {
        Self {
            name,
            modules,
            search_path,
            remote_contexts,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn modules(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.values()
    }

    /// The dominator-ordered local search path (`spec.md` §4.4).
    #[must_use]
    pub fn search_path(&self) -> &[ModuleId] {
        &self.search_path
    }

    #[must_use]
    pub fn remote_contexts(&self) -> &BTreeSet<String> {
        &self.remote_contexts
    }
}
