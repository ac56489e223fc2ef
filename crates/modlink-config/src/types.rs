//! [`Configuration`] and the records composing it.

use modlink_core::ModuleId;
use std::collections::BTreeMap;

/// A module's entry within a persisted context: its id, and the library
/// path it was installed from (empty for contexts assembled purely from
/// a compile-time catalog with no installed origin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub id: ModuleId,
    pub library_path: Option<String>,
}

/// One context's persisted form: canonical name, member modules, and the
/// two routing maps the class loader consults at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRecord {
    canonical_name: String,
    modules: Vec<ModuleEntry>,
    /// class name -> defining module id, ascending by class name.
    local_classes: Vec<(String, ModuleId)>,
    /// package name -> supplying context's canonical name, ascending by
    /// package name.
    remote_packages: Vec<(String, String)>,
}

impl ContextRecord {
    #[must_use]
    pub fn new(
        canonical_name: impl Into<String>,
        modules: Vec<ModuleEntry>,
        mut local_classes: Vec<(String, ModuleId)>,
        mut remote_packages: Vec<(String, String)>,
    ) -> Self {
        local_classes.sort_by(|a, b| a.0.cmp(&b.0));
        remote_packages.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            canonical_name: canonical_name.into(),
            modules,
            local_classes,
            remote_packages,
        }
    }

    #[must_use]
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    #[must_use]
    pub fn local_classes(&self) -> &[(String, ModuleId)] {
        &self.local_classes
    }

    #[must_use]
    pub fn remote_packages(&self) -> &[(String, String)] {
        &self.remote_packages
    }
}

/// The immutable, fully-linked output of the four configurator phases for
/// one or more roots (`spec.md` §3, §GLOSSARY "Configuration").
///
/// Equality is deep over root ids, the context set, and both indexes
/// (`spec.md` §3: "Equality is deep over these four").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    root_ids: Vec<ModuleId>,
    /// Contexts in their canonical-name order (`spec.md` §5 "Ordering":
    /// "within a configuration, context iteration order is the set's
    /// natural order").
    contexts: Vec<ContextRecord>,
    name_to_context: BTreeMap<String, usize>,
    module_to_context: BTreeMap<String, usize>,
}

impl Configuration {
    /// Build from root ids and an unordered set of contexts; contexts are
    /// sorted by canonical name and the two indexes derived from them.
    #[must_use]
    pub fn new(root_ids: Vec<ModuleId>, mut contexts: Vec<ContextRecord>) -> Self {
        contexts.sort_by(|a, b| a.canonical_name().cmp(b.canonical_name()));

        let mut name_to_context = BTreeMap::new();
        let mut module_to_context = BTreeMap::new();
        for (idx, ctx) in contexts.iter().enumerate() {
            name_to_context.insert(ctx.canonical_name().to_string(), idx);
            for m in ctx.modules() {
                module_to_context.insert(m.id.name().to_string(), idx);
            }
        }

        Self {
            root_ids,
            contexts,
            name_to_context,
            module_to_context,
        }
    }

    #[must_use]
    pub fn root_ids(&self) -> &[ModuleId] {
        &self.root_ids
    }

    #[must_use]
    pub fn contexts(&self) -> &[ContextRecord] {
        &self.contexts
    }

    #[must_use]
    pub fn context_by_name(&self, canonical_name: &str) -> Option<&ContextRecord> {
        self.name_to_context
            .get(canonical_name)
            .map(|&idx| &self.contexts[idx])
    }

    #[must_use]
    pub fn context_for_module(&self, module_name: &str) -> Option<&ContextRecord> {
        self.module_to_context
            .get(module_name)
            .map(|&idx| &self.contexts[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(name: &str, module: &str) -> ContextRecord {
        ContextRecord::new(
            name,
            vec![ModuleEntry {
                id: ModuleId::new(module),
                library_path: None,
            }],
            vec![],
            vec![],
        )
    }

    #[test]
    fn indexes_are_derived_from_contexts() {
        let cfg = Configuration::new(vec![ModuleId::new("app")], vec![ctx("+app", "app")]);
        assert!(cfg.context_by_name("+app").is_some());
        assert!(cfg.context_for_module("app").is_some());
        assert!(cfg.context_for_module("missing").is_none());
    }

    #[test]
    fn contexts_sort_by_canonical_name() {
        let cfg = Configuration::new(
            vec![],
            vec![ctx("+b", "b"), ctx("+a", "a")],
        );
        let names: Vec<_> = cfg.contexts().iter().map(ContextRecord::canonical_name).collect();
        assert_eq!(names, vec!["+a", "+b"]);
    }

    #[test]
    fn equality_is_deep() {
        let a = Configuration::new(vec![ModuleId::new("app")], vec![ctx("+app", "app")]);
        let b = Configuration::new(vec![ModuleId::new("app")], vec![ctx("+app", "app")]);
        assert_eq!(a, b);
    }
}
