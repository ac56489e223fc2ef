//! [`Context`]: the installed, frozen form of a partitioned module group.

use modlink_core::ModuleId;
use modlink_model::ModuleInfo;
use std::collections::{BTreeMap, BTreeSet};

/// A group of modules sharing a class loader at run time (`spec.md` §3).
///
/// Immutable once returned from [`crate::link_installed`]; there is no
/// mutator, matching the "frozen" lifecycle `spec.md` §3 describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    name: String,
    modules: BTreeMap<ModuleId, ModuleInfo>,
    module_for_local_class: BTreeMap<String, ModuleId>,
    context_for_remote_package: BTreeMap<String, String>,
    library_for_module: BTreeMap<ModuleId, Option<String>>,
    services: BTreeMap<String, Vec<String>>,
    suppliers: BTreeSet<String>,
}

impl Context {
    pub(crate) fn new(
        name: String,
        modules: BTreeMap<ModuleId, ModuleInfo>,
        library_for_module: BTreeMap<ModuleId, Option<String>>,
    ) -> Self {
        Self {
            name,
            modules,
            module_for_local_class: BTreeMap::new(),
            context_for_remote_package: BTreeMap::new(),
            library_for_module,
            services: BTreeMap::new(),
            suppliers: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members, ascending by id (`spec.md` §5 "Ordering").
    #[must_use]
    pub fn modules(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.values()
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&ModuleInfo> {
        self.modules.get(id)
    }

    #[must_use]
    pub fn module_for_local_class(&self, class_name: &str) -> Option<&ModuleId> {
        self.module_for_local_class.get(class_name)
    }

    #[must_use]
    pub fn context_for_remote_package(&self, package: &str) -> Option<&str> {
        self.context_for_remote_package.get(package).map(String::as_str)
    }

    #[must_use]
    pub fn library_for_module(&self, id: &ModuleId) -> Option<&str> {
        self.library_for_module.get(id).and_then(Option::as_deref)
    }

    /// All local-class routes, for persisting a context to a
    /// `Configuration`.
    #[must_use]
    pub fn local_classes(&self) -> impl Iterator<Item = (&str, &ModuleId)> {
        self.module_for_local_class
            .iter()
            .map(|(class_name, id)| (class_name.as_str(), id))
    }

    /// All remote-package routes, for persisting a context to a
    /// `Configuration`.
    #[must_use]
    pub fn remote_packages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.context_for_remote_package
            .iter()
            .map(|(package, context_name)| (package.as_str(), context_name.as_str()))
    }

    #[must_use]
    pub fn services(&self) -> &BTreeMap<String, Vec<String>> {
        &self.services
    }

    #[must_use]
    pub fn suppliers(&self) -> &BTreeSet<String> {
        &self.suppliers
    }

    pub(crate) fn set_local_class(&mut self, class_name: String, module: ModuleId) {
        self.module_for_local_class.insert(class_name, module);
    }

    pub(crate) fn set_remote_package(&mut self, package: String, context_name: String) {
        self.suppliers.insert(context_name.clone());
        self.context_for_remote_package.insert(package, context_name);
    }

    pub(crate) fn push_service_impl(&mut self, interface: String, impl_class: String) {
        let impls = self.services.entry(interface).or_default();
        if !impls.contains(&impl_class) {
            impls.push(impl_class);
        }
    }
}
