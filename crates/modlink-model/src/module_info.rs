//! [`ModuleInfo`]: a module's parsed descriptor.

use crate::dependence::{ServiceDependence, ViewDependence};
use crate::view::View;
use modlink_core::ModuleId;
use std::collections::{BTreeMap, BTreeSet};

/// A module's descriptor, as read from a catalog or a module-file's
/// MODULE_INFO section.
///
/// `classes_by_package`, `imported_packages`, and `dominates` describe the
/// module's class-level content for the context linker (`spec.md` §4.3):
/// which packages it defines, which packages it needs resolved from
/// elsewhere, and which other modules' definitions its own views are
/// declared to shadow when more than one module defines the same class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    id: ModuleId,
    views: Vec<View>,
    view_dependences: Vec<ViewDependence>,
    service_dependences: Vec<ServiceDependence>,
    classes_by_package: BTreeMap<String, BTreeSet<String>>,
    imported_packages: BTreeSet<String>,
    dominates: BTreeSet<String>,
}

impl ModuleInfo {
    #[must_use]
    pub fn builder(id: ModuleId) -> ModuleInfoBuilder {
        ModuleInfoBuilder::new(id)
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.id.name()
    }

    #[must_use]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    #[must_use]
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name() == name)
    }

    /// The view matching the module's own primary name, if declared.
    #[must_use]
    pub fn primary_view(&self) -> Option<&View> {
        self.view(self.name())
    }

    /// The view a query by `name` resolves to: either a view named `name`
    /// directly, or one that lists `name` as an alias.
    #[must_use]
    pub fn view_for(&self, name: &str) -> Option<&View> {
        self.views
            .iter()
            .find(|v| v.name() == name || v.aliases().contains(name))
    }

    #[must_use]
    pub fn view_dependences(&self) -> &[ViewDependence] {
        &self.view_dependences
    }

    #[must_use]
    pub fn service_dependences(&self) -> &[ServiceDependence] {
        &self.service_dependences
    }

    /// True iff some view of this module exports an implementation of
    /// `interface`.
    #[must_use]
    pub fn provides(&self, interface: &str) -> bool {
        self.views
            .iter()
            .any(|v| v.exported_services().contains_key(interface))
    }

    /// All (view, impl-class) pairs exporting `interface`.
    pub fn providers_of<'a>(&'a self, interface: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.views.iter().flat_map(move |v| {
            v.exported_services()
                .get(interface)
                .into_iter()
                .flat_map(|impls| impls.iter().map(String::as_str))
        })
    }

    #[must_use]
    pub fn classes_by_package(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.classes_by_package
    }

    /// True iff this module defines any class in `package`.
    #[must_use]
    pub fn defines_package(&self, package: &str) -> bool {
        self.classes_by_package.contains_key(package)
    }

    #[must_use]
    pub fn imported_packages(&self) -> &BTreeSet<String> {
        &self.imported_packages
    }

    /// Other module names this module's views claim dominance over when a
    /// class is multiply defined within a context.
    #[must_use]
    pub fn dominates(&self, other: &str) -> bool {
        self.dominates.contains(other)
    }
}

/// Mutable builder for a [`ModuleInfo`], frozen by [`ModuleInfoBuilder::build`].
#[derive(Debug, Clone)]
pub struct ModuleInfoBuilder {
    id: ModuleId,
    views: Vec<View>,
    view_dependences: Vec<ViewDependence>,
    service_dependences: Vec<ServiceDependence>,
    classes_by_package: BTreeMap<String, BTreeSet<String>>,
    imported_packages: BTreeSet<String>,
    dominates: BTreeSet<String>,
}

impl ModuleInfoBuilder {
    #[must_use]
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            views: Vec::new(),
            view_dependences: Vec::new(),
            service_dependences: Vec::new(),
            classes_by_package: BTreeMap::new(),
            imported_packages: BTreeSet::new(),
            dominates: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    #[must_use]
    pub fn requires(mut self, dependence: ViewDependence) -> Self {
        self.view_dependences.push(dependence);
        self
    }

    #[must_use]
    pub fn uses(mut self, dependence: ServiceDependence) -> Self {
        self.service_dependences.push(dependence);
        self
    }

    #[must_use]
    pub fn defines_class(mut self, package: impl Into<String>, class_name: impl Into<String>) -> Self {
        self.classes_by_package
            .entry(package.into())
            .or_default()
            .insert(class_name.into());
        self
    }

    #[must_use]
    pub fn imports_package(mut self, package: impl Into<String>) -> Self {
        self.imported_packages.insert(package.into());
        self
    }

    #[must_use]
    pub fn dominates(mut self, module_name: impl Into<String>) -> Self {
        self.dominates.insert(module_name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ModuleInfo {
        let mut views = self.views;
        if views.is_empty() {
            views.push(View::new(self.id.name()));
        }
        ModuleInfo {
            id: self.id,
            views,
            view_dependences: self.view_dependences,
            service_dependences: self.service_dependences,
            classes_by_package: self.classes_by_package,
            imported_packages: self.imported_packages,
            dominates: self.dominates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::Modifier;
    use modlink_core::ModuleIdQuery;
    use semver::Version;

    #[test]
    fn builder_defaults_a_primary_view() {
        let info = ModuleInfo::builder(ModuleId::versioned("app", Version::new(1, 0, 0))).build();
        assert_eq!(info.views().len(), 1);
        assert_eq!(info.primary_view().unwrap().name(), "app");
    }

    #[test]
    fn providers_of_collects_across_views() {
        let mut v1 = View::new("a");
        v1.add_exported_service("Svc", "a.Impl1");
        let mut v2 = View::new("b");
        v2.add_exported_service("Svc", "a.Impl2");

        let info = ModuleInfo::builder(ModuleId::new("a"))
            .view(v1)
            .view(v2)
            .build();

        let mut impls: Vec<_> = info.providers_of("Svc").collect();
        impls.sort_unstable();
        assert_eq!(impls, vec!["a.Impl1", "a.Impl2"]);
        assert!(info.provides("Svc"));
        assert!(!info.provides("Other"));
    }

    #[test]
    fn requires_records_modifiers_and_query() {
        let info = ModuleInfo::builder(ModuleId::new("app"))
            .requires(ViewDependence::new(
                Modifier::Local,
                ModuleIdQuery::unconstrained("base"),
            ))
            .build();
        assert_eq!(info.view_dependences().len(), 1);
        assert!(info.view_dependences()[0].modifiers().is_local());
    }
}
