//! [`View`]: a named facet of a module exposing its own id, aliases,
//! exported services, and permits.

use std::collections::{BTreeMap, BTreeSet};

/// A facet of a module.
///
/// Most modules expose exactly one view (their primary name); additional
/// views let a module present itself under aliases with independently
/// scoped exported services and a `permits` whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    name: String,
    aliases: BTreeSet<String>,
    exported_services: BTreeMap<String, BTreeSet<String>>,
    permits: BTreeSet<String>,
}

impl View {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: BTreeSet::new(),
            exported_services: BTreeMap::new(),
            permits: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    #[must_use]
    pub fn exported_services(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.exported_services
    }

    #[must_use]
    pub fn permits(&self) -> &BTreeSet<String> {
        &self.permits
    }

    /// True iff `requester` may depend on this view.
    ///
    /// Per `spec.md` §4.1 "Permits": an empty permits set means
    /// unrestricted unless the dependence is LOCAL, in which case the
    /// caller must additionally check locality; this method only answers
    /// the permits half of that check.
    #[must_use]
    pub fn permits_requester(&self, requester: &str) -> bool {
        self.permits.is_empty() || self.permits.contains(requester)
    }

    pub fn add_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn add_exported_service(
        &mut self,
        interface: impl Into<String>,
        impl_class: impl Into<String>,
    ) -> &mut Self {
        self.exported_services
            .entry(interface.into())
            .or_default()
            .insert(impl_class.into());
        self
    }

    pub fn add_permit(&mut self, module_name: impl Into<String>) -> &mut Self {
        self.permits.insert(module_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_permits_allows_any_requester() {
        let v = View::new("base");
        assert!(v.permits_requester("anyone"));
    }

    #[test]
    fn nonempty_permits_restricts_requester() {
        let mut v = View::new("lib");
        v.add_permit("friend");
        assert!(v.permits_requester("friend"));
        assert!(!v.permits_requester("stranger"));
    }
}
