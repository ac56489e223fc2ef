//! [`MapCatalog`]: an in-memory [`Catalog`]/[`Library`] over already-loaded
//! [`ModuleInfo`] values, for tests and small embedders with no real
//! repository behind them.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::library::Library;
use crate::remote::RemoteRepository;
use ahash::AHashMap;
use modlink_config::Configuration;
use modlink_core::ModuleId;
use modlink_model::ModuleInfo;

/// An in-memory catalog keyed by module name, preserving insertion order
/// per name so enumeration order (part of the resolver's determinism
/// contract) is exactly the order modules were added.
#[derive(Default)]
pub struct MapCatalog {
    by_name: AHashMap<String, Vec<ModuleInfo>>,
    configurations: AHashMap<String, Configuration>,
    parent: Option<Box<dyn Catalog>>,
}

impl std::fmt::Debug for MapCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCatalog")
            .field("by_name", &self.by_name)
            .field("configurations", &self.configurations)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl MapCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parent(parent: Box<dyn Catalog>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Insert a module, appended after any existing modules of the same
    /// name (insertion order is the enumeration order `find_module_ids`
    /// returns).
    pub fn insert(&mut self, info: ModuleInfo) -> &mut Self {
        self.by_name
            .entry(info.name().to_string())
            .or_default()
            .push(info);
        self
    }

    pub fn insert_configuration(&mut self, root_name: impl Into<String>, cfg: Configuration) {
        self.configurations.insert(root_name.into(), cfg);
    }
}

impl Catalog for MapCatalog {
    fn list_module_ids(&self) -> Vec<ModuleId> {
        self.by_name
            .values()
            .flatten()
            .map(|m| m.id().clone())
            .collect()
    }

    fn find_module_ids(&self, name: &str) -> Vec<ModuleId> {
        self.by_name
            .get(name)
            .map(|v| v.iter().map(|m| m.id().clone()).collect())
            .unwrap_or_default()
    }

    fn read_local_module_info(&self, id: &ModuleId) -> Result<Option<ModuleInfo>> {
        Ok(self
            .by_name
            .get(id.name())
            .and_then(|v| v.iter().find(|m| m.id() == id))
            .cloned())
    }

    fn parent(&self) -> Option<&dyn Catalog> {
        self.parent.as_deref()
    }
}

impl Library for MapCatalog {
    fn repository_list(&self) -> &[Box<dyn RemoteRepository>] {
        &[]
    }

    fn find_local_class(&self, _id: &ModuleId, _class_name: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn find_local_resource(&self, _id: &ModuleId, _resource_name: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn find_local_native_library(
        &self,
        _id: &ModuleId,
        _lib_name: &str,
    ) -> Result<Option<std::path::PathBuf>> {
        Ok(None)
    }

    fn read_configuration(&self, root_id: &ModuleId) -> Result<Option<Configuration>> {
        Ok(self.configurations.get(root_id.name()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_core::Version;

    #[test]
    fn find_preserves_insertion_order() {
        let mut cat = MapCatalog::new();
        cat.insert(ModuleInfo::builder(ModuleId::versioned("m", Version::new(1, 0, 0))).build());
        cat.insert(ModuleInfo::builder(ModuleId::versioned("m", Version::new(2, 0, 0))).build());

        let ids = cat.find_module_ids("m");
        assert_eq!(ids[0].version(), Some(&Version::new(1, 0, 0)));
        assert_eq!(ids[1].version(), Some(&Version::new(2, 0, 0)));
    }

    #[test]
    fn falls_back_to_parent() {
        let mut parent = MapCatalog::new();
        parent.insert(ModuleInfo::builder(ModuleId::new("base")).build());

        let child = MapCatalog::with_parent(Box::new(parent));
        assert!(child
            .read_module_info(&ModuleId::new("base"))
            .unwrap()
            .name()
            == "base");
    }
}
