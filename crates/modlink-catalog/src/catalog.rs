//! The [`Catalog`] interface consumed by the resolver.

use crate::error::Result;
use modlink_core::ModuleId;
use modlink_model::ModuleInfo;

/// A lookup source mapping names to available module descriptors.
///
/// Catalogs are read-only from the resolver's perspective (`spec.md` §3,
/// "Lifecycle"). A catalog may delegate to a `parent` catalog, forming a
/// chain the resolver does not need to know about explicitly.
pub trait Catalog {
    /// Every module id this catalog (not its parent) knows about.
    fn list_module_ids(&self) -> Vec<ModuleId>;

    /// Module ids by name, in the catalog's own enumeration order — this
    /// order is part of the resolver's determinism contract (`spec.md`
    /// §4.1 "Determinism": "ties resolved by the catalog's enumeration
    /// order").
    fn find_module_ids(&self, name: &str) -> Vec<ModuleId>;

    /// The descriptor for `id` if this catalog (not its parent) has it.
    fn read_local_module_info(&self, id: &ModuleId) -> Result<Option<ModuleInfo>>;

    /// The descriptor for `id`, checking the parent chain.
    fn read_module_info(&self, id: &ModuleId) -> Result<ModuleInfo> {
        if let Some(info) = self.read_local_module_info(id)? {
            return Ok(info);
        }
        if let Some(parent) = self.parent() {
            return parent.read_module_info(id);
        }
        Err(crate::error::CatalogError::NotFound(id.to_string()))
    }

    /// The catalog this one falls back to, if any.
    fn parent(&self) -> Option<&dyn Catalog>;

    /// Ids of every module this catalog can enumerate, used by the
    /// resolver's service-provider discovery phase to find modules that
    /// declare exported services without the resolver needing a dedicated
    /// service index.
    fn list_declaring_module_ids(&self) -> Vec<ModuleId> {
        self.list_module_ids()
    }
}
