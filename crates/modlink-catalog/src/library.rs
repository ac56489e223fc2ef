//! The [`Library`] interface: a [`Catalog`] that also holds installed
//! module content and persisted configurations.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::remote::RemoteRepository;
use modlink_config::Configuration;
use modlink_core::ModuleId;

/// A catalog that also serves installed module content and persisted
/// configurations (`spec.md` §6 "Library").
pub trait Library: Catalog {
    /// Remote repositories consulted when a query has no local candidate.
    /// Index 0 is "the first repository" (`spec.md` §1 non-goals: no
    /// selection policy beyond that).
    fn repository_list(&self) -> &[Box<dyn RemoteRepository>];

    /// Bytes of the named class, if `id` is installed locally and defines it.
    fn find_local_class(&self, id: &ModuleId, class_name: &str) -> Result<Option<Vec<u8>>>;

    /// Bytes of the named resource, if `id` is installed locally and carries it.
    fn find_local_resource(&self, id: &ModuleId, resource_name: &str) -> Result<Option<Vec<u8>>>;

    /// Path to the named native library, if `id` is installed locally and carries it.
    fn find_local_native_library(
        &self,
        id: &ModuleId,
        lib_name: &str,
    ) -> Result<Option<std::path::PathBuf>>;

    /// The persisted configuration for `root_id`, if one has been installed.
    fn read_configuration(&self, root_id: &ModuleId) -> Result<Option<Configuration>>;
}
