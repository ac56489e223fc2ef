//! The [`RemoteRepository`] interface consumed by the resolver's fallback
//! phase (`spec.md` §4.1 step 4).

use modlink_core::ModuleId;
use url::Url;

/// Size and provenance metadata for a module a resolver may need to
/// download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleMetaData {
    /// Bytes to transfer.
    pub download_size: u64,
    /// Bytes occupied once installed (module-file content, uncompressed).
    pub install_size: u64,
}

/// A source of modules not already present in a local catalog.
///
/// Network fetching itself is out of scope (`spec.md` §1); this trait is
/// the seam the resolver calls through, left for an embedder to implement
/// against whatever transport they use.
pub trait RemoteRepository {
    /// Module ids this repository can offer under `name`.
    fn find_module_ids(&self, name: &str) -> Vec<ModuleId>;

    /// Size metadata for `id`, without downloading it.
    fn fetch_meta_data(&self, id: &ModuleId) -> std::io::Result<ModuleMetaData>;

    /// Open a byte stream for `id`'s module-file content.
    fn fetch(&self, id: &ModuleId) -> std::io::Result<Box<dyn std::io::Read>>;

    /// Where this repository is reachable.
    fn location(&self) -> &Url;
}
