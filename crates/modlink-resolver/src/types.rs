//! [`Resolution`]: the output of phase 1.

use ahash::{AHashMap, AHashSet};
use modlink_core::ModuleId;
use modlink_model::ModuleInfo;
use std::rc::Rc;
use url::Url;

/// The chosen module per name, origin tracking for remotely-fetched
/// modules, the set of modules that must be downloaded, and cumulative
/// byte totals (`spec.md` §4.1 "Contract").
#[derive(Debug, Default)]
pub struct Resolution {
    chosen: AHashMap<String, Rc<ModuleInfo>>,
    origins: AHashMap<String, Url>,
    needed: AHashSet<ModuleId>,
    download_size: u64,
    install_size: u64,
}

impl Resolution {
    pub(crate) fn new(
        chosen: AHashMap<String, Rc<ModuleInfo>>,
        origins: AHashMap<String, Url>,
        needed: AHashSet<ModuleId>,
        download_size: u64,
        install_size: u64,
    ) -> Self {
        Self {
            chosen,
            origins,
            needed,
            download_size,
            install_size,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleInfo> {
        self.chosen.get(name).map(Rc::as_ref)
    }

    #[must_use]
    pub fn modules(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.chosen.values().map(Rc::as_ref)
    }

    #[must_use]
    pub fn origin(&self, name: &str) -> Option<&Url> {
        self.origins.get(name)
    }

    #[must_use]
    pub fn needed(&self) -> &AHashSet<ModuleId> {
        &self.needed
    }

    #[must_use]
    pub fn download_size(&self) -> u64 {
        self.download_size
    }

    #[must_use]
    pub fn install_size(&self) -> u64 {
        self.install_size
    }
}
