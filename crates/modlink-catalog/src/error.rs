//! Errors surfaced by [`crate::Catalog`] and [`crate::Library`] readers.

use thiserror::Error;

/// Failures reading module descriptors or module content from a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog has no module by this id.
    #[error("module '{0}' not found in catalog")]
    NotFound(String),

    /// Underlying I/O while reading module-info or module content.
    #[error("catalog I/O error reading '{path}': {source}")]
    Io {
        /// What was being read.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The module-info bytes did not parse.
    #[error("malformed module-info for '{0}': {1}")]
    MalformedModuleInfo(String, String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
