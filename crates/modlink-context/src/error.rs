//! Context-construction and linking error kinds (`spec.md` §7).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A class is defined by more than one module in a context with no
    /// unique dominant definition.
    #[error("'{class}' is defined by multiple modules with no dominant definition: {candidates:?}")]
    AmbiguousClass {
        class: String,
        candidates: Vec<String>,
    },

    /// A package's defining modules span more than one context.
    #[error("package '{package}' is split across contexts: {contexts:?}")]
    SplitPackage {
        package: String,
        contexts: Vec<String>,
    },

    /// An imported package does not resolve to exactly one supplying context.
    #[error("package '{package}' does not resolve to exactly one supplying context: {candidates:?}")]
    AmbiguousPackage {
        package: String,
        candidates: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, ContextError>;
