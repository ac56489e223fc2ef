//! Error types for module identity parsing.

use thiserror::Error;

/// Errors produced while parsing module identities and version queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A module name failed the identity grammar (empty, or containing `@`).
    #[error("invalid module name '{0}'")]
    InvalidName(String),

    /// A raw string could not be parsed as a semantic version.
    #[error("invalid version '{version}' for module '{name}': {reason}")]
    InvalidVersion {
        /// Module name the version was attached to.
        name: String,
        /// The raw version text that failed to parse.
        version: String,
        /// Why `semver` rejected it.
        reason: String,
    },

    /// A version constraint string could not be normalized into a range.
    #[error("invalid version constraint '{0}'")]
    InvalidConstraint(String),
}

/// Result type for module identity operations.
pub type Result<T> = std::result::Result<T, Error>;
