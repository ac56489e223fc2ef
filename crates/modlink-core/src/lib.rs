//! Module identity for the configurator: names, versions, and version
//! queries.
//!
//! This crate provides the foundational identity types used throughout the
//! configurator and module-file codec:
//! - [`ModuleId`]: a module name with an optional version
//! - [`ModuleIdQuery`]: a name plus an optional version constraint, matched
//!   against a [`ModuleId`]
//! - [`VersionConstraint`]: the predicate half of a query
//! - Error types shared by every identity-parsing operation

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
mod id;
mod query;
mod version;

pub use error::{Error, Result};
pub use id::ModuleId;
pub use query::ModuleIdQuery;
pub use version::VersionConstraint;

// Re-export so downstream crates need not add `semver` themselves.
pub use semver::Version;
