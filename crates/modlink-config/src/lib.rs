//! The durable `Configuration` value and its binary store format
//! (`spec.md` §3 "Configuration", §6 "Configuration store format").
//!
//! A `Configuration` is the immutable output of the four configurator
//! phases. This crate owns its shape and the crash-safe atomic write path
//! that persists it to a module-scoped `config` file; it does not compute
//! configurations itself (`modlink-context`/`modlink-engine` do that).

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod atomic;
mod codec;
mod error;
mod hash;
mod store;
mod types;

pub use error::{ConfigError, Result};
pub use store::{load, save};
pub use types::{Configuration, ContextRecord, ModuleEntry};
