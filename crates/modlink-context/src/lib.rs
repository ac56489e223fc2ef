//! Phases 2-4 of the linking pipeline: partitioning resolved modules into
//! contexts and assigning class/package visibility within and across them
//! (`spec.md` §4.2-§4.4).

mod context;
mod error;
mod linker;
mod partition;
mod path_context;
mod path_linker;

pub use context::Context;
pub use error::{ContextError, Result};
pub use linker::link_installed;
pub use partition::{partition, Partitioned};
pub use path_context::PathContext;
pub use path_linker::link_path_contexts;
