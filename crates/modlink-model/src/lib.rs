//! Module descriptors: views, view-dependences, service-dependences, and
//! the builder that assembles them into a frozen [`ModuleInfo`].

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod dependence;
mod modifiers;
mod module_info;
mod view;

pub use dependence::{ServiceDependence, ViewDependence};
pub use modifiers::{Modifier, Modifiers};
pub use module_info::{ModuleInfo, ModuleInfoBuilder};
pub use view::View;
