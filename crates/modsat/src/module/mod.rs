//! Module declarations: ids, views, aliases and dependences

mod builder;
mod dependence;
mod info;
mod view;

pub use builder::{module, ModuleInfoBuilder};
pub use dependence::{Modifier, ServiceDependence, ViewDependence};
pub use info::ModuleInfo;
pub use view::{ModuleView, ModuleViewRef};
