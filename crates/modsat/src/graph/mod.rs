//! Module dependency graph traversal and its reified snapshot

mod listener;
mod reified;
mod traverser;

pub use listener::ModuleGraphListener;
pub use reified::ReifiedDependencies;
pub use traverser::ModuleGraphTraverser;
