//! Target resolution and marker dispatch

pub mod dispatcher;
pub mod resolver;

pub use dispatcher::{DispatchSummary, Dispatcher};
pub use resolver::{Notice, PathResolver, ResolveError, ResolvedFileSet};
