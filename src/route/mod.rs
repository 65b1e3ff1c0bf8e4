//! Message routing for upload destinations
//!
//! A destination is either configured once for the whole run, or computed
//! per file by a routing program evaluated against a [`RoutingEnv`].

pub mod decode;
pub mod policy;
pub mod program;
pub mod types;

pub use policy::RoutingPolicy;
pub use program::RouteProgram;
pub use types::{Destination, FileSpec, RouteResult, RoutingEnv};
