//! Routing program abstraction
//!
//! The expression language itself lives outside this crate. A compiled
//! program only needs to turn a [`RoutingEnv`] into a dynamically typed value.

use super::types::RoutingEnv;
use crate::error::BoxError;
use serde_json::Value;

/// A compiled routing program
pub trait RouteProgram {
    /// Evaluate the program for one file
    fn evaluate(&self, env: &RoutingEnv) -> Result<Value, BoxError>;
}

impl<F> RouteProgram for F
where
    F: Fn(&RoutingEnv) -> Result<Value, BoxError>,
{
    fn evaluate(&self, env: &RoutingEnv) -> Result<Value, BoxError> {
        self(env)
    }
}
