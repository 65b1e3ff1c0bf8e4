//! Static and expression-based routing

use super::decode::decode_destination;
use super::program::RouteProgram;
use super::types::{Destination, FileSpec, RouteResult, RoutingEnv};
use crate::error::{Result, UploadError};
use serde_json::Value;

/// How destinations are chosen for a run
///
/// The mode is fixed when the iterator is built and applies to every file.
pub enum RoutingPolicy {
    /// One peer and thread for all files
    Static { chat: String, thread: i64 },
    /// A program evaluated once per file
    Expression(Box<dyn RouteProgram + Send>),
}

impl RoutingPolicy {
    /// Pick the routing mode
    ///
    /// A non-empty `chat` always wins. With an empty `chat` the program is
    /// used when present; otherwise every file goes to the caller's own
    /// identity.
    pub fn select(
        chat: &str,
        thread: i64,
        program: Option<Box<dyn RouteProgram + Send>>,
    ) -> Self {
        match program {
            Some(program) if chat.is_empty() => RoutingPolicy::Expression(program),
            _ => RoutingPolicy::Static {
                chat: chat.to_string(),
                thread,
            },
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, RoutingPolicy::Static { .. })
    }

    /// Compute the destination for one file
    ///
    /// # Errors
    ///
    /// * [`UploadError::RoutingEvaluation`] if the program fails
    /// * [`UploadError::RoutingResultType`] if it returns neither a string nor a map
    /// * [`UploadError::DestinationDecode`] if a map cannot be coerced
    pub fn destination(&self, file: &FileSpec) -> Result<Destination> {
        match self {
            RoutingPolicy::Static { chat, thread } => Ok(Destination::new(chat.clone(), *thread)),
            RoutingPolicy::Expression(program) => {
                let env = RoutingEnv::for_file(Some(file));
                let value = program
                    .evaluate(&env)
                    .map_err(UploadError::routing_evaluation)?;
                route_result(value)
            }
        }
    }
}

impl std::fmt::Debug for RoutingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingPolicy::Static { chat, thread } => f
                .debug_struct("Static")
                .field("chat", chat)
                .field("thread", thread)
                .finish(),
            RoutingPolicy::Expression(_) => f.write_str("Expression(..)"),
        }
    }
}

fn route_result(value: Value) -> Result<Destination> {
    match RouteResult::from(value) {
        RouteResult::Peer(peer) => Ok(Destination::new(peer, 0)),
        RouteResult::Destination(map) => {
            decode_destination(&map).map_err(|source| UploadError::DestinationDecode {
                raw: Value::Object(map),
                source,
            })
        }
        RouteResult::Unrecognized { type_name, .. } => {
            Err(UploadError::RoutingResultType { type_name })
        }
    }
}
