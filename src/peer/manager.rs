//! Peer manager abstraction and destination resolution

use super::types::Peer;
use crate::error::{Result, UploadError};
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a [`PeerManager`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    /// No peer matches the query
    #[error("peer not found: {query}")]
    NotFound { query: String },

    /// The identifier is not in any supported form
    #[error("invalid peer identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// The backend failed while resolving
    #[error("peer backend error: {message}")]
    Backend { message: String },
}

impl PeerError {
    /// Create a new backend error
    pub fn backend(message: impl Into<String>) -> Self {
        PeerError::Backend {
            message: message.into(),
        }
    }
}

/// Resolves identifiers into peers
///
/// Implementations own the identifier grammar; [`PeerQuery`](super::PeerQuery)
/// is one parser they may use. Implementations may block on network I/O.
/// Calls are made from the thread that drives the upload iterator.
pub trait PeerManager {
    /// Resolve the caller's own identity
    fn resolve_self(&self) -> std::result::Result<Peer, PeerError>;

    /// Resolve a non-empty identifier such as a username, ID or link
    fn resolve(&self, identifier: &str) -> std::result::Result<Peer, PeerError>;
}

impl<T: PeerManager + ?Sized> PeerManager for &T {
    fn resolve_self(&self) -> std::result::Result<Peer, PeerError> {
        (**self).resolve_self()
    }

    fn resolve(&self, identifier: &str) -> std::result::Result<Peer, PeerError> {
        (**self).resolve(identifier)
    }
}

impl<T: PeerManager + ?Sized> PeerManager for Box<T> {
    fn resolve_self(&self) -> std::result::Result<Peer, PeerError> {
        (**self).resolve_self()
    }

    fn resolve(&self, identifier: &str) -> std::result::Result<Peer, PeerError> {
        (**self).resolve(identifier)
    }
}

impl<T: PeerManager + ?Sized> PeerManager for Arc<T> {
    fn resolve_self(&self) -> std::result::Result<Peer, PeerError> {
        (**self).resolve_self()
    }

    fn resolve(&self, identifier: &str) -> std::result::Result<Peer, PeerError> {
        (**self).resolve(identifier)
    }
}

/// Resolve a destination identifier into a peer
///
/// The empty identifier resolves to the caller's own identity. Any other
/// identifier is passed to the manager unchanged.
///
/// # Errors
///
/// Returns [`UploadError::PeerResolution`] if the manager rejects or fails to
/// resolve the identifier.
pub fn resolve_peer<M: PeerManager + ?Sized>(manager: &M, identifier: &str) -> Result<Peer> {
    let resolved = if identifier.is_empty() {
        manager.resolve_self()
    } else {
        manager.resolve(identifier)
    };

    resolved.map_err(|e| UploadError::peer_resolution(identifier, e))
}
