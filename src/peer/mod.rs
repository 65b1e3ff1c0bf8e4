//! Peer resolution for upload destinations
//!
//! This module turns destination identifiers into resolved peers through an
//! injected [`PeerManager`]. The empty identifier is reserved for the caller's
//! own identity.

pub mod directory;
pub mod manager;
pub mod query;
pub mod types;

pub use directory::MemoryDirectory;
pub use manager::{resolve_peer, PeerError, PeerManager};
pub use query::PeerQuery;
pub use types::{Peer, PeerKind};
