//! In-memory peer manager
//!
//! `MemoryDirectory` resolves peers from a fixed set known up front. It never
//! performs I/O, which makes it suitable for offline runs and tests.
//! Identifiers are read with [`PeerQuery::parse`].

use super::manager::{PeerError, PeerManager};
use super::query::PeerQuery;
use super::types::Peer;

/// A peer manager backed by a fixed list of peers
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    me: Peer,
    peers: Vec<Peer>,
}

impl MemoryDirectory {
    /// Create a directory whose own identity is `me`
    pub fn new(me: Peer) -> Self {
        Self {
            me,
            peers: Vec::new(),
        }
    }

    /// Add a known peer
    pub fn with_peer(mut self, peer: Peer) -> Self {
        self.peers.push(peer);
        self
    }

    /// Add a known peer in place
    pub fn insert(&mut self, peer: Peer) {
        self.peers.push(peer);
    }

    /// Number of known peers, excluding the own identity
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    fn all(&self) -> impl Iterator<Item = &Peer> {
        std::iter::once(&self.me).chain(self.peers.iter())
    }
}

impl PeerManager for MemoryDirectory {
    fn resolve_self(&self) -> Result<Peer, PeerError> {
        Ok(self.me.clone())
    }

    fn resolve(&self, identifier: &str) -> Result<Peer, PeerError> {
        let query = PeerQuery::parse(identifier)?;
        let found = match &query {
            PeerQuery::Username(name) => self.all().find(|p| p.has_username(name)),
            PeerQuery::Id(id) => self.all().find(|p| p.id == *id),
        };

        found.cloned().ok_or_else(|| PeerError::NotFound {
            query: query.to_string(),
        })
    }
}
