//! Types for resolved peers

use serde::{Deserialize, Serialize};

/// Kind of peer an upload can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerKind {
    User,
    Group,
    Channel,
}

impl Default for PeerKind {
    fn default() -> Self {
        PeerKind::User
    }
}

impl std::fmt::Display for PeerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerKind::User => write!(f, "user"),
            PeerKind::Group => write!(f, "group"),
            PeerKind::Channel => write!(f, "channel"),
        }
    }
}

/// A peer resolved by a [`PeerManager`](super::PeerManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Numeric peer ID
    pub id: i64,
    /// Kind of peer
    pub kind: PeerKind,
    /// Public username, without the leading `@`
    pub username: Option<String>,
    /// Display title or name
    pub title: String,
}

impl Peer {
    /// Create a new peer
    pub fn new(id: i64, kind: PeerKind) -> Self {
        Self {
            id,
            kind,
            username: None,
            title: String::new(),
        }
    }

    /// Set the username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Check whether the username matches, ignoring ASCII case
    pub fn has_username(&self, name: &str) -> bool {
        self.username
            .as_deref()
            .map_or(false, |u| u.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.username {
            Some(username) => write!(f, "@{} ({})", username, self.id),
            None => write!(f, "{} ({})", self.kind, self.id),
        }
    }
}
