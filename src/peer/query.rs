//! Peer identifier parsing
//!
//! Peer managers may parse non-empty destination identifiers into a
//! [`PeerQuery`]. Accepted forms:
//!
//! * `@username` or a bare `username`
//! * a numeric ID, e.g. `123456` or `-1001234567890`
//! * a public link, `t.me/username`, `https://t.me/username` or a message
//!   link `t.me/username/15`
//!
//! Private (`t.me/c/...`) and invite (`t.me/joinchat/...`, `t.me/+...`) links
//! are rejected rather than read as usernames.

use super::manager::PeerError;
use std::fmt;

const LINK_HOSTS: [&str; 2] = ["t.me/", "telegram.me/"];

/// First link segments that never name a public username
const RESERVED_LINK_PATHS: [&str; 5] = ["c", "joinchat", "addlist", "addstickers", "s"];

/// A parsed, non-empty peer identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeerQuery {
    /// Lookup by public username, stored without the leading `@`
    Username(String),
    /// Lookup by numeric peer ID
    Id(i64),
}

impl PeerQuery {
    /// Parse an identifier string
    ///
    /// The empty identifier is not a query: it names the caller's own identity
    /// and is handled by [`resolve_peer`](super::resolve_peer) before any
    /// manager sees it.
    pub fn parse(identifier: &str) -> Result<Self, PeerError> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Err(invalid(identifier, "identifier is empty"));
        }

        if looks_numeric(trimmed) {
            return trimmed
                .parse::<i64>()
                .map(PeerQuery::Id)
                .map_err(|_| invalid(identifier, "numeric ID out of range"));
        }

        let name = match strip_link(trimmed) {
            Some(path) => link_username(identifier, path)?,
            None => trimmed.strip_prefix('@').unwrap_or(trimmed),
        };

        validate_username(identifier, name)?;
        Ok(PeerQuery::Username(name.to_string()))
    }
}

impl fmt::Display for PeerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerQuery::Username(name) => write!(f, "@{}", name),
            PeerQuery::Id(id) => write!(f, "{}", id),
        }
    }
}

fn strip_link(s: &str) -> Option<&str> {
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    LINK_HOSTS.iter().find_map(|host| s.strip_prefix(host))
}

/// Whether the identifier is an ID: digits with an optional leading `-`
fn looks_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Extract the username from the path of a public link
fn link_username<'a>(identifier: &str, path: &'a str) -> Result<&'a str, PeerError> {
    let path = path.split('?').next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let name = segments.next().unwrap_or_default();

    if name.starts_with('+') || RESERVED_LINK_PATHS.contains(&name) {
        return Err(invalid(
            identifier,
            "private and invite links do not name a public peer",
        ));
    }

    match (segments.next(), segments.next()) {
        (None, _) => Ok(name),
        (Some(message), None) if looks_numeric(message) && !message.starts_with('-') => Ok(name),
        _ => Err(invalid(
            identifier,
            "link must be t.me/<username> or t.me/<username>/<message>",
        )),
    }
}

fn validate_username(identifier: &str, name: &str) -> Result<(), PeerError> {
    let first = match name.chars().next() {
        Some(c) => c,
        None => return Err(invalid(identifier, "username is empty")),
    };

    if first.is_ascii_digit() {
        return Err(invalid(identifier, "username cannot start with a digit"));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            identifier,
            "username may only contain letters, digits and underscores",
        ));
    }

    Ok(())
}

fn invalid(identifier: &str, reason: &str) -> PeerError {
    PeerError::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
    }
}
