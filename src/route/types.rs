//! Types shared by the routing policy and routing programs

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Serialize an optional path as a plain string, `""` when absent
fn serialize_opt_path<S>(value: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(path) => serializer.serialize_str(&path.to_string_lossy()),
        None => serializer.serialize_str(""),
    }
}

/// A local file queued for upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Path of the file to upload
    pub path: PathBuf,
    /// Optional thumbnail path
    #[serde(default, serialize_with = "serialize_opt_path")]
    pub thumb: Option<PathBuf>,
}

impl FileSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            thumb: None,
        }
    }

    /// Set the thumbnail path
    pub fn thumb(mut self, thumb: impl Into<PathBuf>) -> Self {
        self.thumb = Some(thumb.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The thumbnail path, or `None` when absent or empty
    pub fn thumb_path(&self) -> Option<&Path> {
        self.thumb
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// The read-only environment a routing program is evaluated against
///
/// Programs address fields in lowercase dotted form, `file.path` and
/// `file.thumb`, as listed by [`RoutingEnv::fields`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutingEnv {
    pub file: FileSpec,
}

impl RoutingEnv {
    /// Build the environment for a file, or an empty one when there is none
    pub fn for_file(file: Option<&FileSpec>) -> Self {
        Self {
            file: file.cloned().unwrap_or_default(),
        }
    }

    /// Field paths visible to routing programs, with a short description
    pub fn fields() -> &'static [(&'static str, &'static str)] {
        &[
            ("file.path", "File path"),
            ("file.thumb", "Thumbnail path, empty when the file has none"),
        ]
    }

    /// The environment as a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Where a single file is sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Peer identifier; empty means the caller's own identity
    pub peer: String,
    /// Topic or reply-to message; 0 means no thread
    pub thread: i64,
}

impl Destination {
    pub fn new(peer: impl Into<String>, thread: i64) -> Self {
        Self {
            peer: peer.into(),
            thread,
        }
    }
}

/// The shape of a routing program's result
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// A bare peer identifier, routed without a thread
    Peer(String),
    /// A destination map, decoded tolerantly into a [`Destination`]
    Destination(Map<String, Value>),
    /// Any other value
    Unrecognized {
        type_name: &'static str,
        raw: Value,
    },
}

impl From<Value> for RouteResult {
    fn from(value: Value) -> Self {
        match value {
            Value::String(peer) => RouteResult::Peer(peer),
            Value::Object(map) => RouteResult::Destination(map),
            other => RouteResult::Unrecognized {
                type_name: type_name(&other),
                raw: other,
            },
        }
    }
}

/// Runtime type name of a JSON value
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}
