//! Error handling for upload element production
//!
//! Every error produced while resolving an upload element is terminal for the
//! iteration that produced it. The iterator records the first one and stops.

use crate::peer::PeerError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, UploadError>;

/// Boxed error returned by external collaborators such as routing programs
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types that can occur while producing upload elements
#[derive(Error, Debug)]
pub enum UploadError {
    /// Operation was cancelled
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// The primary file could not be opened
    #[error("open file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The primary file was opened but could not be stat'ed
    #[error("stat file {}: {source}", path.display())]
    StatFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The routing program failed to evaluate
    #[error("message routing: {source}")]
    RoutingEvaluation {
        #[source]
        source: BoxError,
    },

    /// The routing program returned neither a peer string nor a destination map
    #[error("message router must return string or dest: {type_name}")]
    RoutingResultType { type_name: &'static str },

    /// A destination map could not be coerced into a destination
    #[error("decode dest: {raw}: {source}")]
    DestinationDecode {
        raw: serde_json::Value,
        #[source]
        source: serde_json::Error,
    },

    /// The peer manager could not resolve an identifier
    #[error("resolve peer {identifier:?}: {source}")]
    PeerResolution {
        identifier: String,
        #[source]
        source: PeerError,
    },

    /// The declared thumbnail is not an image, or its type could not be detected
    #[error("invalid thumbnail file {}: {reason}", path.display())]
    ThumbnailInvalid { path: PathBuf, reason: String },

    /// The declared thumbnail could not be opened
    #[error("open thumbnail file {}: {source}", path.display())]
    ThumbnailOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file could not be removed after upload
    #[error("remove file {}: {source}", path.display())]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UploadError {
    /// Create a new cancelled error
    pub fn cancelled(operation: impl Into<String>) -> Self {
        UploadError::Cancelled {
            operation: operation.into(),
        }
    }

    pub fn open_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UploadError::OpenFile {
            path: path.into(),
            source,
        }
    }

    pub fn stat_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UploadError::StatFile {
            path: path.into(),
            source,
        }
    }

    /// Create a new routing evaluation error
    pub fn routing_evaluation(source: impl Into<BoxError>) -> Self {
        UploadError::RoutingEvaluation {
            source: source.into(),
        }
    }

    pub fn peer_resolution(identifier: impl Into<String>, source: PeerError) -> Self {
        UploadError::PeerResolution {
            identifier: identifier.into(),
            source,
        }
    }

    /// Create a new invalid thumbnail error
    pub fn thumbnail_invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        UploadError::ThumbnailInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        UploadError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the caller's cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, UploadError::Cancelled { .. })
    }

    /// Whether this error was raised while validating or opening a thumbnail
    pub fn is_thumbnail(&self) -> bool {
        matches!(
            self,
            UploadError::ThumbnailInvalid { .. } | UploadError::ThumbnailOpen { .. }
        )
    }
}
