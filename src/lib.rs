pub mod error;

pub mod peer;
pub mod route;
pub mod upload;

pub use error::{BoxError, Result, UploadError};

pub use peer::{resolve_peer, MemoryDirectory, Peer, PeerError, PeerKind, PeerManager, PeerQuery};

pub use route::{Destination, FileSpec, RouteProgram, RouteResult, RoutingEnv, RoutingPolicy};

pub use upload::{
    is_image, open_thumbnail, ContentSniffer, IterState, MagicSniffer, UploadElement, UploadFile,
    UploadIter, UploadOptions,
};

#[cfg(feature = "tokio")]
pub use upload::{join_producer, spawn_producer};

pub use tokio_util::sync::CancellationToken;
