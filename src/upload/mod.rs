//! Upload element production
//!
//! This module turns a list of local files into self-contained upload
//! elements: open handles, an optional validated thumbnail, the resolved
//! destination peer and the per-run flags.

pub mod iter;
#[cfg(feature = "tokio")]
pub mod producer;
pub mod thumbnail;
pub mod types;

pub use iter::{IterState, UploadIter};
#[cfg(feature = "tokio")]
pub use producer::{join_producer, spawn_producer};
pub use thumbnail::{is_image, open_thumbnail, ContentSniffer, MagicSniffer};
pub use types::{UploadElement, UploadFile, UploadOptions};
