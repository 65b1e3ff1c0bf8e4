//! Pull-based producer of upload elements
//!
//! [`UploadIter`] walks the file list once. Each successful [`advance`]
//! resolves one file into an [`UploadElement`]; the first failure is kept as
//! a terminal error and ends the iteration.
//!
//! ```no_run
//! use upload_router::{FileSpec, MemoryDirectory, Peer, PeerKind, UploadIter, UploadOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! let directory = MemoryDirectory::new(Peer::new(1, PeerKind::User));
//! let files = vec![FileSpec::new("a.mp4"), FileSpec::new("b.mp4")];
//! let mut iter = UploadIter::new(files, UploadOptions::new(), None, &directory);
//!
//! let cancel = CancellationToken::new();
//! while iter.advance(&cancel) {
//!     let element = iter.take_current().expect("element after successful advance");
//!     // upload `element`
//! #   drop(element);
//! }
//! if let Some(err) = iter.error() {
//!     eprintln!("upload stopped: {err}");
//! }
//! ```
//!
//! [`advance`]: UploadIter::advance

use super::thumbnail::{open_thumbnail, ContentSniffer, MagicSniffer};
use super::types::{UploadElement, UploadFile, UploadOptions};
use crate::error::{Result, UploadError};
use crate::peer::{resolve_peer, PeerManager};
use crate::route::{FileSpec, RouteProgram, RoutingPolicy};
use bytesize::ByteSize;
use std::fs::File;
use tokio_util::sync::CancellationToken;

/// Observable state of an [`UploadIter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    /// Files remain and no error has occurred
    Ready,
    /// Every file has been consumed
    Exhausted,
    /// A terminal error was recorded
    Failed,
}

/// Lazily resolves files into upload elements
pub struct UploadIter<M> {
    files: Vec<FileSpec>,
    policy: RoutingPolicy,
    options: UploadOptions,
    manager: M,
    sniffer: Box<dyn ContentSniffer + Send>,
    cancel: CancellationToken,

    cursor: usize,
    error: Option<UploadError>,
    current: Option<UploadElement>,
}

impl<M: PeerManager> UploadIter<M> {
    /// Create an iterator over `files`
    ///
    /// The routing mode is chosen here: a non-empty `options.chat` routes all
    /// files statically, otherwise `program` is evaluated per file. With
    /// neither, files go to the caller's own identity.
    pub fn new(
        files: Vec<FileSpec>,
        options: UploadOptions,
        program: Option<Box<dyn RouteProgram + Send>>,
        manager: M,
    ) -> Self {
        let policy = RoutingPolicy::select(&options.chat, options.thread, program);

        Self {
            files,
            policy,
            options,
            manager,
            sniffer: Box::new(MagicSniffer),
            cancel: CancellationToken::new(),

            cursor: 0,
            error: None,
            current: None,
        }
    }

    /// Replace the content sniffer used for thumbnails
    pub fn with_sniffer(mut self, sniffer: impl ContentSniffer + Send + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    /// Set the token observed by the [`Iterator`] implementation
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Advance to the next file and resolve it
    ///
    /// Returns `true` when a new element is available through [`current`] or
    /// [`take_current`]. Returns `false` when the list is exhausted, when the
    /// iteration has failed, or when `cancel` has been triggered; in the
    /// latter two cases [`error`] holds the reason.
    ///
    /// Blocks the calling thread for file I/O and peer resolution.
    ///
    /// [`current`]: UploadIter::current
    /// [`take_current`]: UploadIter::take_current
    /// [`error`]: UploadIter::error
    pub fn advance(&mut self, cancel: &CancellationToken) -> bool {
        self.current = None;

        if cancel.is_cancelled() {
            if self.error.is_none() {
                log::debug!("upload iteration cancelled at file {}", self.cursor);
                self.error = Some(UploadError::cancelled("next upload element"));
            }
            return false;
        }

        if self.error.is_some() {
            return false;
        }

        let Some(spec) = self.files.get(self.cursor) else {
            log::debug!("upload iteration exhausted after {} files", self.files.len());
            return false;
        };
        self.cursor += 1;

        match self.resolve(spec) {
            Ok(element) => {
                log::debug!(
                    "resolved {} -> {} (thread {}, {})",
                    spec.path.display(),
                    element.peer(),
                    element.thread(),
                    ByteSize::b(element.file().size())
                );
                self.current = Some(element);
                true
            }
            Err(err) => {
                log::warn!("upload iteration failed on {}: {}", spec.path.display(), err);
                self.error = Some(err);
                false
            }
        }
    }

    fn resolve(&self, spec: &FileSpec) -> Result<UploadElement> {
        let destination = self.policy.destination(spec)?;
        let peer = resolve_peer(&self.manager, &destination.peer)?;

        let thumb = open_thumbnail(self.sniffer.as_ref(), spec.thumb_path())?;

        let file = File::open(&spec.path).map_err(|e| UploadError::open_file(&spec.path, e))?;
        let size = file
            .metadata()
            .map_err(|e| UploadError::stat_file(&spec.path, e))?
            .len();

        Ok(UploadElement::new(
            UploadFile::new(file, &spec.path, size),
            thumb,
            peer,
            destination.thread,
            self.options.as_photo,
            self.options.remove_after_upload,
        ))
    }
}

impl<M> UploadIter<M> {
    /// The element produced by the last successful [`advance`](UploadIter::advance)
    pub fn current(&self) -> Option<&UploadElement> {
        self.current.as_ref()
    }

    /// Take ownership of the current element
    pub fn take_current(&mut self) -> Option<UploadElement> {
        self.current.take()
    }

    /// The terminal error, if the iteration failed
    pub fn error(&self) -> Option<&UploadError> {
        self.error.as_ref()
    }

    pub fn state(&self) -> IterState {
        if self.error.is_some() {
            IterState::Failed
        } else if self.cursor >= self.files.len() {
            IterState::Exhausted
        } else {
            IterState::Ready
        }
    }

    /// Index of the next file to resolve
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_static(&self) -> bool {
        self.policy.is_static()
    }

    /// Consume the iterator, returning its terminal error if any
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<M: PeerManager> Iterator for UploadIter<M> {
    type Item = UploadElement;

    fn next(&mut self) -> Option<UploadElement> {
        let cancel = self.cancel.clone();
        if self.advance(&cancel) {
            self.take_current()
        } else {
            None
        }
    }
}

impl<M> std::fmt::Debug for UploadIter<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadIter")
            .field("files", &self.files.len())
            .field("policy", &self.policy)
            .field("options", &self.options)
            .field("cursor", &self.cursor)
            .field("error", &self.error)
            .field("current", &self.current.is_some())
            .finish()
    }
}
