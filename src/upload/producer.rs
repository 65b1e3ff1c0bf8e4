//! Background production of upload elements
//!
//! Runs an [`UploadIter`] on tokio's blocking pool so that async uploaders can
//! receive the next element while the current one is still being sent.

use super::iter::UploadIter;
use super::types::UploadElement;
use crate::error::{Result, UploadError};
use crate::peer::PeerManager;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawn a blocking task that drains `iter` into a bounded channel
///
/// At most `capacity` resolved elements wait in the channel; a capacity of 0
/// is treated as 1. Production stops early when the receiver is dropped. The
/// join handle resolves to the iterator's terminal error, if any.
pub fn spawn_producer<M>(
    mut iter: UploadIter<M>,
    capacity: usize,
) -> (mpsc::Receiver<UploadElement>, JoinHandle<Result<()>>)
where
    M: PeerManager + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));

    let handle = tokio::task::spawn_blocking(move || {
        for element in iter.by_ref() {
            if tx.blocking_send(element).is_err() {
                log::debug!("upload element receiver dropped, stopping producer");
                return Ok(());
            }
        }
        iter.into_result()
    });

    (rx, handle)
}

/// Await a producer handle
///
/// A panic in the producer is resumed on the caller; an aborted task is
/// reported as cancelled.
pub async fn join_producer(handle: JoinHandle<Result<()>>) -> Result<()> {
    match handle.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            log::warn!("upload producer task failed: {}", e);
            Err(UploadError::cancelled("upload producer"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::{MemoryDirectory, Peer, PeerKind};
    use crate::route::FileSpec;
    use crate::upload::UploadOptions;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_producer_forwards_elements() {
        let dir = tempdir().unwrap();
        let mut files = Vec::new();
        for name in ["a.txt", "b.txt", "c.txt"] {
            let path = dir.path().join(name);
            std::fs::write(&path, name).unwrap();
            files.push(FileSpec::new(path));
        }

        let directory = MemoryDirectory::new(Peer::new(1, PeerKind::User));
        let iter = UploadIter::new(files, UploadOptions::new(), None, directory);

        let (mut rx, handle) = spawn_producer(iter, 1);
        let mut names = Vec::new();
        while let Some(element) = rx.recv().await {
            names.push(element.file().name());
        }

        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
        assert!(join_producer(handle).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_producer_reports_error() {
        let directory = MemoryDirectory::new(Peer::new(1, PeerKind::User));
        let files = vec![FileSpec::new("/definitely/not/here.bin")];
        let iter = UploadIter::new(files, UploadOptions::new(), None, directory);

        let (mut rx, handle) = spawn_producer(iter, 4);
        assert!(rx.recv().await.is_none());

        let err = join_producer(handle).await.unwrap_err();
        assert!(matches!(err, UploadError::OpenFile { .. }));
    }
}
