use crate::error::{Result, UploadError};
use crate::peer::Peer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// An open file handed to the uploader together with its size
#[derive(Debug)]
pub struct UploadFile {
    file: File,
    path: PathBuf,
    size: u64,
}

impl UploadFile {
    pub fn new(file: File, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            file,
            path: path.into(),
            size,
        }
    }

    /// File name component of the path, used as the upload name
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes; 0 when it was not measured up front
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl Read for UploadFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

/// One unit of upload work
///
/// The consumer owns the handles once the element is taken from the iterator
/// and is responsible for honoring `remove_after_upload`.
#[derive(Debug)]
pub struct UploadElement {
    file: UploadFile,
    thumb: Option<UploadFile>,
    peer: Peer,
    thread: i64,
    as_photo: bool,
    remove_after_upload: bool,
}

impl UploadElement {
    pub fn new(
        file: UploadFile,
        thumb: Option<UploadFile>,
        peer: Peer,
        thread: i64,
        as_photo: bool,
        remove_after_upload: bool,
    ) -> Self {
        Self {
            file,
            thumb,
            peer,
            thread,
            as_photo,
            remove_after_upload,
        }
    }

    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut UploadFile {
        &mut self.file
    }

    pub fn thumb(&self) -> Option<&UploadFile> {
        self.thumb.as_ref()
    }

    pub fn thumb_mut(&mut self) -> Option<&mut UploadFile> {
        self.thumb.as_mut()
    }

    /// Resolved destination peer
    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    /// Topic or reply-to message; 0 means none
    pub fn thread(&self) -> i64 {
        self.thread
    }

    pub fn as_photo(&self) -> bool {
        self.as_photo
    }

    pub fn remove_after_upload(&self) -> bool {
        self.remove_after_upload
    }

    /// Close the handles and delete the source file if requested
    ///
    /// Call this once the upload of this element has succeeded. The thumbnail
    /// is never deleted.
    pub fn complete(self) -> Result<()> {
        let UploadElement {
            file,
            thumb,
            remove_after_upload,
            ..
        } = self;

        drop(thumb);
        let path = file.path.clone();
        drop(file.file);

        if remove_after_upload {
            std::fs::remove_file(&path)
                .map_err(|source| UploadError::RemoveFile { path, source })?;
        }

        Ok(())
    }
}

/// Per-run options applied uniformly to every file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UploadOptions {
    /// Static destination; empty selects routing by program
    pub chat: String,
    /// Static topic or reply-to message
    pub thread: i64,
    /// Send media as photos rather than documents
    pub as_photo: bool,
    /// Delete each source file after it is uploaded
    pub remove_after_upload: bool,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat(mut self, chat: impl Into<String>) -> Self {
        self.chat = chat.into();
        self
    }

    pub fn thread(mut self, thread: i64) -> Self {
        self.thread = thread;
        self
    }

    pub fn as_photo(mut self, as_photo: bool) -> Self {
        self.as_photo = as_photo;
        self
    }

    pub fn remove_after_upload(mut self, remove: bool) -> Self {
        self.remove_after_upload = remove;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.thread < 0 {
            return Err(UploadError::invalid_parameter(
                "thread",
                "Thread must not be negative",
            ));
        }

        Ok(())
    }

    /// Convert the options to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(UploadError::from)
    }

    /// Create options from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(UploadError::from)
    }
}
