//! File references and content access.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BidsError, Result};

/// Where the bytes of a file come from.
#[derive(Debug, Clone, Default)]
pub enum ContentHandle {
    /// A file on disk.
    Disk(PathBuf),
    /// Bytes held in memory (caller-supplied file lists, tests).
    Memory(Arc<[u8]>),
    /// No content: a synthesized reference to a file that does not exist.
    #[default]
    Missing,
}

/// A file in the dataset being validated.
///
/// Produced by the enumerator and read-only to the rest of the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    /// Path relative to the dataset root, `/`-separated, with a leading `/`.
    pub relative_path: String,
    /// File name without directories.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Content handle.
    #[serde(skip)]
    pub handle: ContentHandle,
}

impl FileRef {
    /// Create a reference to a file on disk.
    pub fn on_disk(relative_path: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self::with_handle(relative_path.into(), size, ContentHandle::Disk(path.into()))
    }

    /// Create a reference backed by in-memory bytes.
    pub fn in_memory(relative_path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = contents.into();
        let size = bytes.len() as u64;
        Self::with_handle(relative_path.into(), size, ContentHandle::Memory(bytes.into()))
    }

    /// Create a reference to a file that has no content.
    pub fn missing(relative_path: impl Into<String>) -> Self {
        Self::with_handle(relative_path.into(), 0, ContentHandle::Missing)
    }

    fn with_handle(relative_path: String, size: u64, handle: ContentHandle) -> Self {
        let relative_path = normalize_relative(&relative_path);
        let name = relative_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            relative_path,
            name,
            size,
            handle,
        }
    }

    /// Open a reader over the file contents.
    pub fn open(&self) -> Result<Box<dyn Read + '_>> {
        match &self.handle {
            ContentHandle::Disk(path) => {
                let file = File::open(path).map_err(|e| BidsError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(Box::new(file))
            }
            ContentHandle::Memory(bytes) => Ok(Box::new(Cursor::new(bytes.as_ref()))),
            ContentHandle::Missing => Err(self.io_error(io::Error::new(
                io::ErrorKind::NotFound,
                "file has no content",
            ))),
        }
    }

    /// Read the whole file.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let mut contents = Vec::with_capacity(self.size as usize);
        self.open()?
            .read_to_end(&mut contents)
            .map_err(|e| self.io_error(e))?;
        Ok(contents)
    }

    /// Read the whole file as UTF-8 text.
    pub fn read_text(&self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes)
            .map_err(|e| self.io_error(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Wrap an I/O error with this file's location.
    pub(crate) fn io_error(&self, source: io::Error) -> BidsError {
        let path = match &self.handle {
            ContentHandle::Disk(path) => path.clone(),
            _ => PathBuf::from(&self.relative_path),
        };
        BidsError::Io { path, source }
    }
}

/// Ensure a leading `/` and forward slashes.
fn normalize_relative(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}
