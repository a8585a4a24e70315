//! Dataset enumeration.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{BidsError, Result};
use super::source::FileRef;

/// Enumerator configuration.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
        }
    }
}

/// Walks a dataset root and produces [`FileRef`]s.
pub struct TreeWalker {
    config: TreeConfig,
}

impl TreeWalker {
    /// Create a walker with default configuration.
    pub fn new() -> Self {
        Self {
            config: TreeConfig::default(),
        }
    }

    /// Create a walker with custom configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        Self { config }
    }

    /// List every regular file below `root`, sorted by relative path.
    ///
    /// Entries that cannot be read are logged and skipped; only an
    /// inaccessible root is an error.
    pub fn files(&self, root: impl AsRef<Path>) -> Result<Vec<FileRef>> {
        let root = root.as_ref();
        let metadata = std::fs::metadata(root).map_err(|e| BidsError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(BidsError::Io {
                path: root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        let mut files = Vec::new();
        let mut skipped = 0usize;

        for entry in WalkDir::new(root).follow_links(self.config.follow_symlinks) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to access directory entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                skipped += 1;
                continue;
            };
            let relative_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    warn!("Failed to stat {}: {}", entry.path().display(), e);
                    0
                }
            };

            files.push(FileRef::on_disk(relative_path, entry.path(), size));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(
            "Enumerated {} files under {} ({} skipped)",
            files.len(),
            root.display(),
            skipped
        );

        Ok(files)
    }
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new()
    }
}
