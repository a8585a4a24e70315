//! Dataset enumeration and file content access.

mod nifti;
mod source;
mod tree;

pub use nifti::{HEADER_SIZE, NiftiHeader, TimeUnit};
pub use source::{ContentHandle, FileRef};
pub use tree::{TreeConfig, TreeWalker};

#[cfg(test)]
pub(crate) use nifti::header_bytes;
