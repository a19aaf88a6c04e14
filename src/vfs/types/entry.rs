/*!
 * VFS File Entry
 * Virtual directory entry produced by a layered file system
 */

use serde::Serialize;

use super::errors::{VfsError, VfsResult};
use super::file_type::FileType;
use super::stat::EntryStat;
use crate::path::PathSpec;
use crate::resolver::{ByteStreamHandle, Resolver};

/// Entry of a layered file system
///
/// Entries are plain values: they carry the chain that addresses them and can
/// be reopened through any resolver sharing the same registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    name: String,
    path_spec: PathSpec,
    store_index: Option<u32>,
    is_root: bool,
    is_virtual: bool,
    stat: EntryStat,
}

impl FileEntry {
    /// Root directory entry of a file system
    pub(crate) fn root(path_spec: PathSpec) -> Self {
        Self {
            name: String::new(),
            path_spec,
            store_index: None,
            is_root: true,
            is_virtual: true,
            stat: EntryStat::directory(),
        }
    }

    /// Entry for an indexed sub-volume
    pub(crate) fn indexed(name: String, path_spec: PathSpec, index: u32, stat: EntryStat) -> Self {
        Self {
            name,
            path_spec,
            store_index: Some(index),
            is_root: false,
            is_virtual: false,
            stat,
        }
    }

    /// Entry name, empty for the root
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chain addressing this entry
    #[inline]
    #[must_use]
    pub fn path_spec(&self) -> &PathSpec {
        &self.path_spec
    }

    /// Zero-based store index, `None` for the root
    #[inline]
    #[must_use]
    pub fn store_index(&self) -> Option<u32> {
        self.store_index
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Virtual entries have no backing data of their own
    #[inline]
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    #[inline]
    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.stat.file_type
    }

    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self.stat.file_type, FileType::Directory)
    }

    #[inline]
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self.stat.file_type, FileType::File)
    }

    #[must_use]
    pub fn stat(&self) -> &EntryStat {
        &self.stat
    }

    /// Open the entry's data as a byte stream through `resolver`
    ///
    /// The returned handle holds a reference in the resolver context and must
    /// be released (or dropped) by the caller.
    pub fn open_byte_stream(&self, resolver: &Resolver) -> VfsResult<ByteStreamHandle> {
        if self.is_dir() {
            return Err(VfsError::IsADirectory(format!(
                "entry '{}' has no data stream",
                self.name
            )));
        }
        resolver.open_byte_stream(&self.path_spec)
    }
}
