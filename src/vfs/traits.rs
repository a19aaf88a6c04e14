/*!
 * VFS Traits
 * Capability interfaces every layer instance implements
 */

use crate::core::limits::STREAM_READ_CHUNK;
use crate::path::{LayerKind, PathSpec};

use super::types::*;

/// Read-only byte stream exposed by a layer
///
/// Reads are positional so a single instance can be shared by every consumer
/// of the same chain without a shared cursor. Implementations may block the
/// calling thread on backing I/O.
pub trait ByteStream: Send + Sync {
    /// Layer kind that produced this stream
    fn kind(&self) -> LayerKind;

    /// Read up to `buf.len()` bytes at `offset`
    ///
    /// Returns the number of bytes read; 0 at or past the end of the stream.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize>;

    /// Total size of the stream in bytes
    fn size(&self) -> VfsResult<u64>;

    /// Release backing resources
    ///
    /// Invoked once by the resolver context when the last reference to the
    /// chain is released. Reads after close fail.
    fn close(&self) {}
}

impl dyn ByteStream {
    /// Fill `buf` completely from `offset`
    pub fn read_exact_at(&self, mut offset: u64, mut buf: &mut [u8]) -> VfsResult<()> {
        while !buf.is_empty() {
            let read = self.read_at(offset, buf)?;
            if read == 0 {
                return Err(VfsError::Io(format!(
                    "unexpected end of {} stream at offset {}",
                    self.kind(),
                    offset
                )));
            }
            offset += read as u64;
            buf = &mut buf[read..];
        }
        Ok(())
    }

    /// Read the whole stream into memory
    pub fn read_all(&self) -> VfsResult<Vec<u8>> {
        let size = self.size()?;
        let capacity = usize::try_from(size)
            .map_err(|_| VfsError::Io(format!("stream of {} bytes does not fit in memory", size)))?;
        let mut data = Vec::with_capacity(capacity);
        let mut chunk = vec![0u8; STREAM_READ_CHUNK];
        let mut offset = 0u64;
        while offset < size {
            let read = self.read_at(offset, &mut chunk)?;
            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read]);
            offset += read as u64;
        }
        Ok(data)
    }
}

/// Directory view exposed by a layer
///
/// A file system is bound to one chain while open. Lookups distinguish absence
/// (`Ok(None)`) from failure (`Err`).
pub trait FileSystem: Send + Sync {
    /// Layer kind of this file system
    fn kind(&self) -> LayerKind;

    /// Bind to `path_spec` and open the backing layers
    fn open(&self, path_spec: &PathSpec) -> VfsResult<()>;

    /// Release the backing layers; calling it on a closed instance is a no-op
    fn close(&self) -> VfsResult<()>;

    /// Check if the file system is open
    fn is_open(&self) -> bool;

    /// Look up the entry addressed by `path_spec`
    fn get_file_entry_by_path_spec(&self, path_spec: &PathSpec) -> VfsResult<Option<FileEntry>>;

    /// Check whether `path_spec` addresses an existing entry
    ///
    /// Always agrees with [`FileSystem::get_file_entry_by_path_spec`].
    fn file_entry_exists_by_path_spec(&self, path_spec: &PathSpec) -> VfsResult<bool> {
        Ok(self.get_file_entry_by_path_spec(path_spec)?.is_some())
    }

    /// Root directory entry
    fn get_root_file_entry(&self) -> VfsResult<FileEntry>;

    /// Entries directly beneath `entry`, in index order
    fn sub_file_entries(&self, entry: &FileEntry) -> VfsResult<Vec<FileEntry>>;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}
