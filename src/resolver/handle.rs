/*!
 * Cached Handles
 *
 * RAII handles over context-cached instances with automatic release
 */

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::warn;

use super::context::{Context, Resource};
use crate::path::{LayerKind, PathSpec};
use crate::vfs::traits::{ByteStream, FileSystem};
use crate::vfs::types::{FileEntry, VfsResult};

/// Handle to a shared byte stream
pub type ByteStreamHandle = CachedHandle<dyn ByteStream>;

/// Handle to a shared file system
///
/// Lookups go through the handle; closing is left to the context, so one
/// holder can never close the instance under another.
///
/// ```compile_fail
/// fn close_shared(handle: &layered_vfs::FileSystemHandle) {
///     let _ = handle.close();
/// }
/// ```
pub type FileSystemHandle = CachedHandle<dyn FileSystem>;

/// Consumer view of a context-owned instance
///
/// Exposes reads and lookups only. The lifecycle methods of the underlying
/// instance are reachable by the context alone.
pub struct Shared<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Shared<T> {
    /// Check whether both views refer to the same instance
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Shared<dyn ByteStream> {
    pub fn kind(&self) -> LayerKind {
        self.0.kind()
    }

    /// Read up to `buf.len()` bytes at `offset`
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        self.0.read_at(offset, buf)
    }

    pub fn size(&self) -> VfsResult<u64> {
        self.0.size()
    }

    /// Fill `buf` completely from `offset`
    pub fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<()> {
        self.0.read_exact_at(offset, buf)
    }

    /// Read the whole stream into memory
    pub fn read_all(&self) -> VfsResult<Vec<u8>> {
        self.0.read_all()
    }
}

impl Shared<dyn FileSystem> {
    pub fn kind(&self) -> LayerKind {
        self.0.kind()
    }

    pub fn is_open(&self) -> bool {
        self.0.is_open()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Look up the entry addressed by `path_spec`
    pub fn get_file_entry_by_path_spec(&self, path_spec: &PathSpec) -> VfsResult<Option<FileEntry>> {
        self.0.get_file_entry_by_path_spec(path_spec)
    }

    pub fn file_entry_exists_by_path_spec(&self, path_spec: &PathSpec) -> VfsResult<bool> {
        self.0.file_entry_exists_by_path_spec(path_spec)
    }

    pub fn get_root_file_entry(&self) -> VfsResult<FileEntry> {
        self.0.get_root_file_entry()
    }

    /// Entries directly beneath `entry`, in index order
    pub fn sub_file_entries(&self, entry: &FileEntry) -> VfsResult<Vec<FileEntry>> {
        self.0.sub_file_entries(entry)
    }
}

/// One acquired reference to a cached instance
///
/// Every successful open yields exactly one handle, and every handle gives
/// back exactly one reference: explicitly through [`CachedHandle::release`],
/// or on drop.
///
/// # Example
///
/// ```rust,ignore
/// let stream = resolver.open_byte_stream(&spec)?;
/// let size = stream.size()?;
/// stream.release()?;
/// ```
pub struct CachedHandle<T: ?Sized + Resource> {
    shared: Shared<T>,
    path_spec: PathSpec,
    context: Arc<Context>,
    active: bool,
}

impl<T: ?Sized + Resource> CachedHandle<T> {
    pub(crate) fn new(instance: Arc<T>, path_spec: PathSpec, context: Arc<Context>) -> Self {
        Self {
            shared: Shared(instance),
            path_spec,
            context,
            active: true,
        }
    }

    /// The shared instance, for layers stacking on top of it
    #[inline]
    pub(crate) fn instance(&self) -> &Arc<T> {
        &self.shared.0
    }

    /// Check whether both handles hold the same cached instance
    #[inline]
    pub fn shares_instance(&self, other: &Self) -> bool {
        self.shared.ptr_eq(&other.shared)
    }

    /// Chain this handle was opened for
    #[inline]
    pub fn path_spec(&self) -> &PathSpec {
        &self.path_spec
    }

    /// Give the reference back to the context
    ///
    /// Closes the instance when this was the last reference.
    pub fn release(mut self) -> VfsResult<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> VfsResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        T::cache(&self.context).release(&self.path_spec)
    }
}

impl<T: ?Sized + Resource> Deref for CachedHandle<T> {
    type Target = Shared<T>;

    fn deref(&self) -> &Shared<T> {
        &self.shared
    }
}

impl<T: ?Sized + Resource> fmt::Debug for CachedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedHandle")
            .field("resource", &T::LABEL)
            .field("kind", &self.path_spec.kind())
            .field("active", &self.active)
            .finish()
    }
}

impl<T: ?Sized + Resource> Drop for CachedHandle<T> {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            warn!(
                resource = T::LABEL,
                kind = %self.path_spec.kind(),
                error = %e,
                "Handle release on drop failed"
            );
        }
    }
}
