/*!
 * Backing Streams
 * Parent byte stream held by a transforming layer until it is closed
 */

use parking_lot::RwLock;
use tracing::warn;

use crate::path::{LayerKind, PathSpec};
use crate::resolver::{ByteStreamHandle, Resolver};
use crate::vfs::types::{VfsError, VfsResult};

/// Parent stream of a layer, released exactly once on close
pub(crate) struct BackingStream {
    kind: LayerKind,
    handle: RwLock<Option<ByteStreamHandle>>,
}

impl BackingStream {
    /// Open `parent` through the resolver on behalf of a `kind` layer
    pub(crate) fn open(kind: LayerKind, parent: &PathSpec, resolver: &Resolver) -> VfsResult<Self> {
        let handle = resolver.open_byte_stream(parent)?;
        Ok(Self {
            kind,
            handle: RwLock::new(Some(handle)),
        })
    }

    pub(crate) fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let guard = self.handle.read();
        let handle = guard.as_ref().ok_or_else(|| self.closed())?;
        handle.read_at(offset, buf)
    }

    pub(crate) fn size(&self) -> VfsResult<u64> {
        let guard = self.handle.read();
        let handle = guard.as_ref().ok_or_else(|| self.closed())?;
        handle.size()
    }

    /// Give the parent back to the context
    pub(crate) fn release(&self) -> VfsResult<()> {
        match self.handle.write().take() {
            Some(handle) => handle.release(),
            None => Ok(()),
        }
    }

    /// Release variant for `ByteStream::close`, which cannot fail
    pub(crate) fn close(&self) {
        if let Err(e) = self.release() {
            warn!(kind = %self.kind, error = %e, "Failed to release backing stream");
        }
    }

    fn closed(&self) -> VfsError {
        VfsError::NotOpen(format!("{} stream", self.kind))
    }
}
