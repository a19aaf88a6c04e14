/*!
 * Layer Handlers
 * Per-kind factories producing byte streams and file systems
 */

use std::sync::Arc;

use super::dispatch::Resolver;
use crate::path::{LayerKind, PathSpec};
use crate::vfs::traits::{ByteStream, FileSystem};
use crate::vfs::types::{VfsError, VfsResult};

/// Factory for one layer kind
///
/// Handlers are stateless with respect to individual chains: everything a
/// constructed instance needs comes from the path specification and from the
/// resolver, which the handler uses to open the parent chain. Constructed
/// instances are cached by the resolver context, never by the handler.
pub trait LayerHandler: Send + Sync {
    /// Kind this handler serves
    fn kind(&self) -> LayerKind;

    fn supports_byte_stream(&self) -> bool {
        false
    }

    fn supports_file_system(&self) -> bool {
        false
    }

    /// Construct a byte stream for `path_spec`
    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        let _ = (path_spec, resolver);
        Err(VfsError::UnsupportedKind {
            kind: self.kind(),
            reason: "layer does not provide byte streams".into(),
        })
    }

    /// Construct an opened file system for `path_spec`
    fn new_file_system(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn FileSystem>> {
        let _ = (path_spec, resolver);
        Err(VfsError::UnsupportedKind {
            kind: self.kind(),
            reason: "layer does not provide a file system".into(),
        })
    }
}
