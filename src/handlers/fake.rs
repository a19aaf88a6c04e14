/*!
 * In-Memory Layer
 * Root layer serving byte blobs registered by location
 */

use ahash::RandomState;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

use crate::path::{LayerKind, PathSpec};
use crate::resolver::{LayerHandler, Resolver};
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};

/// Handler for `FAKE` chains
///
/// Files are registered up front and snapshotted when a stream is opened, so
/// replacing a file does not affect streams already held by the context.
#[derive(Default)]
pub struct FakeHandler {
    files: DashMap<String, Bytes, RandomState>,
}

impl FakeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the data at `location`
    pub fn add_file<S: Into<String>, B: Into<Bytes>>(&self, location: S, data: B) {
        self.files.insert(location.into(), data.into());
    }

    /// Remove the data at `location`, returning it
    pub fn remove_file(&self, location: &str) -> Option<Bytes> {
        self.files.remove(location).map(|(_, data)| data)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.files.contains_key(location)
    }

    /// Registered locations, sorted
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self.files.iter().map(|e| e.key().clone()).collect();
        locations.sort();
        locations
    }
}

impl LayerHandler for FakeHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::Fake
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        _resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        let location = path_spec.location().ok_or_else(|| {
            VfsError::InvalidSpec("FAKE path specification requires a location".into())
        })?;
        let data = self
            .files
            .get(location)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| VfsError::NotFound(format!("no fake file at {}", location)))?;
        Ok(Arc::new(MemoryStream::new(LayerKind::Fake, data)))
    }
}

/// Byte stream over an in-memory buffer
pub struct MemoryStream {
    kind: LayerKind,
    data: Bytes,
}

impl MemoryStream {
    pub fn new(kind: LayerKind, data: Bytes) -> Self {
        Self { kind, data }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl ByteStream for MemoryStream {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let len = self.data.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let start = offset as usize;
        let count = buf.len().min(self.data.len() - start);
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        Ok(count)
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.data.len() as u64)
    }
}
