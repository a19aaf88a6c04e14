/*!
 * Host File Layer
 * Root layer reading files from the host operating system
 */

use parking_lot::Mutex;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::debug;

use crate::path::{LayerKind, PathSpec};
use crate::resolver::{LayerHandler, Resolver};
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};

/// Handler for `OS` chains
#[derive(Debug, Default)]
pub struct OsHandler;

impl OsHandler {
    pub fn new() -> Self {
        Self
    }
}

impl LayerHandler for OsHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::Os
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        _resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        let location = path_spec
            .location()
            .ok_or_else(|| VfsError::InvalidSpec("OS path specification requires a location".into()))?;
        Ok(Arc::new(OsFileStream::open(location)?))
    }
}

/// Read-only host file
pub struct OsFileStream {
    location: String,
    size: u64,
    file: Mutex<Option<File>>,
}

impl OsFileStream {
    pub fn open(location: &str) -> VfsResult<Self> {
        let file = File::open(location).map_err(|e| io_error(e, location))?;
        let metadata = file.metadata().map_err(|e| io_error(e, location))?;
        if metadata.is_dir() {
            return Err(VfsError::IsADirectory(location.to_string()));
        }
        debug!(location = %location, size = metadata.len(), "Opened host file");
        Ok(Self {
            location: location.to_string(),
            size: metadata.len(),
            file: Mutex::new(Some(file)),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl ByteStream for OsFileStream {
    fn kind(&self) -> LayerKind {
        LayerKind::Os
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        if offset >= self.size || buf.is_empty() {
            return Ok(0);
        }
        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| VfsError::NotOpen(format!("host file {}", self.location)))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| io_error(e, &self.location))?;
        file.read(buf).map_err(|e| io_error(e, &self.location))
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.size)
    }

    fn close(&self) {
        self.file.lock().take();
    }
}

/// Convert std::io::Error to VfsError
fn io_error(e: std::io::Error, location: &str) -> VfsError {
    match e.kind() {
        ErrorKind::NotFound => VfsError::NotFound(location.to_string()),
        _ => VfsError::Io(format!("{}: {}", location, e)),
    }
}
