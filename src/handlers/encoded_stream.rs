/*!
 * Encoded Stream Layer
 * Text-encoded parent stream decoded into memory on open
 */

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

use super::fake::MemoryStream;
use crate::core::limits::MAX_ENCODED_STREAM_SIZE;
use crate::path::{EncodingMethod, LayerKind, PathSpec};
use crate::resolver::{LayerHandler, Resolver};
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};

/// Handler for `ENCODED_STREAM` chains
///
/// The decoded data is kept in memory, so the parent chain is released as
/// soon as decoding finishes.
#[derive(Debug, Default)]
pub struct EncodedStreamHandler;

impl EncodedStreamHandler {
    pub fn new() -> Self {
        Self
    }
}

impl LayerHandler for EncodedStreamHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::EncodedStream
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        let method = path_spec.encoding_method().ok_or_else(|| {
            VfsError::InvalidSpec("ENCODED_STREAM path specification requires an encoding method".into())
        })?;
        let parent = path_spec.parent().ok_or_else(|| {
            VfsError::InvalidSpec("ENCODED_STREAM path specification requires a parent".into())
        })?;

        let backing = resolver.open_byte_stream(parent)?;
        let encoded = read_encoded(backing.instance());
        let released = backing.release();
        let encoded = encoded?;
        if let Err(e) = released {
            warn!(error = %e, "Failed to release encoded parent stream");
        }

        let decoded = decode(method, &encoded)
            .map_err(|reason| VfsError::corrupt(LayerKind::EncodedStream, path_spec, reason))?;
        debug!(method = %method, size = decoded.len(), "Decoded encoded stream");
        Ok(Arc::new(MemoryStream::new(
            LayerKind::EncodedStream,
            Bytes::from(decoded),
        )))
    }
}

fn read_encoded(stream: &Arc<dyn ByteStream>) -> VfsResult<Vec<u8>> {
    let size = stream.size()?;
    if size > MAX_ENCODED_STREAM_SIZE {
        return Err(VfsError::Io(format!(
            "encoded stream of {} bytes exceeds the {} byte limit",
            size, MAX_ENCODED_STREAM_SIZE
        )));
    }
    stream.read_all()
}

/// Decode `data`, ignoring ASCII whitespace such as line breaks
pub fn decode(method: EncodingMethod, data: &[u8]) -> Result<Vec<u8>, String> {
    let compact: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    match method {
        EncodingMethod::Base16 => hex::decode(&compact).map_err(|e| format!("invalid base16 data: {e}")),
        EncodingMethod::Base64 => STANDARD
            .decode(&compact)
            .map_err(|e| format!("invalid base64 data: {e}")),
    }
}
