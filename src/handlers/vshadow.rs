/*!
 * Store Volume Handler
 * Registers store-volume file systems and store streams for `VSHADOW` chains
 */

use std::sync::Arc;

use crate::path::{LayerKind, PathSpec};
use crate::resolver::{LayerHandler, Resolver};
use crate::vfs::traits::{ByteStream, FileSystem};
use crate::vfs::types::VfsResult;
use crate::vfs::vshadow::{StoreStream, StoreVolumeDecoder, VShadowFileSystem};

/// Handler for `VSHADOW` chains
pub struct VShadowHandler {
    decoder: Arc<dyn StoreVolumeDecoder>,
}

impl VShadowHandler {
    pub fn new(decoder: Arc<dyn StoreVolumeDecoder>) -> Self {
        Self { decoder }
    }
}

impl LayerHandler for VShadowHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::VShadow
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn supports_file_system(&self) -> bool {
        true
    }

    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        Ok(Arc::new(StoreStream::open(
            path_spec,
            resolver,
            self.decoder.as_ref(),
        )?))
    }

    fn new_file_system(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn FileSystem>> {
        let file_system = VShadowFileSystem::new(resolver.clone(), Arc::clone(&self.decoder));
        file_system.open(path_spec)?;
        Ok(Arc::new(file_system))
    }
}
