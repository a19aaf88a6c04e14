/*!
 * Store Stream
 * Byte stream over the data of a single store
 */

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

use super::location::store_index_from_location;
use super::volume::{StoreDescriptor, StoreVolume, StoreVolumeDecoder};
use crate::core::limits::STORE_ROOT_LOCATION;
use crate::path::{LayerKind, PathSpec};
use crate::resolver::{ByteStreamHandle, Resolver};
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};

struct OpenStore {
    volume: Arc<dyn StoreVolume>,
    backing: ByteStreamHandle,
}

/// Byte stream of one store
pub struct StoreStream {
    descriptor: StoreDescriptor,
    state: RwLock<Option<OpenStore>>,
}

impl StoreStream {
    /// Open the store addressed by `path_spec`
    ///
    /// The store is selected by `store_index`, or failing that by a `/vssN`
    /// location. The root location and out-of-range stores cannot be opened.
    pub fn open(
        path_spec: &PathSpec,
        resolver: &Resolver,
        decoder: &dyn StoreVolumeDecoder,
    ) -> VfsResult<Self> {
        let index = requested_store_index(path_spec)?;
        let parent = path_spec.parent().ok_or_else(|| {
            VfsError::InvalidSpec("store path specification requires a parent".into())
        })?;

        let backing = resolver.open_byte_stream(parent)?;
        let opened = decoder
            .open(Arc::clone(backing.instance()))
            .and_then(|volume| {
                let descriptor = volume.store(index).cloned();
                match descriptor {
                    Some(descriptor) => Ok((volume, descriptor)),
                    None => Err(VfsError::NotFound(format!(
                        "store index {} out of range ({} stores)",
                        index,
                        volume.number_of_stores()
                    ))),
                }
            });

        match opened {
            Ok((volume, descriptor)) => Ok(Self {
                descriptor,
                state: RwLock::new(Some(OpenStore { volume, backing })),
            }),
            Err(e) => {
                if let Err(release) = backing.release() {
                    warn!(error = %release, store = index, "Failed to release store backing stream");
                }
                Err(e)
            }
        }
    }

    pub fn descriptor(&self) -> &StoreDescriptor {
        &self.descriptor
    }
}

impl ByteStream for StoreStream {
    fn kind(&self) -> LayerKind {
        LayerKind::VShadow
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let state = self.state.read();
        let open = state
            .as_ref()
            .ok_or_else(|| VfsError::NotOpen("store stream".into()))?;
        open.volume
            .read_store_at(self.descriptor.index, offset, buf)
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.descriptor.size)
    }

    fn close(&self) {
        if let Some(open) = self.state.write().take() {
            drop(open.volume);
            if let Err(e) = open.backing.release() {
                warn!(error = %e, store = self.descriptor.index, "Failed to release store backing stream");
            }
        }
    }
}

fn requested_store_index(path_spec: &PathSpec) -> VfsResult<u32> {
    if let Some(index) = path_spec.store_index() {
        return Ok(index);
    }
    match path_spec.location() {
        Some(STORE_ROOT_LOCATION) => Err(VfsError::IsADirectory(
            "store volume root has no data stream".into(),
        )),
        Some(location) => store_index_from_location(location).ok_or_else(|| {
            VfsError::NotFound(format!("no store at location {}", location))
        }),
        None => Err(VfsError::InvalidSpec(
            "path specification has neither a store index nor a location".into(),
        )),
    }
}
