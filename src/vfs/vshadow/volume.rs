/*!
 * Store Volume Capability
 * Narrow interface to an external snapshot-store decoder
 */

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::vfs::traits::ByteStream;
use crate::vfs::types::VfsResult;

/// Descriptor of one store inside a volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDescriptor {
    /// Zero-based store index
    pub index: u32,
    pub identifier: Uuid,
    /// Byte offset of the store data within the backing stream
    pub offset: u64,
    pub size: u64,
}

/// Opened snapshot-store volume
pub trait StoreVolume: Send + Sync {
    /// Stores in index order; `stores()[i].index == i`
    fn stores(&self) -> &[StoreDescriptor];

    /// Read store data at `offset` relative to the store start
    fn read_store_at(&self, index: u32, offset: u64, buf: &mut [u8]) -> VfsResult<usize>;

    fn number_of_stores(&self) -> u32 {
        self.stores().len() as u32
    }

    fn store(&self, index: u32) -> Option<&StoreDescriptor> {
        self.stores().get(index as usize)
    }
}

/// Factory opening a store volume over a backing byte stream
///
/// Failures for unreadable or corrupt headers are reported as errors and are
/// turned into backing resource errors by the caller.
pub trait StoreVolumeDecoder: Send + Sync {
    fn open(&self, backing: Arc<dyn ByteStream>) -> VfsResult<Arc<dyn StoreVolume>>;
}
