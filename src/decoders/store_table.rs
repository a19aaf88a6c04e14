/*!
 * Store Table Volumes
 *
 * Minimal snapshot-store container: a fixed header listing each store's
 * identifier and byte range, followed by the store data.
 *
 * Layout (little endian):
 * - magic `LVFSSTOR` (8 bytes), version `u32`, store count `u32`
 * - per store: identifier (16 bytes), data offset `u64`, data size `u64`
 */

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::limits::MAX_STORES_PER_VOLUME;
use crate::path::LayerKind;
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};
use crate::vfs::vshadow::{StoreDescriptor, StoreVolume, StoreVolumeDecoder};

pub const STORE_TABLE_MAGIC: &[u8; 8] = b"LVFSSTOR";
pub const STORE_TABLE_VERSION: u32 = 1;

const HEADER_SIZE: usize = 16;
const DESCRIPTOR_SIZE: usize = 32;

/// Decoder for store-table volumes
#[derive(Debug, Default)]
pub struct StoreTableDecoder;

impl StoreTableDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl StoreVolumeDecoder for StoreTableDecoder {
    fn open(&self, backing: Arc<dyn ByteStream>) -> VfsResult<Arc<dyn StoreVolume>> {
        let volume_size = backing.size()?;
        if volume_size < HEADER_SIZE as u64 {
            return Err(corrupt(format!(
                "volume of {} bytes is smaller than the header",
                volume_size
            )));
        }

        let mut header = [0u8; HEADER_SIZE];
        backing.read_exact_at(0, &mut header)?;
        let mut cursor = &header[..];

        if &cursor[..8] != STORE_TABLE_MAGIC {
            return Err(corrupt("missing store table signature"));
        }
        cursor.advance(8);

        let version = cursor.get_u32_le();
        if version != STORE_TABLE_VERSION {
            return Err(corrupt(format!("unsupported store table version {}", version)));
        }

        let count = cursor.get_u32_le();
        if count > MAX_STORES_PER_VOLUME {
            return Err(corrupt(format!(
                "store count {} exceeds the limit of {}",
                count, MAX_STORES_PER_VOLUME
            )));
        }

        let table_len = count as usize * DESCRIPTOR_SIZE;
        let mut table = vec![0u8; table_len];
        backing
            .read_exact_at(HEADER_SIZE as u64, &mut table)
            .map_err(|_| corrupt("store table is truncated"))?;

        let mut cursor = &table[..];
        let mut stores = Vec::with_capacity(count as usize);
        for index in 0..count {
            let mut identifier = [0u8; 16];
            cursor.copy_to_slice(&mut identifier);
            let offset = cursor.get_u64_le();
            let size = cursor.get_u64_le();

            let in_bounds = offset
                .checked_add(size)
                .is_some_and(|end| end <= volume_size);
            if !in_bounds {
                return Err(corrupt(format!(
                    "store {} range 0x{:08x}+{} exceeds volume of {} bytes",
                    index, offset, size, volume_size
                )));
            }

            stores.push(StoreDescriptor {
                index,
                identifier: Uuid::from_bytes(identifier),
                offset,
                size,
            });
        }

        debug!(store_count = count, volume_size = volume_size, "Decoded store table");
        Ok(Arc::new(StoreTableVolume { backing, stores }))
    }
}

fn corrupt(reason: impl Into<String>) -> VfsError {
    VfsError::corrupt(LayerKind::VShadow, "store table", reason)
}

/// Opened store-table volume
struct StoreTableVolume {
    backing: Arc<dyn ByteStream>,
    stores: Vec<StoreDescriptor>,
}

impl StoreVolume for StoreTableVolume {
    fn stores(&self) -> &[StoreDescriptor] {
        &self.stores
    }

    fn read_store_at(&self, index: u32, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let store = self
            .store(index)
            .ok_or_else(|| VfsError::NotFound(format!("store index {} out of range", index)))?;
        if offset >= store.size {
            return Ok(0);
        }
        let available = store.size - offset;
        let count = usize::try_from(available).map_or(buf.len(), |a| a.min(buf.len()));
        self.backing.read_at(store.offset + offset, &mut buf[..count])
    }
}

/// Writer for store-table images
///
/// # Example
///
/// ```rust
/// use layered_vfs::decoders::StoreTableBuilder;
///
/// let image = StoreTableBuilder::new()
///     .add_store(b"first")
///     .add_store(b"second")
///     .build();
/// assert_eq!(&image[..8], b"LVFSSTOR");
/// ```
#[derive(Debug, Default)]
pub struct StoreTableBuilder {
    stores: Vec<(Uuid, Vec<u8>)>,
}

impl StoreTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a store with a random identifier
    pub fn add_store(self, data: &[u8]) -> Self {
        self.add_store_with_id(Uuid::new_v4(), data)
    }

    pub fn add_store_with_id(mut self, identifier: Uuid, data: &[u8]) -> Self {
        self.stores.push((identifier, data.to_vec()));
        self
    }

    pub fn build(self) -> Bytes {
        let table_len = HEADER_SIZE + self.stores.len() * DESCRIPTOR_SIZE;
        let data_len: usize = self.stores.iter().map(|(_, data)| data.len()).sum();
        let mut out = BytesMut::with_capacity(table_len + data_len);

        out.put_slice(STORE_TABLE_MAGIC);
        out.put_u32_le(STORE_TABLE_VERSION);
        out.put_u32_le(self.stores.len() as u32);

        let mut offset = table_len as u64;
        for (identifier, data) in &self.stores {
            out.put_slice(identifier.as_bytes());
            out.put_u64_le(offset);
            out.put_u64_le(data.len() as u64);
            offset += data.len() as u64;
        }
        for (_, data) in &self.stores {
            out.put_slice(data);
        }
        out.freeze()
    }
}
