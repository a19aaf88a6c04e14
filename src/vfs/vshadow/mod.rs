/*!
 * Store Volume Layer
 * Snapshot-store volumes exposed as a directory of numbered stores
 */

mod file_system;
pub mod location;
mod stream;
mod volume;

pub use file_system::VShadowFileSystem;
pub use location::{store_index_from_location, store_location, store_name};
pub use stream::StoreStream;
pub use volume::{StoreDescriptor, StoreVolume, StoreVolumeDecoder};
