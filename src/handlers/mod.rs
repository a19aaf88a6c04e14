/*!
 * Layer Handlers
 * Built-in handlers for root, transform and store-volume layers
 */

mod backing;
mod data_range;
mod encoded_stream;
mod fake;
mod mount;
mod os;
mod vshadow;

pub use data_range::{DataRangeHandler, DataRangeStream};
pub use encoded_stream::{decode as decode_encoded, EncodedStreamHandler};
pub use fake::{FakeHandler, MemoryStream};
pub use mount::{MountHandler, MountPoints};
pub use os::{OsFileStream, OsHandler};
pub use vshadow::VShadowHandler;

use std::sync::Arc;

use crate::decoders::StoreTableDecoder;
use crate::resolver::LayerHandler;
use crate::vfs::vshadow::StoreVolumeDecoder;

/// The built-in handler set, with access to the stateful handlers
///
/// # Example
///
/// ```rust
/// use layered_vfs::{init_resolver, BuiltinHandlers, PathSpec, ResolverConfig};
///
/// let builtins = BuiltinHandlers::new();
/// builtins.fake().add_file("/hello", &b"hello"[..]);
/// let resolver = init_resolver(builtins.handlers(), ResolverConfig::default()).unwrap();
///
/// let stream = resolver.open_byte_stream(&PathSpec::fake("/hello").unwrap()).unwrap();
/// assert_eq!(stream.size().unwrap(), 5);
/// stream.release().unwrap();
/// ```
pub struct BuiltinHandlers {
    fake: Arc<FakeHandler>,
    mounts: Arc<MountPoints>,
    store_decoder: Arc<dyn StoreVolumeDecoder>,
}

impl BuiltinHandlers {
    /// Built-ins with the store-table decoder serving store volumes
    pub fn new() -> Self {
        Self::with_store_decoder(Arc::new(StoreTableDecoder::new()))
    }

    pub fn with_store_decoder(store_decoder: Arc<dyn StoreVolumeDecoder>) -> Self {
        Self {
            fake: Arc::new(FakeHandler::new()),
            mounts: Arc::new(MountPoints::new()),
            store_decoder,
        }
    }

    pub fn fake(&self) -> &Arc<FakeHandler> {
        &self.fake
    }

    pub fn mounts(&self) -> &Arc<MountPoints> {
        &self.mounts
    }

    pub fn store_decoder(&self) -> Arc<dyn StoreVolumeDecoder> {
        Arc::clone(&self.store_decoder)
    }

    /// One handler per built-in kind, ready for registration
    pub fn handlers(&self) -> Vec<Arc<dyn LayerHandler>> {
        vec![
            Arc::new(OsHandler::new()),
            self.fake.clone(),
            Arc::new(MountHandler::new(Arc::clone(&self.mounts))),
            Arc::new(DataRangeHandler::new()),
            Arc::new(EncodedStreamHandler::new()),
            Arc::new(VShadowHandler::new(Arc::clone(&self.store_decoder))),
        ]
    }
}

impl Default for BuiltinHandlers {
    fn default() -> Self {
        Self::new()
    }
}
