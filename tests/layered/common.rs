/*!
 * Shared Fixtures
 */

#![allow(dead_code)]

use bytes::Bytes;
use layered_vfs::decoders::StoreTableBuilder;
use layered_vfs::monitoring::init_test_tracing;
use layered_vfs::{init_resolver, BuiltinHandlers, PathSpec, Resolver, ResolverConfig};

pub const IMAGE_LOCATION: &str = "/images/vss.img";

/// Built-in handlers plus a resolver over them
pub struct Fixture {
    pub builtins: BuiltinHandlers,
    pub resolver: Resolver,
}

impl Fixture {
    pub fn new() -> Self {
        init_test_tracing();
        let builtins = BuiltinHandlers::new();
        let resolver = init_resolver(builtins.handlers(), ResolverConfig::default()).unwrap();
        Self { builtins, resolver }
    }

    /// Register a store-table image with `count` stores named `store {i}`
    pub fn with_store_image(count: usize) -> (Self, PathSpec) {
        let fixture = Self::new();
        fixture
            .builtins
            .fake()
            .add_file(IMAGE_LOCATION, store_image(count));
        (fixture, PathSpec::fake(IMAGE_LOCATION).unwrap())
    }
}

pub fn store_data(index: usize) -> Vec<u8> {
    format!("store {index}").into_bytes()
}

pub fn store_image(count: usize) -> Bytes {
    (0..count)
        .fold(StoreTableBuilder::new(), |table, i| table.add_store(&store_data(i)))
        .build()
}
