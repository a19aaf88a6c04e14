/*!
 * Concurrency Stress Tests
 * Many threads opening the same chains through one shared context
 */

use layered_vfs::{
    init_resolver, BuiltinHandlers, ByteStream, LayerHandler, LayerKind, PathSpec, Resolver,
    ResolverConfig, VfsResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::common::{store_image, IMAGE_LOCATION};

const CONCURRENT_OPENS: usize = 64;

/// Raw-image handler that counts constructions and constructs slowly
struct SlowRawHandler {
    constructed: Arc<AtomicUsize>,
}

struct PassThrough {
    parent: layered_vfs::ByteStreamHandle,
}

impl ByteStream for PassThrough {
    fn kind(&self) -> LayerKind {
        LayerKind::Raw
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        self.parent.read_at(offset, buf)
    }

    fn size(&self) -> VfsResult<u64> {
        self.parent.size()
    }
}

impl LayerHandler for SlowRawHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::Raw
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn new_byte_stream(&self, path_spec: &PathSpec, resolver: &Resolver) -> VfsResult<Arc<dyn ByteStream>> {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        let parent = path_spec.parent().map(|p| resolver.open_byte_stream(p)).transpose()?;
        match parent {
            Some(parent) => Ok(Arc::new(PassThrough { parent })),
            None => Err(layered_vfs::VfsError::InvalidSpec("RAW requires a parent".into())),
        }
    }
}

fn resolver(constructed: &Arc<AtomicUsize>) -> (Resolver, BuiltinHandlers) {
    let builtins = BuiltinHandlers::new();
    builtins.fake().add_file(IMAGE_LOCATION, store_image(4));
    let mut handlers = builtins.handlers();
    handlers.push(Arc::new(SlowRawHandler {
        constructed: Arc::clone(constructed),
    }));
    (init_resolver(handlers, ResolverConfig::default()).unwrap(), builtins)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_opens_construct_once() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let (resolver, _builtins) = resolver(&constructed);
    let raw = PathSpec::layer(LayerKind::Raw, &PathSpec::fake(IMAGE_LOCATION).unwrap()).unwrap();

    let mut tasks = Vec::with_capacity(CONCURRENT_OPENS);
    for _ in 0..CONCURRENT_OPENS {
        let resolver = resolver.clone();
        let raw = raw.clone();
        tasks.push(tokio::task::spawn_blocking(move || resolver.open_byte_stream(&raw)));
    }

    let mut handles = Vec::with_capacity(CONCURRENT_OPENS);
    for task in tasks {
        handles.push(task.await.unwrap().unwrap());
    }

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(handles.iter().all(|h| h.shares_instance(&handles[0])));
    assert_eq!(
        resolver.context().byte_streams().ref_count(&raw),
        Some(CONCURRENT_OPENS)
    );

    for handle in handles {
        handle.release().unwrap();
    }
    assert!(resolver.context().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_store_file_systems() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let (resolver, _builtins) = resolver(&constructed);
    let raw = PathSpec::layer(LayerKind::Raw, &PathSpec::fake(IMAGE_LOCATION).unwrap()).unwrap();
    let volume = PathSpec::vshadow_location("/", &raw).unwrap();
    let success = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::with_capacity(CONCURRENT_OPENS);
    for i in 0..CONCURRENT_OPENS {
        let resolver = resolver.clone();
        let volume = volume.clone();
        let raw = raw.clone();
        let success = Arc::clone(&success);
        tasks.push(tokio::task::spawn_blocking(move || {
            let fs = resolver.open_file_system(&volume).unwrap();
            let store = PathSpec::vshadow_store((i % 4) as u32, &raw).unwrap();
            let entry = fs.get_file_entry_by_path_spec(&store).unwrap().unwrap();
            let stream = entry.open_byte_stream(&resolver).unwrap();
            if stream.size().unwrap() > 0 {
                success.fetch_add(1, Ordering::Relaxed);
            }
            stream.release().unwrap();
            fs.release().unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(success.load(Ordering::Relaxed), CONCURRENT_OPENS);
    assert!(resolver.context().is_empty());
}
