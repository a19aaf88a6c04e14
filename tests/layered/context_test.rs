/*!
 * Context Tests
 * Refcounting, eviction and teardown of cached instances
 */

use layered_vfs::{ByteStream, Context, LayerKind, PathSpec, VfsError, VfsResult};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Probe {
    closes: Arc<AtomicUsize>,
}

impl ByteStream for Probe {
    fn kind(&self) -> LayerKind {
        LayerKind::Fake
    }

    fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> VfsResult<usize> {
        Ok(0)
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(0)
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn counting_stream(closes: &Arc<AtomicUsize>) -> Arc<dyn ByteStream> {
    Arc::new(Probe {
        closes: Arc::clone(closes),
    })
}

#[test]
fn test_distinct_chains_hold_distinct_instances() {
    let context = Context::new();
    let closes = Arc::new(AtomicUsize::new(0));
    let a = PathSpec::fake("/a").unwrap();
    let b = PathSpec::vshadow_store(0, &a).unwrap();

    context.byte_streams().insert(a.clone(), counting_stream(&closes)).unwrap();
    context.byte_streams().insert(b.clone(), counting_stream(&closes)).unwrap();

    let from_a = context.byte_streams().acquire(&a).unwrap();
    let from_b = context.byte_streams().acquire(&b).unwrap();
    assert!(!Arc::ptr_eq(&from_a, &from_b));

    for spec in [&a, &a, &b, &b] {
        context.byte_streams().release(spec).unwrap();
    }
    assert!(context.is_empty());
    assert_eq!(closes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_release_after_eviction_fails() {
    let context = Context::new();
    let closes = Arc::new(AtomicUsize::new(0));
    let spec = PathSpec::fake("/a").unwrap();

    context.byte_streams().insert(spec.clone(), counting_stream(&closes)).unwrap();
    context.byte_streams().release(&spec).unwrap();
    assert!(matches!(
        context.byte_streams().release(&spec),
        Err(VfsError::NotFound(_))
    ));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

proptest! {
    #[test]
    fn prop_matching_releases_evict(extra_acquires in 0usize..32) {
        let context = Context::new();
        let closes = Arc::new(AtomicUsize::new(0));
        let spec = PathSpec::fake("/prop").unwrap();
        let original = counting_stream(&closes);
        context.byte_streams().insert(spec.clone(), Arc::clone(&original)).unwrap();

        for _ in 0..extra_acquires {
            let shared = context.byte_streams().acquire(&spec).unwrap();
            prop_assert!(Arc::ptr_eq(&shared, &original));
        }
        prop_assert_eq!(context.byte_streams().ref_count(&spec), Some(extra_acquires + 1));

        for _ in 0..extra_acquires {
            context.byte_streams().release(&spec).unwrap();
            prop_assert_eq!(closes.load(Ordering::SeqCst), 0);
        }
        context.byte_streams().release(&spec).unwrap();
        prop_assert!(context.is_empty());
        prop_assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
