/*!
 * Resolver Context
 * Reference-counted cache of opened layer instances keyed by chain identity
 */

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::ResolverConfig;
use crate::path::PathSpec;
use crate::vfs::traits::{ByteStream, FileSystem};
use crate::vfs::types::{VfsError, VfsResult};

/// Instance types the context can hold
pub trait Resource: Send + Sync + 'static {
    /// Label used in logs and errors
    const LABEL: &'static str;

    /// The cache holding instances of this type
    fn cache(context: &Context) -> &ObjectCache<Self>;

    /// Close the instance after its last reference was released
    fn teardown(&self);
}

impl Resource for dyn ByteStream {
    const LABEL: &'static str = "byte stream";

    fn cache(context: &Context) -> &ObjectCache<Self> {
        &context.byte_streams
    }

    fn teardown(&self) {
        self.close();
    }
}

impl Resource for dyn FileSystem {
    const LABEL: &'static str = "file system";

    fn cache(context: &Context) -> &ObjectCache<Self> {
        &context.file_systems
    }

    fn teardown(&self) {
        if let Err(e) = self.close() {
            warn!(error = %e, file_system = self.name(), "File system close failed during teardown");
        }
    }
}

struct CacheEntry<T: ?Sized> {
    instance: Arc<T>,
    ref_count: usize,
}

/// Refcounted map from chain identity to one shared instance
///
/// The cache never constructs instances. A miss is reported to the caller,
/// which constructs under the chain's construction lock and inserts.
pub struct ObjectCache<T: ?Sized + Resource> {
    entries: DashMap<PathSpec, CacheEntry<T>, RandomState>,
    construction_locks: DashMap<PathSpec, Arc<Mutex<()>>, RandomState>,
}

impl<T: ?Sized + Resource> ObjectCache<T> {
    fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(RandomState::new()),
            construction_locks: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Shared instance for `path_spec`, incrementing its refcount
    ///
    /// Returns `None` on a miss.
    pub fn acquire(&self, path_spec: &PathSpec) -> Option<Arc<T>> {
        let mut entry = self.entries.get_mut(path_spec)?;
        entry.ref_count += 1;
        debug!(
            resource = T::LABEL,
            kind = %path_spec.kind(),
            ref_count = entry.ref_count,
            "Context cache hit"
        );
        Some(Arc::clone(&entry.instance))
    }

    /// Store a newly constructed instance with refcount 1
    pub fn insert(&self, path_spec: PathSpec, instance: Arc<T>) -> VfsResult<()> {
        match self.entries.entry(path_spec) {
            Entry::Occupied(occupied) => Err(VfsError::DuplicateInsert(format!(
                "{} already cached for {}",
                T::LABEL,
                occupied.key()
            ))),
            Entry::Vacant(vacant) => {
                debug!(resource = T::LABEL, kind = %vacant.key().kind(), "Context cache insert");
                vacant.insert(CacheEntry {
                    instance,
                    ref_count: 1,
                });
                Ok(())
            }
        }
    }

    /// Drop one reference; at zero the entry is evicted and torn down
    pub fn release(&self, path_spec: &PathSpec) -> VfsResult<()> {
        let remaining = match self.entries.get_mut(path_spec) {
            // A zero refcount is awaiting eviction by the release that reached it
            Some(mut entry) if entry.ref_count > 0 => {
                entry.ref_count -= 1;
                entry.ref_count
            }
            _ => {
                return Err(VfsError::NotFound(format!(
                    "{} not held in context: {}",
                    T::LABEL,
                    path_spec
                )))
            }
        };

        if remaining == 0 {
            // Re-checked under the shard lock: a concurrent acquire may have revived it
            if let Some((_, entry)) = self
                .entries
                .remove_if(path_spec, |_, entry| entry.ref_count == 0)
            {
                debug!(resource = T::LABEL, kind = %path_spec.kind(), "Context cache evict");
                entry.instance.teardown();
            }
        }
        Ok(())
    }

    /// Current refcount of `path_spec`, `None` if not held
    #[must_use]
    pub fn ref_count(&self, path_spec: &PathSpec) -> Option<usize> {
        self.entries.get(path_spec).map(|entry| entry.ref_count)
    }

    #[must_use]
    pub fn contains(&self, path_spec: &PathSpec) -> bool {
        self.entries.contains_key(path_spec)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize construction for one chain identity
    ///
    /// Held across acquire → construct → insert so concurrent callers of the
    /// same chain never construct duplicates. A constructor only resolves
    /// chains that never lead back to the chain being built.
    pub(crate) fn lock_chain(&self, path_spec: &PathSpec) -> ChainLock<'_, T> {
        let lock = Arc::clone(
            self.construction_locks
                .entry(path_spec.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        ChainLock {
            guard: Some(lock.lock_arc()),
            path_spec: path_spec.clone(),
            cache: self,
        }
    }

    /// Evict and tear down every entry regardless of refcount
    fn drain(&self, warn_on_leaks: bool) -> usize {
        let keys: Vec<PathSpec> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        let mut drained = 0;
        for key in keys {
            if let Some((spec, entry)) = self.entries.remove(&key) {
                if warn_on_leaks {
                    warn!(
                        resource = T::LABEL,
                        kind = %spec.kind(),
                        ref_count = entry.ref_count,
                        path_spec = %spec,
                        "Leaked context entry at teardown"
                    );
                }
                entry.instance.teardown();
                drained += 1;
            }
        }
        drained
    }
}

/// Construction lock for one chain identity
pub(crate) struct ChainLock<'a, T: ?Sized + Resource> {
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
    path_spec: PathSpec,
    cache: &'a ObjectCache<T>,
}

impl<T: ?Sized + Resource> Drop for ChainLock<'_, T> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Forget the lock once nobody else is waiting on it
        self.cache
            .construction_locks
            .remove_if(&self.path_spec, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Process-scoped cache of opened byte streams and file systems
///
/// Holds at most one live instance per distinct chain and kind of resource.
/// The context owns every instance it holds: instances are closed when their
/// refcount drops to zero, or by [`Context::teardown`].
pub struct Context {
    byte_streams: ObjectCache<dyn ByteStream>,
    file_systems: ObjectCache<dyn FileSystem>,
    warn_on_leaks: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::with_config(&ResolverConfig::default())
    }

    pub fn with_config(config: &ResolverConfig) -> Self {
        Self {
            byte_streams: ObjectCache::new(),
            file_systems: ObjectCache::new(),
            warn_on_leaks: config.warn_on_leaks,
        }
    }

    /// Cached byte streams
    pub fn byte_streams(&self) -> &ObjectCache<dyn ByteStream> {
        &self.byte_streams
    }

    /// Cached file systems
    pub fn file_systems(&self) -> &ObjectCache<dyn FileSystem> {
        &self.file_systems
    }

    /// True iff no chain is currently held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.byte_streams.is_empty() && self.file_systems.is_empty()
    }

    /// Number of held instances of both kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.byte_streams.len() + self.file_systems.len()
    }

    /// Close everything still held, returning how many instances were closed
    ///
    /// File systems go first since they hold references to byte streams.
    pub fn teardown(&self) -> usize {
        let closed = self.file_systems.drain(self.warn_on_leaks)
            + self.byte_streams.drain(self.warn_on_leaks);
        if closed > 0 {
            debug!(closed = closed, "Context teardown closed held instances");
        }
        closed
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
