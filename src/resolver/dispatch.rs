/*!
 * Resolver
 * Opens chains through the registry, sharing instances via the context
 */

use std::sync::Arc;
use tracing::debug;

use super::context::{Context, Resource};
use super::handle::{ByteStreamHandle, CachedHandle, FileSystemHandle};
use super::handler::LayerHandler;
use super::registry::Registry;
use crate::core::config::ResolverConfig;
use crate::monitoring::span_operation;
use crate::path::PathSpec;
use crate::vfs::traits::{ByteStream, FileSystem};
use crate::vfs::types::{VfsError, VfsResult};

/// Entry point for opening byte streams and file systems from chains
///
/// Cloning is cheap; clones share the registry and the context. Handlers
/// receive the resolver during construction to open their parent chain.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
    context: Arc<Context>,
    config: Arc<ResolverConfig>,
}

impl Resolver {
    /// Resolver with a fresh context and default configuration
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// Resolver with a fresh context
    pub fn with_config(registry: Registry, config: ResolverConfig) -> Self {
        let context = Arc::new(Context::with_config(&config));
        Self::with_context(Arc::new(registry), context, config)
    }

    /// Resolver bound to an existing context
    pub fn with_context(
        registry: Arc<Registry>,
        context: Arc<Context>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            registry,
            context,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Open the byte stream addressed by `path_spec`
    pub fn open_byte_stream(&self, path_spec: &PathSpec) -> VfsResult<ByteStreamHandle> {
        self.open::<dyn ByteStream, _, _>(
            path_spec,
            "open_byte_stream",
            |handler| handler.supports_byte_stream(),
            |handler| handler.new_byte_stream(path_spec, self),
        )
    }

    /// Open the file system addressed by `path_spec`
    pub fn open_file_system(&self, path_spec: &PathSpec) -> VfsResult<FileSystemHandle> {
        self.open::<dyn FileSystem, _, _>(
            path_spec,
            "open_file_system",
            |handler| handler.supports_file_system(),
            |handler| handler.new_file_system(path_spec, self),
        )
    }

    fn open<T, S, C>(
        &self,
        path_spec: &PathSpec,
        operation: &'static str,
        supported: S,
        construct: C,
    ) -> VfsResult<CachedHandle<T>>
    where
        T: ?Sized + Resource,
        S: FnOnce(&dyn LayerHandler) -> bool,
        C: FnOnce(&dyn LayerHandler) -> VfsResult<Arc<T>>,
    {
        let span = span_operation(operation, path_spec);
        let _entered = span.enter();

        if path_spec.depth() > self.config.max_chain_depth {
            return Err(VfsError::InvalidSpec(format!(
                "chain depth {} exceeds configured maximum {}",
                path_spec.depth(),
                self.config.max_chain_depth
            )));
        }

        let kind = path_spec.kind();
        let handler = self.registry.lookup(kind)?;
        if !supported(handler.as_ref()) {
            return Err(VfsError::UnsupportedKind {
                kind,
                reason: format!("layer does not provide a {}", T::LABEL),
            });
        }

        let cache = T::cache(&self.context);
        let _lock = cache.lock_chain(path_spec);

        if let Some(instance) = cache.acquire(path_spec) {
            span.record_hit(true);
            return Ok(self.handle(instance, path_spec));
        }
        span.record_hit(false);

        debug!(kind = %kind, resource = T::LABEL, "Context cache miss, constructing");
        let instance = construct(handler.as_ref())
            .map_err(|e| VfsError::backing(kind, path_spec, e))?;

        if let Err(e) = cache.insert(path_spec.clone(), Arc::clone(&instance)) {
            instance.teardown();
            return Err(e);
        }
        Ok(self.handle(instance, path_spec))
    }

    fn handle<T: ?Sized + Resource>(&self, instance: Arc<T>, path_spec: &PathSpec) -> CachedHandle<T> {
        CachedHandle::new(instance, path_spec.clone(), Arc::clone(&self.context))
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", &self.registry)
            .field("held", &self.context.len())
            .field("config", &self.config)
            .finish()
    }
}
