/*!
 * Resolver Module
 * Handler registry, refcounted instance context and chain resolution
 */

mod context;
mod dispatch;
mod handle;
mod handler;
mod registry;

// Re-exports
pub use context::{Context, ObjectCache, Resource};
pub use dispatch::Resolver;
pub use handle::{ByteStreamHandle, CachedHandle, FileSystemHandle, Shared};
pub use handler::LayerHandler;
pub use registry::{Registry, RegistryBuilder};
