/*!
 * Layered VFS Library
 * Chain-addressed access to data nested inside layered storage formats
 *
 * A [`PathSpec`] chain names an object by the layers it is nested in, from a
 * root origin down to the object itself. A [`Resolver`] opens chains through
 * per-kind [`LayerHandler`]s and shares every opened layer through a
 * refcounted [`Context`].
 */

pub mod core;
pub mod decoders;
pub mod handlers;
pub mod init;
pub mod monitoring;
pub mod path;
pub mod resolver;
pub mod vfs;

// Re-exports
pub use crate::core::{limits, ResolverConfig};
pub use handlers::BuiltinHandlers;
pub use init::init_resolver;
pub use monitoring::init_tracing;
pub use path::{EncodingMethod, LayerKind, PathSpec, PathSpecBuilder};
pub use resolver::{
    ByteStreamHandle, Context, FileSystemHandle, LayerHandler, Registry, RegistryBuilder, Resolver,
};
pub use vfs::{
    ByteStream, EntryStat, FileEntry, FileSystem, FileType, StreamReader, VShadowFileSystem,
    VfsError, VfsResult,
};
