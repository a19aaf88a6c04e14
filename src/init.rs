/*!
 * Resolver Initialization
 * Two-phase startup: register handlers, freeze the registry, bind a resolver
 */

use std::sync::Arc;
use tracing::info;

use crate::core::config::ResolverConfig;
use crate::resolver::{LayerHandler, Registry, Resolver};
use crate::vfs::types::VfsResult;

/// Build a resolver over `handlers`
///
/// Handlers are constructed by the caller without any reference to the
/// resolver; they receive it per call once construction of layers begins.
/// Fails if two handlers serve the same kind or the configuration is invalid.
pub fn init_resolver<I>(handlers: I, config: ResolverConfig) -> VfsResult<Resolver>
where
    I: IntoIterator<Item = Arc<dyn LayerHandler>>,
{
    config.validate()?;

    let mut builder = Registry::builder();
    for handler in handlers {
        builder.register(handler.kind(), handler)?;
    }
    let registry = builder.build();

    info!(
        kinds = ?registry.kinds(),
        max_chain_depth = config.max_chain_depth,
        "Resolver initialized"
    );
    Ok(Resolver::with_config(registry, config))
}
