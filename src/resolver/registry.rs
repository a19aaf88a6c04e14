/*!
 * Layer Handler Registry
 * Two-phase registration: a mutable builder, then an immutable registry
 */

use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::handler::LayerHandler;
use crate::path::LayerKind;
use crate::vfs::types::{VfsError, VfsResult};

/// Registration phase of the handler registry
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<LayerKind, Arc<dyn LayerHandler>, RandomState>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`
    ///
    /// Fails with `AlreadyRegistered` if the kind already has a handler, and
    /// with `InvalidSpec` if the handler serves a different kind.
    pub fn register(&mut self, kind: LayerKind, handler: Arc<dyn LayerHandler>) -> VfsResult<()> {
        if handler.kind() != kind {
            return Err(VfsError::InvalidSpec(format!(
                "handler for {} cannot be registered as {}",
                handler.kind(),
                kind
            )));
        }
        if self.handlers.contains_key(&kind) {
            return Err(VfsError::AlreadyRegistered(kind));
        }
        self.handlers.insert(kind, handler);
        Ok(())
    }

    /// Chaining form of [`RegistryBuilder::register`] keyed by the handler's kind
    pub fn with_handler(mut self, handler: Arc<dyn LayerHandler>) -> VfsResult<Self> {
        let kind = handler.kind();
        self.register(kind, handler)?;
        Ok(self)
    }

    /// Finish registration
    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
        }
    }
}

/// Immutable kind → handler table
///
/// Built once during initialization and shared read-only afterwards, so
/// lookups take no locks.
pub struct Registry {
    handlers: HashMap<LayerKind, Arc<dyn LayerHandler>, RandomState>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Handler for `kind`, or `UnsupportedKind`
    pub fn lookup(&self, kind: LayerKind) -> VfsResult<&Arc<dyn LayerHandler>> {
        self.handlers
            .get(&kind)
            .ok_or_else(|| VfsError::UnsupportedKind {
                kind,
                reason: "no handler registered".into(),
            })
    }

    #[must_use]
    pub fn contains(&self, kind: LayerKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Registered kinds, sorted
    #[must_use]
    pub fn kinds(&self) -> Vec<LayerKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry").field("kinds", &self.kinds()).finish()
    }
}
