/*!
 * Mount Points
 * Named root layer standing in for a previously registered chain
 */

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

use super::backing::BackingStream;
use crate::path::{LayerKind, PathSpec};
use crate::resolver::{LayerHandler, Resolver};
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};

/// Identifier → target chain table
pub struct MountPoints {
    mounts: DashMap<String, PathSpec, RandomState>,
}

impl MountPoints {
    pub fn new() -> Self {
        Self {
            mounts: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Mount `target` under `identifier`
    ///
    /// Targets may not contain `MOUNT` nodes, so resolving a mount never
    /// leads to another mount.
    pub fn mount<S: Into<String>>(&self, identifier: S, target: PathSpec) -> VfsResult<()> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(VfsError::InvalidSpec("mount identifier must not be empty".into()));
        }
        if target.contains_kind(LayerKind::Mount) {
            return Err(VfsError::InvalidSpec(format!(
                "mount target for {} contains a MOUNT layer",
                identifier
            )));
        }

        match self.mounts.entry(identifier) {
            Entry::Occupied(occupied) => Err(VfsError::InvalidSpec(format!(
                "mount point already exists: {}",
                occupied.key()
            ))),
            Entry::Vacant(vacant) => {
                info!(identifier = %vacant.key(), target = %target.kind(), "Mounted chain");
                vacant.insert(target);
                Ok(())
            }
        }
    }

    /// Remove the mount point, returning its target
    ///
    /// Streams already opened through the mount keep their target open.
    pub fn unmount(&self, identifier: &str) -> VfsResult<PathSpec> {
        self.mounts
            .remove(identifier)
            .map(|(_, target)| target)
            .ok_or_else(|| VfsError::NotFound(format!("mount point not found: {}", identifier)))
    }

    /// Target chain of `identifier`
    pub fn resolve(&self, identifier: &str) -> VfsResult<PathSpec> {
        self.mounts
            .get(identifier)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| VfsError::NotFound(format!("mount point not found: {}", identifier)))
    }

    pub fn is_mounted(&self, identifier: &str) -> bool {
        self.mounts.contains_key(identifier)
    }

    /// All mount points, sorted by identifier
    pub fn list_mounts(&self) -> Vec<(String, PathSpec)> {
        let mut mounts: Vec<(String, PathSpec)> = self
            .mounts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        mounts.sort_by(|a, b| a.0.cmp(&b.0));
        mounts
    }
}

impl Default for MountPoints {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler for `MOUNT` chains
pub struct MountHandler {
    mounts: Arc<MountPoints>,
}

impl MountHandler {
    pub fn new(mounts: Arc<MountPoints>) -> Self {
        Self { mounts }
    }

    pub fn mounts(&self) -> &Arc<MountPoints> {
        &self.mounts
    }
}

impl LayerHandler for MountHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::Mount
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        let identifier = path_spec.identifier().ok_or_else(|| {
            VfsError::InvalidSpec("MOUNT path specification requires an identifier".into())
        })?;
        let target = self.mounts.resolve(identifier)?;
        Ok(Arc::new(MountStream {
            backing: BackingStream::open(LayerKind::Mount, &target, resolver)?,
        }))
    }
}

/// Stream delegating to the mounted target chain
struct MountStream {
    backing: BackingStream,
}

impl ByteStream for MountStream {
    fn kind(&self) -> LayerKind {
        LayerKind::Mount
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        self.backing.read_at(offset, buf)
    }

    fn size(&self) -> VfsResult<u64> {
        self.backing.size()
    }

    fn close(&self) {
        self.backing.close();
    }
}
