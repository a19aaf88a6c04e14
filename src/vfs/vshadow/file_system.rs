/*!
 * Store Volume File System
 * Virtual directory of the stores inside a snapshot-store volume
 */

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use super::location::{store_index_from_location, store_name};
use super::volume::{StoreVolume, StoreVolumeDecoder};
use crate::core::limits::STORE_ROOT_LOCATION;
use crate::path::{LayerKind, PathSpec};
use crate::resolver::{ByteStreamHandle, Resolver};
use crate::vfs::traits::FileSystem;
use crate::vfs::types::*;

/// State held while the file system is open
struct OpenVolume {
    path_spec: PathSpec,
    backing: ByteStreamHandle,
    volume: Arc<dyn StoreVolume>,
    store_count: u32,
}

impl OpenVolume {
    /// Chain of the volume the stores live in
    fn backing_spec(&self) -> &PathSpec {
        self.backing.path_spec()
    }

    fn root_entry(&self) -> VfsResult<FileEntry> {
        let spec = PathSpec::vshadow_location(STORE_ROOT_LOCATION, self.backing_spec())?;
        Ok(FileEntry::root(spec))
    }

    fn store_entry(&self, index: u32) -> VfsResult<Option<FileEntry>> {
        if index >= self.store_count {
            return Ok(None);
        }
        let Some(descriptor) = self.volume.store(index) else {
            return Ok(None);
        };
        let spec = PathSpec::vshadow_store(index, self.backing_spec())?;
        let stat = EntryStat::file(descriptor.size, Some(descriptor.identifier));
        Ok(Some(FileEntry::indexed(store_name(index), spec, index, stat)))
    }
}

/// File system over the stores of a snapshot-store volume
///
/// The root entry (`/`) is a virtual directory; each store `i` is a file entry
/// named `vss{i+1}` at location `/vss{i+1}`. The store count is read once on
/// open and stays fixed until close.
pub struct VShadowFileSystem {
    resolver: Resolver,
    decoder: Arc<dyn StoreVolumeDecoder>,
    state: RwLock<Option<OpenVolume>>,
}

impl VShadowFileSystem {
    pub fn new(resolver: Resolver, decoder: Arc<dyn StoreVolumeDecoder>) -> Self {
        Self {
            resolver,
            decoder,
            state: RwLock::new(None),
        }
    }

    /// Number of stores, `None` while closed
    pub fn store_count(&self) -> Option<u32> {
        self.state.read().as_ref().map(|open| open.store_count)
    }

    /// Chain the file system was opened with, `None` while closed
    pub fn path_spec(&self) -> Option<PathSpec> {
        self.state.read().as_ref().map(|open| open.path_spec.clone())
    }

    fn not_open() -> VfsError {
        VfsError::NotOpen("store volume file system".into())
    }
}

impl FileSystem for VShadowFileSystem {
    fn kind(&self) -> LayerKind {
        LayerKind::VShadow
    }

    fn open(&self, path_spec: &PathSpec) -> VfsResult<()> {
        let mut state = self.state.write();
        if let Some(ref open) = *state {
            return Err(VfsError::AlreadyOpen(open.path_spec.to_string()));
        }

        if path_spec.kind() != LayerKind::VShadow {
            return Err(VfsError::InvalidSpec(format!(
                "store volume file system cannot open a {} path specification",
                path_spec.kind()
            )));
        }
        let parent = path_spec.parent().ok_or_else(|| {
            VfsError::InvalidSpec("store volume path specification requires a parent".into())
        })?;

        let backing = self
            .resolver
            .open_byte_stream(parent)
            .map_err(|e| VfsError::backing(parent.kind(), parent, e))?;

        let volume = match self.decoder.open(Arc::clone(backing.instance())) {
            Ok(volume) => volume,
            Err(e) => {
                // Dropping hands the backing chain back and logs a failed release
                drop(backing);
                return Err(VfsError::backing(LayerKind::VShadow, path_spec, e));
            }
        };

        let store_count = volume.number_of_stores();
        info!(
            store_count = store_count,
            backing = %parent.kind(),
            "Opened store volume file system"
        );

        *state = Some(OpenVolume {
            path_spec: path_spec.clone(),
            backing,
            volume,
            store_count,
        });
        Ok(())
    }

    fn close(&self) -> VfsResult<()> {
        let Some(open) = self.state.write().take() else {
            return Ok(());
        };
        let OpenVolume {
            backing, volume, ..
        } = open;
        drop(volume);
        debug!("Closing store volume file system");
        backing.release()
    }

    fn is_open(&self) -> bool {
        self.state.read().is_some()
    }

    fn get_file_entry_by_path_spec(&self, path_spec: &PathSpec) -> VfsResult<Option<FileEntry>> {
        let state = self.state.read();
        let open = state.as_ref().ok_or_else(Self::not_open)?;

        if path_spec.kind() != LayerKind::VShadow {
            return Err(VfsError::InvalidSpec(format!(
                "cannot look up a {} path specification in a store volume",
                path_spec.kind()
            )));
        }

        if let Some(index) = path_spec.store_index() {
            return open.store_entry(index);
        }

        match path_spec.location() {
            Some(STORE_ROOT_LOCATION) => open.root_entry().map(Some),
            Some(location) => match store_index_from_location(location) {
                Some(index) => open.store_entry(index),
                None => Ok(None),
            },
            None => Err(VfsError::InvalidSpec(
                "path specification has neither a store index nor a location".into(),
            )),
        }
    }

    fn get_root_file_entry(&self) -> VfsResult<FileEntry> {
        let state = self.state.read();
        let open = state.as_ref().ok_or_else(Self::not_open)?;
        open.root_entry()
    }

    fn sub_file_entries(&self, entry: &FileEntry) -> VfsResult<Vec<FileEntry>> {
        let state = self.state.read();
        let open = state.as_ref().ok_or_else(Self::not_open)?;

        if !entry.is_root() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::with_capacity(open.store_count as usize);
        for index in 0..open.store_count {
            if let Some(store) = open.store_entry(index)? {
                entries.push(store);
            }
        }
        Ok(entries)
    }

    fn name(&self) -> &str {
        "vshadow"
    }
}
