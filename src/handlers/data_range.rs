/*!
 * Data Range Layer
 * Window of `range_size` bytes at `range_offset` within the parent stream
 */

use std::sync::Arc;

use super::backing::BackingStream;
use crate::path::{LayerKind, PathSpec};
use crate::resolver::{LayerHandler, Resolver};
use crate::vfs::traits::ByteStream;
use crate::vfs::types::{VfsError, VfsResult};

/// Handler for `DATA_RANGE` chains
#[derive(Debug, Default)]
pub struct DataRangeHandler;

impl DataRangeHandler {
    pub fn new() -> Self {
        Self
    }
}

impl LayerHandler for DataRangeHandler {
    fn kind(&self) -> LayerKind {
        LayerKind::DataRange
    }

    fn supports_byte_stream(&self) -> bool {
        true
    }

    fn new_byte_stream(
        &self,
        path_spec: &PathSpec,
        resolver: &Resolver,
    ) -> VfsResult<Arc<dyn ByteStream>> {
        Ok(Arc::new(DataRangeStream::open(path_spec, resolver)?))
    }
}

/// Bounded window over a parent stream
pub struct DataRangeStream {
    offset: u64,
    size: u64,
    backing: BackingStream,
}

impl DataRangeStream {
    pub fn open(path_spec: &PathSpec, resolver: &Resolver) -> VfsResult<Self> {
        let (Some(offset), Some(size)) = (path_spec.range_offset(), path_spec.range_size()) else {
            return Err(VfsError::InvalidSpec(
                "DATA_RANGE path specification requires range offset and size".into(),
            ));
        };
        let parent = path_spec.parent().ok_or_else(|| {
            VfsError::InvalidSpec("DATA_RANGE path specification requires a parent".into())
        })?;

        let backing = BackingStream::open(LayerKind::DataRange, parent, resolver)?;
        let parent_size = match backing.size() {
            Ok(parent_size) => parent_size,
            Err(e) => {
                backing.close();
                return Err(e);
            }
        };

        let fits = offset
            .checked_add(size)
            .is_some_and(|end| end <= parent_size);
        if !fits {
            backing.close();
            return Err(VfsError::corrupt(
                LayerKind::DataRange,
                path_spec,
                format!(
                    "range 0x{:08x}+{} exceeds parent stream of {} bytes",
                    offset, size, parent_size
                ),
            ));
        }

        Ok(Self {
            offset,
            size,
            backing,
        })
    }

    pub fn range(&self) -> (u64, u64) {
        (self.offset, self.size)
    }
}

impl ByteStream for DataRangeStream {
    fn kind(&self) -> LayerKind {
        LayerKind::DataRange
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        let available = self.size - offset;
        let count = usize::try_from(available).map_or(buf.len(), |a| a.min(buf.len()));
        self.backing.read_at(self.offset + offset, &mut buf[..count])
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.size)
    }

    fn close(&self) {
        self.backing.close();
    }
}
