/*!
 * Layer Kinds
 * Closed set of storage-layer discriminators
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::vfs::types::VfsError;

/// Storage-layer type indicator
///
/// Every node of a path specification chain carries exactly one kind. The set
/// is closed: handlers are registered per kind and the resolver dispatches on
/// the leaf node's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerKind {
    /// Host operating-system file
    Os,
    /// In-memory blob, used for fixtures
    Fake,
    /// Named mount point resolving to another chain
    Mount,
    /// Byte range of the parent stream
    DataRange,
    /// Parent stream decoded from a text encoding
    EncodedStream,
    CompressedStream,
    Gzip,
    Qcow,
    Raw,
    Ewf,
    Vhdi,
    Vmdk,
    TskPartition,
    #[serde(rename = "VSHADOW")]
    VShadow,
    Tsk,
    Ntfs,
    Zip,
    Tar,
}

impl LayerKind {
    /// All kinds, in declaration order
    pub const ALL: [LayerKind; 18] = [
        LayerKind::Os,
        LayerKind::Fake,
        LayerKind::Mount,
        LayerKind::DataRange,
        LayerKind::EncodedStream,
        LayerKind::CompressedStream,
        LayerKind::Gzip,
        LayerKind::Qcow,
        LayerKind::Raw,
        LayerKind::Ewf,
        LayerKind::Vhdi,
        LayerKind::Vmdk,
        LayerKind::TskPartition,
        LayerKind::VShadow,
        LayerKind::Tsk,
        LayerKind::Ntfs,
        LayerKind::Zip,
        LayerKind::Tar,
    ];

    /// Root kinds address an origin and never take a parent
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self, LayerKind::Os | LayerKind::Fake | LayerKind::Mount)
    }

    /// Canonical type indicator string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LayerKind::Os => "OS",
            LayerKind::Fake => "FAKE",
            LayerKind::Mount => "MOUNT",
            LayerKind::DataRange => "DATA_RANGE",
            LayerKind::EncodedStream => "ENCODED_STREAM",
            LayerKind::CompressedStream => "COMPRESSED_STREAM",
            LayerKind::Gzip => "GZIP",
            LayerKind::Qcow => "QCOW",
            LayerKind::Raw => "RAW",
            LayerKind::Ewf => "EWF",
            LayerKind::Vhdi => "VHDI",
            LayerKind::Vmdk => "VMDK",
            LayerKind::TskPartition => "TSK_PARTITION",
            LayerKind::VShadow => "VSHADOW",
            LayerKind::Tsk => "TSK",
            LayerKind::Ntfs => "NTFS",
            LayerKind::Zip => "ZIP",
            LayerKind::Tar => "TAR",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = VfsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| VfsError::InvalidSpec(format!("unknown layer kind: {}", s)))
    }
}
