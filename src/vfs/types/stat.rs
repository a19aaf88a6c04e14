/*!
 * VFS Entry Stat
 * Size and identity information for virtual entries
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file_type::FileType;

/// Stat information of a virtual entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntryStat {
    pub file_type: FileType,
    #[serde(default)]
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub identifier: Option<Uuid>,
}

impl EntryStat {
    pub fn directory() -> Self {
        Self {
            file_type: FileType::Directory,
            size: 0,
            identifier: None,
        }
    }

    pub fn file(size: u64, identifier: Option<Uuid>) -> Self {
        Self {
            file_type: FileType::File,
            size,
            identifier,
        }
    }
}
