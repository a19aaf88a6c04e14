/*!
 * VFS File Type Enum
 * Defines the type of virtual entries
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// File type of a virtual entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    File,
    Directory,
    #[default]
    Unknown,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileType::File => write!(f, "file"),
            FileType::Directory => write!(f, "directory"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}
