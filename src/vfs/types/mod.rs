/*!
 * VFS Types
 * Shared types for layered filesystem operations
 */

mod entry;
mod errors;
mod file_type;
mod stat;

pub use entry::FileEntry;
pub use errors::{VfsError, VfsResult};
pub use file_type::FileType;
pub use stat::EntryStat;
