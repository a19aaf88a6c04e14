/*!
 * Virtual File System Module
 * Layer capability traits, entry types and the store volume file system
 */

pub mod reader;
pub mod traits;
pub mod types;
pub mod vshadow;

// Re-exports
pub use reader::{ReadAt, StreamReader};
pub use traits::{ByteStream, FileSystem};
pub use types::{EntryStat, FileEntry, FileType, VfsError, VfsResult};
pub use vshadow::VShadowFileSystem;
