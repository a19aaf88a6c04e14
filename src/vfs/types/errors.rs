/*!
 * VFS Error Types
 * Structured, type-safe error handling for resolution and layer operations
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::path::LayerKind;

/// VFS operation result
///
/// # Must Use
/// Resolution can fail and leave nothing acquired; failures must be handled
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// Lookup absence is never an error: lookups return `Ok(None)` for entries that
/// do not exist. Every variant here is a failure surfaced to the direct caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Invalid path specification: {0}")]
    #[diagnostic(
        code(vfs::invalid_spec),
        help("Check the chain: non-root kinds need a parent and kind-specific attributes.")
    )]
    InvalidSpec(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Unsupported layer kind {kind}: {reason}")]
    #[diagnostic(
        code(vfs::unsupported_kind),
        help("Register a handler for this kind before building the resolver.")
    )]
    UnsupportedKind { kind: LayerKind, reason: String },

    #[error("Handler already registered for layer kind {0}")]
    #[diagnostic(code(vfs::already_registered))]
    AlreadyRegistered(LayerKind),

    #[error("File system already open: {0}")]
    #[diagnostic(code(vfs::already_open), help("Close the file system before reopening it."))]
    AlreadyOpen(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("File system not open: {0}")]
    #[diagnostic(code(vfs::not_open), help("Open the file system before looking up entries."))]
    NotOpen(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Chain already cached: {0}")]
    #[diagnostic(
        code(vfs::duplicate_insert),
        help("Construction for one chain must be serialized through the resolver.")
    )]
    DuplicateInsert(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not found: {0}")]
    #[diagnostic(code(vfs::not_found))]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Backing resource error in {kind} layer ({path_spec}): {reason}")]
    #[diagnostic(
        code(vfs::backing_resource),
        help("A lower layer failed to open or is corrupt. Inspect the chain for the failing layer.")
    )]
    BackingResource {
        kind: LayerKind,
        path_spec: String,
        reason: String,
    },

    #[error("Is a directory: {0}")]
    #[diagnostic(code(vfs::is_a_directory))]
    IsADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(vfs::io))]
    Io(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(vfs::serialization))]
    Serialization(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(vfs::config), help("Check LAYERED_VFS_* environment variables."))]
    Config(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// Wrap a failure as a backing resource error for the given layer
    ///
    /// Errors that already carry a backing layer are kept as-is so the
    /// innermost failing layer is the one reported.
    pub fn backing(kind: LayerKind, path_spec: impl ToString, source: VfsError) -> Self {
        match source {
            err @ VfsError::BackingResource { .. } => err,
            other => VfsError::BackingResource {
                kind,
                path_spec: path_spec.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Backing resource error from a plain reason
    pub fn corrupt(kind: LayerKind, path_spec: impl ToString, reason: impl Into<String>) -> Self {
        VfsError::BackingResource {
            kind,
            path_spec: path_spec.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this is a backing resource failure
    #[inline]
    #[must_use]
    pub const fn is_backing(&self) -> bool {
        matches!(self, VfsError::BackingResource { .. })
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VfsError {
    fn from(err: serde_json::Error) -> Self {
        VfsError::Serialization(err.to_string())
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
