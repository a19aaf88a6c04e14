/*!
 * Path Specification Serializer
 * JSON round trip for whole chains
 */

use super::spec::PathSpec;
use crate::vfs::types::VfsResult;

/// Serialize a chain, leaf outermost with nested `parent` objects
pub fn to_json(spec: &PathSpec) -> VfsResult<String> {
    Ok(serde_json::to_string(spec)?)
}

/// Pretty-printed variant of [`to_json`]
pub fn to_json_pretty(spec: &PathSpec) -> VfsResult<String> {
    Ok(serde_json::to_string_pretty(spec)?)
}

/// Deserialize a chain, revalidating every node
pub fn from_json(json: &str) -> VfsResult<PathSpec> {
    Ok(serde_json::from_str(json)?)
}
