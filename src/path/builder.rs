/*!
 * Path Specification Builder
 * Typed attribute setters over a kind, validated on build
 */

use super::attributes::{Attributes, EncodingMethod};
use super::kind::LayerKind;
use super::spec::PathSpec;
use crate::vfs::types::VfsResult;

/// Builder for a single path specification node
///
/// # Example
///
/// ```rust
/// use layered_vfs::path::{LayerKind, PathSpec};
///
/// let image = PathSpec::os("/evidence/disk.qcow2").unwrap();
/// let qcow = PathSpec::builder(LayerKind::Qcow).parent(image).build().unwrap();
/// let store = PathSpec::builder(LayerKind::VShadow)
///     .store_index(1)
///     .parent(qcow)
///     .build()
///     .unwrap();
/// assert_eq!(store.depth(), 3);
/// ```
#[derive(Debug, Clone)]
#[must_use = "builders do nothing until built"]
pub struct PathSpecBuilder {
    kind: LayerKind,
    attributes: Attributes,
    parent: Option<PathSpec>,
}

impl PathSpecBuilder {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            attributes: Attributes::default(),
            parent: None,
        }
    }

    pub fn location<S: Into<String>>(mut self, location: S) -> Self {
        self.attributes.location = Some(location.into());
        self
    }

    pub fn store_index(mut self, store_index: u32) -> Self {
        self.attributes.store_index = Some(store_index);
        self
    }

    pub fn range_offset(mut self, offset: u64) -> Self {
        self.attributes.range_offset = Some(offset);
        self
    }

    pub fn range_size(mut self, size: u64) -> Self {
        self.attributes.range_size = Some(size);
        self
    }

    pub fn encoding_method(mut self, method: EncodingMethod) -> Self {
        self.attributes.encoding_method = Some(method);
        self
    }

    pub fn identifier<S: Into<String>>(mut self, identifier: S) -> Self {
        self.attributes.identifier = Some(identifier.into());
        self
    }

    /// Replace the whole attribute set
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn parent(mut self, parent: PathSpec) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Validate and construct the node
    pub fn build(self) -> VfsResult<PathSpec> {
        PathSpec::new(self.kind, self.attributes, self.parent)
    }
}
