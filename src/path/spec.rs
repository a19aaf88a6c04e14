/*!
 * Path Specification
 * Immutable, structurally-compared chain node addressing one storage layer
 */

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

use super::attributes::{Attributes, EncodingMethod};
use super::builder::PathSpecBuilder;
use super::kind::LayerKind;
use crate::core::limits::{
    MAX_CHAIN_DEPTH, MAX_LOCATION_LENGTH, ROOT_PARENT_SEED, STRUCTURAL_HASH_SEEDS,
};
use crate::vfs::types::{VfsError, VfsResult};

/// Path specification node
///
/// A chain is a leaf node plus its parents, up to a root. Nodes are immutable
/// and reference counted, so cloning a chain is cheap and chains can be shared
/// freely across threads. Equality and hashing are structural over the whole
/// chain: two chains are the same resource address iff every node's kind and
/// attributes match, recursively through the parents.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "PathSpecRepr", into = "PathSpecRepr")]
pub struct PathSpec {
    node: Arc<Node>,
}

struct Node {
    kind: LayerKind,
    attributes: Attributes,
    parent: Option<PathSpec>,
    hash: u64,
    depth: usize,
}

impl PathSpec {
    /// Create a validated path specification node
    pub fn new(
        kind: LayerKind,
        attributes: Attributes,
        parent: Option<PathSpec>,
    ) -> VfsResult<Self> {
        validate(kind, &attributes, parent.as_ref())?;

        let depth = parent.as_ref().map_or(1, |p| p.depth() + 1);
        if depth > MAX_CHAIN_DEPTH {
            return Err(VfsError::InvalidSpec(format!(
                "chain depth {} exceeds limit of {}",
                depth, MAX_CHAIN_DEPTH
            )));
        }

        let hash = structural_hash(kind, &attributes, parent.as_ref());
        Ok(Self {
            node: Arc::new(Node {
                kind,
                attributes,
                parent,
                hash,
                depth,
            }),
        })
    }

    /// Start building a node of the given kind
    pub fn builder(kind: LayerKind) -> PathSpecBuilder {
        PathSpecBuilder::new(kind)
    }

    /// Host operating-system file
    pub fn os<S: Into<String>>(location: S) -> VfsResult<Self> {
        Self::builder(LayerKind::Os).location(location).build()
    }

    /// In-memory fixture blob
    pub fn fake<S: Into<String>>(location: S) -> VfsResult<Self> {
        Self::builder(LayerKind::Fake).location(location).build()
    }

    /// Named mount point
    pub fn mount<S: Into<String>>(identifier: S) -> VfsResult<Self> {
        Self::builder(LayerKind::Mount).identifier(identifier).build()
    }

    /// Attribute-less layer on top of `parent` (e.g. a container image)
    pub fn layer(kind: LayerKind, parent: &PathSpec) -> VfsResult<Self> {
        Self::builder(kind).parent(parent.clone()).build()
    }

    /// Byte range of the parent stream
    pub fn data_range(offset: u64, size: u64, parent: &PathSpec) -> VfsResult<Self> {
        Self::builder(LayerKind::DataRange)
            .range_offset(offset)
            .range_size(size)
            .parent(parent.clone())
            .build()
    }

    /// Parent stream decoded with `method`
    pub fn encoded_stream(method: EncodingMethod, parent: &PathSpec) -> VfsResult<Self> {
        Self::builder(LayerKind::EncodedStream)
            .encoding_method(method)
            .parent(parent.clone())
            .build()
    }

    /// Store volume node addressed by location (`/` or `/vssN`)
    pub fn vshadow_location<S: Into<String>>(location: S, parent: &PathSpec) -> VfsResult<Self> {
        Self::builder(LayerKind::VShadow)
            .location(location)
            .parent(parent.clone())
            .build()
    }

    /// Store volume node addressed by zero-based store index
    pub fn vshadow_store(store_index: u32, parent: &PathSpec) -> VfsResult<Self> {
        Self::builder(LayerKind::VShadow)
            .store_index(store_index)
            .parent(parent.clone())
            .build()
    }

    /// Layer kind of this node
    #[inline]
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.node.kind
    }

    /// Attribute set of this node
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.node.attributes
    }

    #[inline]
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.node.attributes.location.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn store_index(&self) -> Option<u32> {
        self.node.attributes.store_index
    }

    #[inline]
    #[must_use]
    pub fn range_offset(&self) -> Option<u64> {
        self.node.attributes.range_offset
    }

    #[inline]
    #[must_use]
    pub fn range_size(&self) -> Option<u64> {
        self.node.attributes.range_size
    }

    #[inline]
    #[must_use]
    pub fn encoding_method(&self) -> Option<EncodingMethod> {
        self.node.attributes.encoding_method
    }

    #[inline]
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.node.attributes.identifier.as_deref()
    }

    /// Parent node, `None` for roots
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&PathSpec> {
        self.node.parent.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.node.parent.is_some()
    }

    /// Number of nodes in the chain, root included
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    /// Structural hash of the whole chain
    #[inline]
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.node.hash
    }

    /// Root node of the chain
    #[must_use]
    pub fn root(&self) -> &PathSpec {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Iterate the chain from this node up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: Some(self),
        }
    }

    /// Check whether any node in the chain has the given kind
    #[must_use]
    pub fn contains_kind(&self, kind: LayerKind) -> bool {
        self.ancestors().any(|node| node.kind() == kind)
    }
}

/// Iterator over a chain, leaf first
pub struct Ancestors<'a> {
    next: Option<&'a PathSpec>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a PathSpec;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

impl PartialEq for PathSpec {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.node.hash == other.node.hash
            && self.node.depth == other.node.depth
            && self.node.kind == other.node.kind
            && self.node.attributes == other.node.attributes
            && self.node.parent == other.node.parent
    }
}

impl Eq for PathSpec {}

impl Hash for PathSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.node.hash);
    }
}

/// Comparable form: one `type: KIND, attr: value` line per node, root first
impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(parent) = self.parent() {
            fmt::Display::fmt(parent, f)?;
        }
        write!(f, "type: {}", self.kind())?;
        self.attributes().write_comparable(f)?;
        writeln!(f)
    }
}

impl fmt::Debug for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PathSpec")
            .field("kind", &self.node.kind)
            .field("attributes", &self.node.attributes)
            .field("parent", &self.node.parent)
            .finish()
    }
}

fn structural_hash(kind: LayerKind, attributes: &Attributes, parent: Option<&PathSpec>) -> u64 {
    let [k0, k1, k2, k3] = STRUCTURAL_HASH_SEEDS;
    let mut hasher = RandomState::with_seeds(k0, k1, k2, k3).build_hasher();
    kind.hash(&mut hasher);
    attributes.hash(&mut hasher);
    hasher.write_u64(parent.map_or(ROOT_PARENT_SEED, PathSpec::structural_hash));
    hasher.finish()
}

fn validate(kind: LayerKind, attributes: &Attributes, parent: Option<&PathSpec>) -> VfsResult<()> {
    match (kind.is_root(), parent.is_some()) {
        (true, true) => {
            return Err(VfsError::InvalidSpec(format!(
                "{} is a root kind and cannot have a parent",
                kind
            )))
        }
        (false, false) => {
            return Err(VfsError::InvalidSpec(format!("{} requires a parent", kind)))
        }
        _ => {}
    }

    if let Some(ref location) = attributes.location {
        if location.len() > MAX_LOCATION_LENGTH {
            return Err(VfsError::InvalidSpec(format!(
                "location exceeds {} bytes",
                MAX_LOCATION_LENGTH
            )));
        }
        if location.contains('\0') {
            return Err(VfsError::InvalidSpec(
                "location cannot contain null bytes".into(),
            ));
        }
    }

    match kind {
        LayerKind::Os => require_location(kind, attributes),
        LayerKind::Fake => {
            require_location(kind, attributes)?;
            match attributes.location.as_deref() {
                Some(location) if location.starts_with('/') => Ok(()),
                _ => Err(VfsError::InvalidSpec(
                    "FAKE location must be absolute".into(),
                )),
            }
        }
        LayerKind::Mount => match attributes.identifier.as_deref() {
            Some(identifier) if !identifier.is_empty() => Ok(()),
            _ => Err(VfsError::InvalidSpec("MOUNT requires an identifier".into())),
        },
        LayerKind::DataRange => {
            if attributes.range_offset.is_none() || attributes.range_size.is_none() {
                return Err(VfsError::InvalidSpec(
                    "DATA_RANGE requires range offset and range size".into(),
                ));
            }
            Ok(())
        }
        LayerKind::EncodedStream => {
            if attributes.encoding_method.is_none() {
                return Err(VfsError::InvalidSpec(
                    "ENCODED_STREAM requires an encoding method".into(),
                ));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn require_location(kind: LayerKind, attributes: &Attributes) -> VfsResult<()> {
    match attributes.location.as_deref() {
        Some(location) if !location.is_empty() => Ok(()),
        _ => Err(VfsError::InvalidSpec(format!("{} requires a location", kind))),
    }
}

/// Serialized shape of a chain node
#[derive(Serialize, Deserialize)]
struct PathSpecRepr {
    #[serde(rename = "type")]
    kind: LayerKind,
    #[serde(flatten)]
    attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    parent: Option<PathSpec>,
}

impl TryFrom<PathSpecRepr> for PathSpec {
    type Error = VfsError;

    fn try_from(repr: PathSpecRepr) -> Result<Self, Self::Error> {
        PathSpec::new(repr.kind, repr.attributes, repr.parent)
    }
}

impl From<PathSpec> for PathSpecRepr {
    fn from(spec: PathSpec) -> Self {
        PathSpecRepr {
            kind: spec.kind(),
            attributes: spec.attributes().clone(),
            parent: spec.parent().cloned(),
        }
    }
}
