/*!
 * Path Specification Attributes
 * Kind-specific attribute set carried by each chain node
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::vfs::types::VfsError;

/// Text encoding applied to an encoded stream layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMethod {
    Base16,
    Base64,
}

impl fmt::Display for EncodingMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodingMethod::Base16 => write!(f, "base16"),
            EncodingMethod::Base64 => write!(f, "base64"),
        }
    }
}

impl FromStr for EncodingMethod {
    type Err = VfsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base16" => Ok(EncodingMethod::Base16),
            "base64" => Ok(EncodingMethod::Base64),
            other => Err(VfsError::InvalidSpec(format!(
                "unsupported encoding method: {}",
                other
            ))),
        }
    }
}

/// Attribute set of a single path specification node
///
/// Only the attributes meaningful for the node's kind are set; the rest stay
/// `None`. Attributes take part in structural identity, so two nodes that
/// differ in any attribute address different resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub store_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub range_offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub range_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub encoding_method: Option<EncodingMethod>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub identifier: Option<String>,
}

impl Attributes {
    /// True when no attribute is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }

    /// Write the comparable `, name: value` suffix for every set attribute
    pub(crate) fn write_comparable(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref location) = self.location {
            write!(f, ", location: {}", location)?;
        }
        if let Some(store_index) = self.store_index {
            write!(f, ", store index: {}", store_index)?;
        }
        if let Some(range_offset) = self.range_offset {
            write!(f, ", range offset: 0x{:08x}", range_offset)?;
        }
        if let Some(range_size) = self.range_size {
            write!(f, ", range size: {}", range_size)?;
        }
        if let Some(encoding_method) = self.encoding_method {
            write!(f, ", encoding method: {}", encoding_method)?;
        }
        if let Some(ref identifier) = self.identifier {
            write!(f, ", identifier: {}", identifier)?;
        }
        Ok(())
    }
}
