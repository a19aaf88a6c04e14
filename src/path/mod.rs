/*!
 * Path Specifications
 * Chain-structured addresses of objects nested through storage layers
 */

mod attributes;
mod builder;
mod kind;
pub mod serializer;
mod spec;

pub use attributes::{Attributes, EncodingMethod};
pub use builder::PathSpecBuilder;
pub use kind::LayerKind;
pub use spec::{Ancestors, PathSpec};
