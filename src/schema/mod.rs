//! Declarative schema for nodes and relationships.
//!
//! Schema construction is a pure, value-producing step done once at
//! process start: build [`NodeMetadata`] / [`RelationshipMetadata`] values
//! with their builders, then hand them to a [`SchemaCatalog`] that is
//! shared with every repository and relationship manager.
//!
//! Labels, relationship types, and property names are validated against a
//! strict identifier allow-list at registration because they are the only
//! strings interpolated directly into generated query text.

pub mod ident;

mod catalog;
mod node;
mod property;
mod relationship;

pub use catalog::SchemaCatalog;
pub use node::{NodeMetadata, NodeMetadataBuilder};
pub use property::{PropertyConstraints, PropertyDescriptor, PropertyType};
pub use relationship::{Direction, RelationshipMetadata, RelationshipMetadataBuilder};
