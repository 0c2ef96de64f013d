//! Grom - Schema-driven object-graph mapper for Cypher property-graph stores
//!
//! Declarative node and relationship schemas, property validation, and
//! injection-safe Cypher generation over an injected session boundary.

pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod graph;
pub mod query;
pub mod relationship;
pub mod repository;
pub mod schema;
pub mod validate;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;

pub use context::Context;
pub use error::OgmError;
pub use relationship::{
    PathNode, PathRelationship, RelatedNode, RelationshipConfig, RelationshipManager,
    TraversedPath,
};
pub use repository::{EntityRecord, Repository};
