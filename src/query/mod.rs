//! Cypher query generation.
//!
//! Pure, deterministic builders: metadata plus call-site arguments in,
//! [`GeneratedQuery`] (text + bound parameters) out. Nothing in this
//! module touches a session.

pub mod builder;
mod options;

pub use builder::GeneratedQuery;
pub use options::{OrderDirection, PathTraversalOptions, QueryOptions};
