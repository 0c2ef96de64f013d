//! Backend adapters implementing the session traits over concrete drivers.

pub mod neo4j;

pub use neo4j::{Neo4jProvider, Neo4jSession};
