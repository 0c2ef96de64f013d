//! The schema catalog: one explicit value holding every registered node
//! and relationship schema.
//!
//! Replaces process-global registries with a value constructed at startup
//! and shared (`Arc<SchemaCatalog>`) through the
//! [`Context`](crate::context::Context). Registration is rare and
//! lock-guarded; lookups are frequent and take the read side only.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::OgmError;
use crate::schema::node::NodeMetadata;
use crate::schema::relationship::RelationshipMetadata;

/// Registry of node and relationship schemas.
///
/// ```
/// use grom::schema::{NodeMetadata, PropertyDescriptor, PropertyType, SchemaCatalog};
///
/// let catalog = SchemaCatalog::new();
/// let person = NodeMetadata::builder("Person")
///     .property(PropertyDescriptor::identity("id"))
///     .property(PropertyDescriptor::new("name", PropertyType::String).required())
///     .build()
///     .unwrap();
/// catalog.register_node("person", person);
/// assert!(catalog.node("person").is_ok());
/// assert!(catalog.node("movie").is_err());
/// ```
#[derive(Default)]
pub struct SchemaCatalog {
    nodes: RwLock<HashMap<String, Arc<NodeMetadata>>>,
    relationships: RwLock<HashMap<String, Arc<RelationshipMetadata>>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers node metadata under an entity type name.
    /// Re-registering the same name replaces the previous entry.
    pub fn register_node(&self, type_name: impl Into<String>, metadata: NodeMetadata) {
        let mut nodes = self.nodes.write().expect("schema catalog lock poisoned");
        nodes.insert(type_name.into(), Arc::new(metadata));
    }

    /// Looks up node metadata by entity type name.
    pub fn node(&self, type_name: &str) -> Result<Arc<NodeMetadata>, OgmError> {
        let nodes = self.nodes.read().expect("schema catalog lock poisoned");
        nodes
            .get(type_name)
            .cloned()
            .ok_or_else(|| OgmError::SchemaNotRegistered(type_name.to_string()))
    }

    /// Registers relationship metadata keyed by its registry name.
    /// Last registration for a name wins; there is no merging.
    pub fn register_relationship(&self, metadata: RelationshipMetadata) {
        let mut rels = self
            .relationships
            .write()
            .expect("schema catalog lock poisoned");
        rels.insert(metadata.name().to_string(), Arc::new(metadata));
    }

    /// Looks up relationship metadata by registry name.
    pub fn relationship(&self, name: &str) -> Result<Arc<RelationshipMetadata>, OgmError> {
        let rels = self
            .relationships
            .read()
            .expect("schema catalog lock poisoned");
        rels.get(name)
            .cloned()
            .ok_or_else(|| OgmError::SchemaNotRegistered(name.to_string()))
    }

    /// Looks up relationship metadata, returning `None` when unregistered.
    ///
    /// Used where an unregistered relationship is legal (creation without
    /// a declared schema skips validation).
    pub fn relationship_opt(&self, name: &str) -> Option<Arc<RelationshipMetadata>> {
        let rels = self
            .relationships
            .read()
            .expect("schema catalog lock poisoned");
        rels.get(name).cloned()
    }
}
