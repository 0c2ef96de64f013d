//! Relationship orchestration between two stored entities.
//!
//! [`RelationshipManager`] combines the catalog, the validator, and the
//! query builders over the injected session boundary. Edge properties are
//! validated against registered relationship metadata before any session
//! is acquired; unregistered types pass their properties through opaque.

use std::sync::Arc;

use crate::context::Context;
use crate::di::FromContext;
use crate::error::OgmError;
use crate::graph::{run_scoped, Params, RelationshipValue, SessionProvider};
use crate::query::builder;
use crate::query::{PathTraversalOptions, QueryOptions};
use crate::repository::EntityRecord;
use crate::schema::{Direction, SchemaCatalog};
use crate::validate;

/// Call-site description of the edge to create.
///
/// `type_name` is a catalog registry name when one is registered, in
/// which case the schema's graph type is spliced into the query;
/// otherwise it is used as the graph type directly.
#[derive(Debug, Clone, Default)]
pub struct RelationshipConfig {
    pub type_name: String,
    pub properties: Params,
    /// Type of the inverse edge for bidirectional creation; the forward
    /// type when absent.
    pub inverse_type_name: Option<String>,
    pub inverse_properties: Params,
    /// Validate the inverse leg against its registered schema. Off by
    /// default: inverse edges are treated as opaque unless asked.
    pub validate_inverse: bool,
}

impl RelationshipConfig {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn properties(mut self, properties: Params) -> Self {
        self.properties = properties;
        self
    }

    pub fn inverse(mut self, type_name: impl Into<String>, properties: Params) -> Self {
        self.inverse_type_name = Some(type_name.into());
        self.inverse_properties = properties;
        self
    }

    pub fn validate_inverse(mut self) -> Self {
        self.validate_inverse = true;
        self
    }
}

/// One row of a related-nodes lookup: the target entity and the edge
/// that reached it.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedNode {
    pub record: EntityRecord,
    pub relationship: RelationshipValue,
}

/// A traversed node, identity rendered as a string like every other id
/// crossing the API.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: Params,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathRelationship {
    pub type_name: String,
    pub properties: Params,
}

/// One matched path, nodes and relationships ordered from the start
/// node outward.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversedPath {
    pub nodes: Vec<PathNode>,
    pub relationships: Vec<PathRelationship>,
}

/// One leg of an edge creation after catalog resolution.
struct ResolvedLeg {
    properties: Params,
    direction: Option<Direction>,
    type_name: String,
}

/// Creates, deletes, and traverses relationships between entities.
#[derive(FromContext, Clone)]
pub struct RelationshipManager {
    catalog: Arc<SchemaCatalog>,
    sessions: Arc<dyn SessionProvider>,
}

impl RelationshipManager {
    pub fn new(ctx: &Context) -> Self {
        use crate::di::FromRef;
        Self::from_ref(ctx)
    }

    /// Creates one directed edge between two stored entities.
    ///
    /// When the type is registered, its properties are fully validated
    /// first and the registered direction decides which endpoint the
    /// edge leaves from.
    pub async fn create_relationship(
        &self,
        source: &EntityRecord,
        target: &EntityRecord,
        config: &RelationshipConfig,
    ) -> Result<RelationshipValue, OgmError> {
        let leg = self.validated_leg(&config.type_name, &config.properties)?;
        let (from, to) = match leg.direction {
            Some(Direction::Incoming) => (target, source),
            _ => (source, target),
        };

        let query = builder::create_relationship(
            &from.label,
            &to.label,
            &leg.type_name,
            &from.id,
            &to.id,
            leg.properties,
        )?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;
        let row = rows
            .first()
            .ok_or_else(|| self.endpoints_not_found(source, target))?;
        Ok(row.relationship("r")?.clone())
    }

    /// Creates the forward and inverse edges in one query.
    ///
    /// The forward leg is always validated when registered; the inverse
    /// leg only when `validate_inverse` is set.
    pub async fn create_bidirectional_relationship(
        &self,
        source: &EntityRecord,
        target: &EntityRecord,
        config: &RelationshipConfig,
    ) -> Result<(RelationshipValue, RelationshipValue), OgmError> {
        let leg = self.validated_leg(&config.type_name, &config.properties)?;

        let inverse_name = config
            .inverse_type_name
            .as_deref()
            .unwrap_or(&config.type_name);
        let (inverse_type, inverse_props) = if config.validate_inverse {
            let inverse = self.validated_leg(inverse_name, &config.inverse_properties)?;
            (inverse.type_name, inverse.properties)
        } else {
            (self.edge_type(inverse_name), config.inverse_properties.clone())
        };

        let query = builder::create_bidirectional_relationship(
            &source.label,
            &target.label,
            &leg.type_name,
            &inverse_type,
            &source.id,
            &target.id,
            leg.properties,
            inverse_props,
        )?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;
        let row = rows
            .first()
            .ok_or_else(|| self.endpoints_not_found(source, target))?;
        Ok((row.relationship("r")?.clone(), row.relationship("ri")?.clone()))
    }

    /// Deletes the typed edge between the two entities. Idempotent: a
    /// missing edge is a no-op success.
    pub async fn delete_relationship(
        &self,
        source: &EntityRecord,
        target: &EntityRecord,
        type_name: &str,
    ) -> Result<(), OgmError> {
        let query = builder::delete_relationship(
            &source.label,
            &target.label,
            &self.edge_type(type_name),
            &source.id,
            &target.id,
        )?;
        run_scoped(self.sessions.as_ref(), query).await?;
        Ok(())
    }

    /// One-hop lookup of `target_label` nodes reachable over `type_name`
    /// edges, with ordering and pagination from `options`.
    pub async fn find_related_nodes(
        &self,
        source: &EntityRecord,
        type_name: &str,
        target_label: &str,
        options: &QueryOptions,
    ) -> Result<Vec<RelatedNode>, OgmError> {
        let query = builder::find_related_nodes(
            &source.label,
            &self.edge_type(type_name),
            target_label,
            &source.id,
            options,
        )?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;

        let mut related = Vec::with_capacity(rows.len());
        for row in &rows {
            let node = row.node("target")?;
            let id = row.scalar_string("targetId")?;
            related.push(RelatedNode {
                record: EntityRecord {
                    id,
                    label: target_label.to_string(),
                    properties: node.properties.clone(),
                },
                relationship: row.relationship("r")?.clone(),
            });
        }
        Ok(related)
    }

    /// Variable-depth traversal from a stored entity; each returned path
    /// keeps its nodes and relationships in traversal order.
    pub async fn traverse_path(
        &self,
        start: &EntityRecord,
        options: &PathTraversalOptions,
    ) -> Result<Vec<TraversedPath>, OgmError> {
        let query = builder::traverse_path(&start.label, &start.id, options)?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;

        let mut paths = Vec::with_capacity(rows.len());
        for row in &rows {
            let path = row.path("p")?;
            let mut nodes = Vec::new();
            let mut relationships = Vec::new();
            for (index, segment) in path.segments.iter().enumerate() {
                if index == 0 {
                    nodes.push(path_node(&segment.start));
                }
                nodes.push(path_node(&segment.end));
                relationships.push(PathRelationship {
                    type_name: segment.relationship.type_name.clone(),
                    properties: segment.relationship.properties.clone(),
                });
            }
            paths.push(TraversedPath {
                nodes,
                relationships,
            });
        }
        Ok(paths)
    }

    /// Validates one leg against the catalog when its name is
    /// registered; unregistered names pass through untouched.
    fn validated_leg(&self, name: &str, properties: &Params) -> Result<ResolvedLeg, OgmError> {
        match self.catalog.relationship_opt(name) {
            Some(metadata) => Ok(ResolvedLeg {
                properties: validate::validate(properties, metadata.properties())?,
                direction: metadata.direction(),
                type_name: metadata.type_name().to_string(),
            }),
            None => Ok(ResolvedLeg {
                properties: properties.clone(),
                direction: None,
                type_name: name.to_string(),
            }),
        }
    }

    /// Resolves a registry name to its graph relationship type, or the
    /// name itself when unregistered.
    fn edge_type(&self, name: &str) -> String {
        self.catalog
            .relationship_opt(name)
            .map(|metadata| metadata.type_name().to_string())
            .unwrap_or_else(|| name.to_string())
    }

    fn endpoints_not_found(&self, source: &EntityRecord, target: &EntityRecord) -> OgmError {
        OgmError::NotFound(format!(
            "{} {} or {} {}",
            source.label, source.id, target.label, target.id
        ))
    }
}

fn path_node(node: &crate::graph::NodeValue) -> PathNode {
    PathNode {
        id: node.identity.to_string(),
        labels: node.labels.clone(),
        properties: node.properties.clone(),
    }
}
