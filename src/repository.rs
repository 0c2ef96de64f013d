//! Entity repository: CRUD over one registered node type.
//!
//! A [`Repository`] is constructed once per entity type and resolves its
//! [`NodeMetadata`] at construction, so an unregistered type fails at
//! wiring time rather than on first use. Each operation borrows one
//! session, runs exactly one generated query, and closes the session on
//! every exit path.

use std::sync::Arc;

use crate::context::Context;
use crate::error::OgmError;
use crate::graph::{run_scoped, NodeValue, Params, SessionProvider};
use crate::query::builder;
use crate::schema::NodeMetadata;
use crate::validate;

/// A stored entity: store-assigned id, stamped label, and properties.
///
/// The label always comes from registered metadata, never from caller
/// input, so downstream relationship queries may trust it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: String,
    pub label: String,
    pub properties: Params,
}

/// CRUD operations for one node type.
#[derive(Clone)]
pub struct Repository {
    metadata: Arc<NodeMetadata>,
    sessions: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Resolves the metadata for `type_name` from the context's catalog.
    ///
    /// Fails with `SchemaNotRegistered` when the type was never
    /// registered.
    pub fn new(ctx: &Context, type_name: &str) -> Result<Self, OgmError> {
        Ok(Self {
            metadata: ctx.catalog.node(type_name)?,
            sessions: Arc::clone(&ctx.sessions),
        })
    }

    /// The registered label this repository operates on.
    pub fn label(&self) -> &str {
        self.metadata.label()
    }

    /// Creates a node after full validation.
    ///
    /// Read-only and identity properties must not appear in `values`;
    /// required properties must. Defaults are filled in before the write.
    /// The identity field of the returned record is always the
    /// store-assigned id.
    pub async fn create(&self, values: Params) -> Result<EntityRecord, OgmError> {
        self.reject_read_only(&values)?;
        let validated = validate::validate(&values, self.metadata.properties())?;

        let query = builder::create_node(self.metadata.label(), validated)?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;
        let row = rows.first().ok_or_else(|| {
            OgmError::ResultMapping(format!("create of {} returned no rows", self.label()))
        })?;

        let node = row.node("n")?;
        let id = row.scalar_string("internalId")?;
        Ok(self.entity_with_id(node, id))
    }

    /// Looks up a node by its store-assigned id. Zero rows is `None`,
    /// not an error.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<EntityRecord>, OgmError> {
        let query = builder::find_node_by_id(self.metadata.label(), id)?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;
        match rows.first() {
            Some(row) => {
                let node = row.node("n")?;
                Ok(Some(self.entity_from_node(node)))
            }
            None => Ok(None),
        }
    }

    /// Merges `values` into an existing node.
    ///
    /// Validation is type-only: absent properties stay untouched, so the
    /// required check does not apply. Zero matched rows is `NotFound`.
    pub async fn update(&self, id: &str, values: Params) -> Result<EntityRecord, OgmError> {
        self.reject_read_only(&values)?;
        validate::validate_partial(&values, self.metadata.properties())?;

        let query = builder::update_node(self.metadata.label(), id, values)?;
        let rows = run_scoped(self.sessions.as_ref(), query).await?;
        let row = rows
            .first()
            .ok_or_else(|| OgmError::NotFound(format!("{} with id {id}", self.label())))?;

        let node = row.node("n")?;
        Ok(self.entity_from_node(node))
    }

    /// Deletes a node by id. Idempotent: deleting an absent node
    /// succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), OgmError> {
        let query = builder::delete_node(self.metadata.label(), id)?;
        run_scoped(self.sessions.as_ref(), query).await?;
        Ok(())
    }

    fn reject_read_only(&self, values: &Params) -> Result<(), OgmError> {
        for descriptor in self.metadata.properties() {
            if descriptor.is_read_only() && values.contains_key(descriptor.name()) {
                return Err(OgmError::ReadOnlyPropertyViolation(
                    descriptor.name().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn entity_from_node(&self, node: &NodeValue) -> EntityRecord {
        self.entity_with_id(node, node.identity.to_string())
    }

    /// Stamps the registered label and overwrites the identity property
    /// with the store-assigned id.
    fn entity_with_id(&self, node: &NodeValue, id: String) -> EntityRecord {
        let mut properties = node.properties.clone();
        if let Some(identity) = self.metadata.identity_property() {
            properties.insert(identity.to_string(), id.clone().into());
        }
        EntityRecord {
            id,
            label: self.metadata.label().to_string(),
            properties,
        }
    }
}
