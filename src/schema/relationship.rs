//! Relationship metadata: graph relationship type, direction, and property
//! descriptors, keyed by a registry name.

use serde::{Deserialize, Serialize};

use crate::error::OgmError;
use crate::schema::ident;
use crate::schema::property::{PropertyDescriptor, PropertyType};

/// Direction of a relationship pattern relative to the source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

/// Immutable schema for one registered relationship.
#[derive(Debug, Clone)]
pub struct RelationshipMetadata {
    name: String,
    type_name: String,
    direction: Option<Direction>,
    properties: Vec<PropertyDescriptor>,
}

impl RelationshipMetadata {
    /// Starts a builder. `name` is the registry key; `type_name` is the
    /// graph relationship type spliced into generated patterns. They are
    /// often the same string.
    pub fn builder(
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> RelationshipMetadataBuilder {
        RelationshipMetadataBuilder {
            name: name.into(),
            type_name: type_name.into(),
            direction: None,
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Descriptors in declaration order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

/// Builder enforcing relationship-schema invariants at construction time.
pub struct RelationshipMetadataBuilder {
    name: String,
    type_name: String,
    direction: Option<Direction>,
    properties: Vec<PropertyDescriptor>,
}

impl RelationshipMetadataBuilder {
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    pub fn properties(
        mut self,
        descriptors: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self {
        self.properties.extend(descriptors);
        self
    }

    /// Validates the type string and property names; rejects duplicates
    /// and identity-typed properties (edges carry no store identity field
    /// in this model).
    pub fn build(self) -> Result<RelationshipMetadata, OgmError> {
        ident::checked(&self.type_name)?;

        for descriptor in &self.properties {
            ident::checked(descriptor.name())?;
            let duplicates = self
                .properties
                .iter()
                .filter(|d| d.name() == descriptor.name())
                .count();
            if duplicates > 1 {
                return Err(OgmError::InvalidSchema(format!(
                    "duplicate property '{}' on relationship '{}'",
                    descriptor.name(),
                    self.name
                )));
            }
            if descriptor.property_type() == PropertyType::Identity {
                return Err(OgmError::InvalidSchema(format!(
                    "relationship '{}' declares an identity property '{}'",
                    self.name,
                    descriptor.name()
                )));
            }
        }

        Ok(RelationshipMetadata {
            name: self.name,
            type_name: self.type_name,
            direction: self.direction,
            properties: self.properties,
        })
    }
}
