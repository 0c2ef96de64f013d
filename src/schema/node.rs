//! Node metadata: label plus ordered property descriptors for one entity
//! type.

use crate::error::OgmError;
use crate::schema::ident;
use crate::schema::property::{PropertyDescriptor, PropertyType};

/// Immutable schema for one registered entity type.
///
/// Constructed once at startup through [`NodeMetadata::builder`] and handed
/// to the [`SchemaCatalog`](crate::schema::SchemaCatalog); never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    label: String,
    properties: Vec<PropertyDescriptor>,
    identity_property: Option<String>,
}

impl NodeMetadata {
    /// Starts a builder for the given node label.
    pub fn builder(label: impl Into<String>) -> NodeMetadataBuilder {
        NodeMetadataBuilder {
            label: label.into(),
            properties: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Descriptors in declaration order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Name of the identity-typed property, when one is declared.
    pub fn identity_property(&self) -> Option<&str> {
        self.identity_property.as_deref()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|d| d.name() == name)
    }

    /// Descriptors a caller may set on create/update (identity and other
    /// read-only fields excluded).
    pub fn writable_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|d| !d.is_read_only())
    }
}

/// Builder enforcing the node-schema invariants at construction time.
pub struct NodeMetadataBuilder {
    label: String,
    properties: Vec<PropertyDescriptor>,
}

impl NodeMetadataBuilder {
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

    /// Validates the label, property names, and identity uniqueness.
    pub fn build(self) -> Result<NodeMetadata, OgmError> {
        ident::checked(&self.label)?;

        let mut identity_property = None;
        for descriptor in &self.properties {
            ident::checked(descriptor.name())?;
            let duplicates = self
                .properties
                .iter()
                .filter(|d| d.name() == descriptor.name())
                .count();
            if duplicates > 1 {
                return Err(OgmError::InvalidSchema(format!(
                    "duplicate property '{}' on label '{}'",
                    descriptor.name(),
                    self.label
                )));
            }
            if descriptor.property_type() == PropertyType::Identity {
                if identity_property.is_some() {
                    return Err(OgmError::InvalidSchema(format!(
                        "label '{}' declares more than one identity property",
                        self.label
                    )));
                }
                identity_property = Some(descriptor.name().to_string());
            }
        }

        Ok(NodeMetadata {
            label: self.label,
            properties: self.properties,
            identity_property,
        })
    }
}
