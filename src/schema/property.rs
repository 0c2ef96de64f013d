//! Property descriptors: the per-field schema unit shared by node and
//! relationship metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Semantic type of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// UTF-8 string.
    String,
    /// Finite numeric value (NaN and infinities are rejected).
    Number,
    Boolean,
    /// Calendar date or datetime, RFC 3339 or `YYYY-MM-DD`.
    Date,
    /// Instant, integer epoch-milliseconds or RFC 3339 string.
    Timestamp,
    /// Binary payload, base64 string or array of byte values.
    Buffer,
    /// Store-assigned internal identity. Always read-only; populated from
    /// the store, never from caller-supplied data.
    Identity,
    /// Structured sub-object described by `nested` descriptors.
    Map,
    /// Homogeneous array described by an `element` descriptor.
    Array,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Date => "date",
            PropertyType::Timestamp => "timestamp",
            PropertyType::Buffer => "buffer",
            PropertyType::Identity => "identity",
            PropertyType::Map => "map",
            PropertyType::Array => "array",
        };
        f.write_str(s)
    }
}

/// Numeric and length bounds for a property value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// Declared schema for one property.
///
/// Built fluently and handed to a [`NodeMetadata`](crate::schema::NodeMetadata)
/// or [`RelationshipMetadata`](crate::schema::RelationshipMetadata) builder:
///
/// ```
/// use grom::schema::{PropertyDescriptor, PropertyType};
///
/// let role = PropertyDescriptor::new("role", PropertyType::String).required();
/// let year = PropertyDescriptor::new("year", PropertyType::Number);
/// assert!(role.is_required());
/// assert!(!year.is_required());
/// ```
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    property_type: PropertyType,
    required: bool,
    read_only: bool,
    default_value: Option<JsonValue>,
    nested: Option<BTreeMap<String, PropertyDescriptor>>,
    element: Option<Box<PropertyDescriptor>>,
    constraints: Option<PropertyConstraints>,
}

impl PropertyDescriptor {
    /// Creates a descriptor with the given name and semantic type.
    ///
    /// Identity-typed descriptors are forced read-only.
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            required: false,
            read_only: property_type == PropertyType::Identity,
            default_value: None,
            nested: None,
            element: None,
            constraints: None,
        }
    }

    /// Shorthand for the store-assigned identity field.
    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Identity)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the value substituted when the key is absent from the input bag.
    pub fn default_value(mut self, value: JsonValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Declares the structure of a map-typed property.
    pub fn nested(mut self, fields: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        let map = fields.into_iter().map(|d| (d.name.clone(), d)).collect();
        self.nested = Some(map);
        self
    }

    /// Declares the element schema of an array-typed property.
    pub fn element(mut self, descriptor: PropertyDescriptor) -> Self {
        self.element = Some(Box::new(descriptor));
        self
    }

    pub fn constraints(mut self, constraints: PropertyConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Identity properties are read-only regardless of how they were built.
    pub fn is_read_only(&self) -> bool {
        self.read_only || self.property_type == PropertyType::Identity
    }

    pub fn default(&self) -> Option<&JsonValue> {
        self.default_value.as_ref()
    }

    pub fn nested_fields(&self) -> Option<&BTreeMap<String, PropertyDescriptor>> {
        self.nested.as_ref()
    }

    pub fn element_descriptor(&self) -> Option<&PropertyDescriptor> {
        self.element.as_deref()
    }

    pub fn constraint_bounds(&self) -> Option<&PropertyConstraints> {
        self.constraints.as_ref()
    }
}
