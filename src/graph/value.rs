//! Result value model for the session boundary.
//!
//! A [`ResultSet`] is an ordered sequence of [`Record`]s; each record maps
//! a returned column name to a [`CellValue`], which is either a scalar, a
//! node, a relationship, or a path. Everything is plain JSON underneath so
//! any backend can produce it and tests can build fixtures by hand.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::OgmError;

/// Parameters bound to a query: name to JSON value.
pub type Params = HashMap<String, JsonValue>;

/// Ordered result of one query round-trip.
pub type ResultSet = Vec<Record>;

/// A node as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeValue {
    /// Store-assigned internal identity.
    pub identity: i64,
    pub labels: Vec<String>,
    pub properties: Params,
}

/// A relationship as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipValue {
    pub type_name: String,
    pub properties: Params,
}

/// One hop of a returned path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub start: NodeValue,
    pub relationship: RelationshipValue,
    pub end: NodeValue,
}

/// A full path, ordered from the start node outward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathValue {
    pub segments: Vec<PathSegment>,
}

/// A single returned column value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Scalar(JsonValue),
    Node(NodeValue),
    Relationship(RelationshipValue),
    Path(PathValue),
}

impl CellValue {
    pub fn as_node(&self) -> Option<&NodeValue> {
        match self {
            CellValue::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&RelationshipValue> {
        match self {
            CellValue::Relationship(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathValue> {
        match self {
            CellValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&JsonValue> {
        match self {
            CellValue::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

/// One row of a result set, keyed by returned column name.
#[derive(Debug, Clone, Default)]
pub struct Record {
    columns: HashMap<String, CellValue>,
}

impl Record {
    pub fn new(columns: HashMap<String, CellValue>) -> Self {
        Self { columns }
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.columns.get(field)
    }

    /// Typed node access; errors name the missing or mis-shaped column.
    pub fn node(&self, field: &str) -> Result<&NodeValue, OgmError> {
        self.get(field)
            .and_then(CellValue::as_node)
            .ok_or_else(|| OgmError::ResultMapping(format!("expected node column '{field}'")))
    }

    pub fn relationship(&self, field: &str) -> Result<&RelationshipValue, OgmError> {
        self.get(field)
            .and_then(CellValue::as_relationship)
            .ok_or_else(|| {
                OgmError::ResultMapping(format!("expected relationship column '{field}'"))
            })
    }

    pub fn path(&self, field: &str) -> Result<&PathValue, OgmError> {
        self.get(field)
            .and_then(CellValue::as_path)
            .ok_or_else(|| OgmError::ResultMapping(format!("expected path column '{field}'")))
    }

    /// Scalar access rendered as a string (identities arrive as integers
    /// but are exposed to callers as strings).
    pub fn scalar_string(&self, field: &str) -> Result<String, OgmError> {
        let value = self
            .get(field)
            .and_then(CellValue::as_scalar)
            .ok_or_else(|| OgmError::ResultMapping(format!("expected scalar column '{field}'")))?;
        match value {
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Number(n) => Ok(n.to_string()),
            other => Err(OgmError::ResultMapping(format!(
                "column '{field}' is not a string or number: {other}"
            ))),
        }
    }
}

/// Builder used by backends and tests to assemble records.
impl Record {
    pub fn with(mut self, field: impl Into<String>, value: CellValue) -> Self {
        self.columns.insert(field.into(), value);
        self
    }
}
