//! Neo4j backend over the Bolt protocol.
//!
//! [`Neo4jProvider`] wraps a [`neo4rs::Graph`] connection pool and hands out
//! [`Neo4jSession`]s. Each session executes one generated query, converts the
//! bound JSON parameters to Bolt values, and materializes the driver rows
//! into the backend-neutral [`Record`] model.

use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltString, BoltType, Graph,
};
use serde_json::Value as JsonValue;

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::error::OgmError;
use crate::graph::value::{
    CellValue, NodeValue, Params, PathSegment, PathValue, Record, RelationshipValue, ResultSet,
};
use crate::graph::{Session, SessionProvider};

/// Session provider backed by a Bolt connection pool.
///
/// Cheap to clone; the underlying pool is shared.
#[derive(Clone)]
pub struct Neo4jProvider {
    graph: Graph,
}

impl Neo4jProvider {
    /// Connects to the server described by `config`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, OgmError> {
        let mut builder = neo4rs::ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str());
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }
        let driver_config = builder
            .build()
            .map_err(|e| OgmError::ConnectionUnavailable(e.to_string()))?;
        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| OgmError::ConnectionUnavailable(e.to_string()))?;
        Ok(Self { graph })
    }

    /// Wraps an already-connected driver handle.
    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl SessionProvider for Neo4jProvider {
    async fn session(&self) -> Result<Box<dyn Session>, OgmError> {
        Ok(Box::new(Neo4jSession {
            graph: self.graph.clone(),
        }))
    }
}

/// One unit of work against Neo4j.
pub struct Neo4jSession {
    graph: Graph,
}

#[async_trait]
impl Session for Neo4jSession {
    async fn run(&self, cypher: &str, params: Params) -> Result<ResultSet, OgmError> {
        let columns = return_columns(cypher);

        let mut query = neo4rs::query(cypher);
        for (name, value) in &params {
            query = query.param(name.as_str(), json_to_bolt(value));
        }

        let mut stream = self
            .graph
            .execute(query)
            .await
            .map_err(|e| OgmError::store("query execution failed", e))?;

        let mut records = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| OgmError::store("failed to fetch row", e))?
        {
            records.push(row_to_record(&row, &columns)?);
        }
        Ok(records)
    }

    async fn close(&self) -> Result<(), OgmError> {
        // The driver pools connections internally; returning the session is
        // a no-op at this layer.
        Ok(())
    }
}

/// Converts a JSON parameter value to its Bolt representation.
fn json_to_bolt(value: &JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(Default::default()),
        JsonValue::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoltType::Integer(BoltInteger::new(i))
            } else {
                BoltType::Float(BoltFloat::new(n.as_f64().unwrap_or(0.0)))
            }
        }
        JsonValue::String(s) => BoltType::String(BoltString::new(s)),
        JsonValue::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        }
        JsonValue::Object(map) => {
            let mut bolt = BoltMap::new();
            for (key, item) in map {
                bolt.put(BoltString::new(key), json_to_bolt(item));
            }
            BoltType::Map(bolt)
        }
    }
}

/// Extracts the projected column names from a generated query.
///
/// Generated queries always end in an uppercase `RETURN` clause whose items
/// are either bare expressions or `expr AS alias`, never nested commas, so a
/// straight split is sufficient.
fn return_columns(cypher: &str) -> Vec<String> {
    let Some(pos) = cypher.rfind("RETURN ") else {
        return Vec::new();
    };
    cypher[pos + "RETURN ".len()..]
        .split(',')
        .map(|item| {
            let item = item.trim();
            match item.rsplit_once(" AS ") {
                Some((_, alias)) => alias.trim().to_string(),
                None => item.to_string(),
            }
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn row_to_record(row: &neo4rs::Row, columns: &[String]) -> Result<Record, OgmError> {
    let mut record = Record::default();
    for column in columns {
        let cell = if let Ok(node) = row.get::<neo4rs::Node>(column) {
            CellValue::Node(convert_node(&node)?)
        } else if let Ok(relation) = row.get::<neo4rs::Relation>(column) {
            CellValue::Relationship(convert_relation(&relation)?)
        } else if let Ok(path) = row.get::<neo4rs::Path>(column) {
            CellValue::Path(convert_path(&path)?)
        } else {
            let value = row.get::<JsonValue>(column).map_err(|e| {
                OgmError::ResultMapping(format!("column '{column}' could not be read: {e}"))
            })?;
            CellValue::Scalar(value)
        };
        record = record.with(column.clone(), cell);
    }
    Ok(record)
}

fn convert_node(node: &neo4rs::Node) -> Result<NodeValue, OgmError> {
    let mut properties = Params::new();
    for key in node.keys() {
        let value = node.get::<JsonValue>(key).map_err(|e| {
            OgmError::ResultMapping(format!("node property '{key}' could not be read: {e}"))
        })?;
        properties.insert(key.to_string(), value);
    }
    Ok(NodeValue {
        identity: node.id(),
        labels: node.labels().iter().map(|l| l.to_string()).collect(),
        properties,
    })
}

fn convert_relation(relation: &neo4rs::Relation) -> Result<RelationshipValue, OgmError> {
    let mut properties = Params::new();
    for key in relation.keys() {
        let value = relation.get::<JsonValue>(key).map_err(|e| {
            OgmError::ResultMapping(format!(
                "relationship property '{key}' could not be read: {e}"
            ))
        })?;
        properties.insert(key.to_string(), value);
    }
    Ok(RelationshipValue {
        type_name: relation.typ().to_string(),
        properties,
    })
}

fn convert_unbounded_relation(
    relation: &neo4rs::UnboundedRelation,
) -> Result<RelationshipValue, OgmError> {
    let mut properties = Params::new();
    for key in relation.keys() {
        let value = relation.get::<JsonValue>(key).map_err(|e| {
            OgmError::ResultMapping(format!(
                "relationship property '{key}' could not be read: {e}"
            ))
        })?;
        properties.insert(key.to_string(), value);
    }
    Ok(RelationshipValue {
        type_name: relation.typ().to_string(),
        properties,
    })
}

fn convert_path(path: &neo4rs::Path) -> Result<PathValue, OgmError> {
    let nodes = path.nodes();
    let relations = path.rels();
    let mut converted = Vec::with_capacity(nodes.len());
    for node in &nodes {
        converted.push(convert_node(node)?);
    }

    let mut segments = Vec::with_capacity(relations.len());
    for (index, relation) in relations.iter().enumerate() {
        let (Some(start), Some(end)) = (converted.get(index), converted.get(index + 1)) else {
            return Err(OgmError::ResultMapping(
                "path relationship without both endpoint nodes".into(),
            ));
        };
        segments.push(PathSegment {
            start: start.clone(),
            relationship: convert_unbounded_relation(relation)?,
            end: end.clone(),
        });
    }
    Ok(PathValue { segments })
}
