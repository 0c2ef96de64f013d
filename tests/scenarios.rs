//! End-to-end scenarios over a recording mock session.
//!
//! Exercises the full pipeline (catalog → validation → query generation →
//! session) the way an application wires it, asserting both the observable
//! results and the exact queries that cross the session boundary.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use grom::error::OgmError;
use grom::graph::{
    CellValue, NodeValue, Params, Record, RelationshipValue, ResultSet, Session, SessionProvider,
};
use grom::query::{OrderDirection, PathTraversalOptions, QueryOptions};
use grom::schema::{
    Direction, NodeMetadata, PropertyDescriptor, PropertyType, RelationshipMetadata, SchemaCatalog,
};
use grom::{Context, EntityRecord, RelationshipConfig, RelationshipManager, Repository};

#[derive(Default)]
struct RecorderInner {
    queries: Vec<(String, Params)>,
    results: VecDeque<ResultSet>,
}

#[derive(Clone, Default)]
struct Recorder {
    inner: Arc<Mutex<RecorderInner>>,
}

impl Recorder {
    fn push_result(&self, rows: ResultSet) {
        self.inner.lock().unwrap().results.push_back(rows);
    }

    fn queries(&self) -> Vec<(String, Params)> {
        self.inner.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl SessionProvider for Recorder {
    async fn session(&self) -> Result<Box<dyn Session>, OgmError> {
        Ok(Box::new(RecorderSession {
            recorder: self.clone(),
        }))
    }
}

struct RecorderSession {
    recorder: Recorder,
}

#[async_trait]
impl Session for RecorderSession {
    async fn run(&self, cypher: &str, params: Params) -> Result<ResultSet, OgmError> {
        let mut inner = self.recorder.inner.lock().unwrap();
        inner.queries.push((cypher.to_string(), params));
        Ok(inner.results.pop_front().unwrap_or_default())
    }

    async fn close(&self) -> Result<(), OgmError> {
        Ok(())
    }
}

/// Person and Movie nodes plus the ACTED_IN relationship.
fn movie_catalog() -> SchemaCatalog {
    let catalog = SchemaCatalog::new();
    catalog.register_node(
        "Person",
        NodeMetadata::builder("Person")
            .property(PropertyDescriptor::identity("id"))
            .property(PropertyDescriptor::new("name", PropertyType::String).required())
            .build()
            .unwrap(),
    );
    catalog.register_node(
        "Movie",
        NodeMetadata::builder("Movie")
            .property(PropertyDescriptor::identity("id"))
            .property(PropertyDescriptor::new("title", PropertyType::String).required())
            .property(PropertyDescriptor::new("year", PropertyType::Number))
            .build()
            .unwrap(),
    );
    catalog.register_relationship(
        RelationshipMetadata::builder("ACTED_IN", "ACTED_IN")
            .property(PropertyDescriptor::new("role", PropertyType::String).required())
            .property(PropertyDescriptor::new("year", PropertyType::Number))
            .build()
            .unwrap(),
    );
    catalog
}

fn wired() -> (Context, Recorder) {
    static TRACING: std::sync::Once = std::sync::Once::new();
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });

    let recorder = Recorder::default();
    let ctx = Context::new(movie_catalog(), Arc::new(recorder.clone()));
    (ctx, recorder)
}

fn person_record(id: &str) -> EntityRecord {
    EntityRecord {
        id: id.to_string(),
        label: "Person".to_string(),
        properties: Params::new(),
    }
}

fn movie_record(id: &str) -> EntityRecord {
    EntityRecord {
        id: id.to_string(),
        label: "Movie".to_string(),
        properties: Params::new(),
    }
}

fn node_row(column: &str, id: i64, label: &str, properties: Params) -> Record {
    Record::default().with(
        column,
        CellValue::Node(NodeValue {
            identity: id,
            labels: vec![label.to_string()],
            properties,
        }),
    )
}

#[tokio::test]
async fn acted_in_create_carries_bound_endpoint_ids_and_props() {
    let (ctx, recorder) = wired();
    recorder.push_result(vec![Record::default().with(
        "r",
        CellValue::Relationship(RelationshipValue {
            type_name: "ACTED_IN".into(),
            properties: [
                ("role".to_string(), json!("Neo")),
                ("year".to_string(), json!(1999)),
            ]
            .into_iter()
            .collect(),
        }),
    )]);
    let manager = RelationshipManager::new(&ctx);

    let config = RelationshipConfig::new("ACTED_IN").properties(
        [
            ("role".to_string(), json!("Neo")),
            ("year".to_string(), json!(1999)),
        ]
        .into_iter()
        .collect(),
    );
    let edge = manager
        .create_relationship(&person_record("1"), &movie_record("2"), &config)
        .await
        .unwrap();

    assert_eq!(edge.type_name, "ACTED_IN");
    assert_eq!(edge.properties["role"], json!("Neo"));

    let (cypher, params) = &recorder.queries()[0];
    assert!(cypher.contains("MATCH (source:Person), (target:Movie)"));
    assert!(cypher.contains("CREATE (source)-[r:ACTED_IN $props]->(target)"));
    assert_eq!(params["sourceId"], json!("1"));
    assert_eq!(params["targetId"], json!("2"));
    assert_eq!(params["props"], json!({"role": "Neo", "year": 1999}));
}

#[tokio::test]
async fn missing_role_fails_without_touching_the_session() {
    let (ctx, recorder) = wired();
    let manager = RelationshipManager::new(&ctx);

    let config = RelationshipConfig::new("ACTED_IN")
        .properties([("year".to_string(), json!(1999))].into_iter().collect());
    let err = manager
        .create_relationship(&person_record("1"), &movie_record("2"), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, OgmError::MissingRequiredProperty(name) if name == "role"));
    assert!(recorder.queries().is_empty());
}

#[tokio::test]
async fn wrong_typed_role_fails_without_touching_the_session() {
    let (ctx, recorder) = wired();
    let manager = RelationshipManager::new(&ctx);

    let config = RelationshipConfig::new("ACTED_IN")
        .properties([("role".to_string(), json!(42))].into_iter().collect());
    let err = manager
        .create_relationship(&person_record("1"), &movie_record("2"), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, OgmError::PropertyTypeMismatch { name, .. } if name == "role"));
    assert!(recorder.queries().is_empty());
}

#[tokio::test]
async fn identity_is_never_caller_settable() {
    let (ctx, recorder) = wired();
    let repo = Repository::new(&ctx, "Movie").unwrap();

    let err = repo
        .create(
            [
                ("id".to_string(), json!("999")),
                ("title".to_string(), json!("The Matrix")),
            ]
            .into_iter()
            .collect(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, OgmError::ReadOnlyPropertyViolation(name) if name == "id"));
    assert!(recorder.queries().is_empty());
}

#[tokio::test]
async fn create_returns_the_store_assigned_identity() {
    let (ctx, recorder) = wired();
    recorder.push_result(vec![node_row(
        "n",
        41,
        "Movie",
        [("title".to_string(), json!("The Matrix"))]
            .into_iter()
            .collect(),
    )
    .with("internalId", CellValue::Scalar(json!(41)))]);
    let repo = Repository::new(&ctx, "Movie").unwrap();

    let movie = repo
        .create(
            [("title".to_string(), json!("The Matrix"))]
                .into_iter()
                .collect(),
        )
        .await
        .unwrap();

    assert_eq!(movie.id, "41");
    assert_eq!(movie.properties["id"], json!("41"));
    let (cypher, params) = &recorder.queries()[0];
    assert!(cypher.starts_with("CREATE (n:Movie $props)"));
    assert!(!params["props"]
        .as_object()
        .unwrap()
        .contains_key("id"));
}

#[tokio::test]
async fn find_by_id_on_an_absent_node_is_none() {
    let (ctx, recorder) = wired();
    recorder.push_result(Vec::new());
    let repo = Repository::new(&ctx, "Movie").unwrap();

    assert!(repo.find_by_id("404").await.unwrap().is_none());
}

#[tokio::test]
async fn update_on_an_absent_node_is_not_found() {
    let (ctx, recorder) = wired();
    recorder.push_result(Vec::new());
    let repo = Repository::new(&ctx, "Movie").unwrap();

    let err = repo
        .update("404", [("year".to_string(), json!(2003))].into_iter().collect())
        .await
        .unwrap_err();
    assert!(matches!(err, OgmError::NotFound(msg) if msg.contains("404")));
}

#[tokio::test]
async fn deleting_a_nonexistent_relationship_succeeds() {
    let (ctx, recorder) = wired();
    recorder.push_result(Vec::new());
    let manager = RelationshipManager::new(&ctx);

    manager
        .delete_relationship(&person_record("1"), &movie_record("2"), "ACTED_IN")
        .await
        .unwrap();
    assert_eq!(recorder.queries().len(), 1);
}

#[tokio::test]
async fn related_movies_ordered_by_year_desc_with_bound_page() {
    let (ctx, recorder) = wired();
    recorder.push_result(vec![node_row(
        "target",
        2,
        "Movie",
        [("title".to_string(), json!("The Matrix"))]
            .into_iter()
            .collect(),
    )
    .with("targetId", CellValue::Scalar(json!(2)))
    .with(
        "r",
        CellValue::Relationship(RelationshipValue {
            type_name: "ACTED_IN".into(),
            properties: [("role".to_string(), json!("Neo"))].into_iter().collect(),
        }),
    )]);
    let manager = RelationshipManager::new(&ctx);

    let options = QueryOptions::default()
        .order_by("year", OrderDirection::Desc)
        .limit(10);
    let related = manager
        .find_related_nodes(&person_record("1"), "ACTED_IN", "Movie", &options)
        .await
        .unwrap();

    assert_eq!(related.len(), 1);
    assert_eq!(related[0].record.id, "2");
    assert_eq!(related[0].relationship.properties["role"], json!("Neo"));

    let (cypher, params) = &recorder.queries()[0];
    assert!(cypher.contains("ORDER BY target.year DESC"));
    assert!(cypher.contains("LIMIT $limit"));
    assert!(!cypher.contains("SKIP"));
    assert_eq!(params["sourceId"], json!("1"));
    assert_eq!(params["limit"], json!(10));
}

#[tokio::test]
async fn depth_two_undirected_traversal_emits_both_filters() {
    let (ctx, recorder) = wired();
    recorder.push_result(Vec::new());
    let manager = RelationshipManager::new(&ctx);

    let start = EntityRecord {
        id: "1".to_string(),
        label: "User".to_string(),
        properties: Params::new(),
    };
    let options = PathTraversalOptions::default()
        .max_depth(2)
        .relationship_types(["FOLLOWS"])
        .direction(Direction::Both)
        .node_labels(["User"]);
    let paths = manager.traverse_path(&start, &options).await.unwrap();
    assert!(paths.is_empty());

    let (cypher, params) = &recorder.queries()[0];
    assert!(cypher.contains("MATCH p = (start:User)-[r:FOLLOWS*1..2]-(end:User)"));
    assert!(cypher.contains("WHERE ID(start) = toInteger($startId)"));
    assert_eq!(params["startId"], json!("1"));
}
