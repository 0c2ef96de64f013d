//! Cypher generation: pure functions from metadata and call-site
//! arguments to a [`GeneratedQuery`].
//!
//! Same inputs always yield the same (text, parameters) pair. Variable
//! names are fixed literals (`n`, `source`, `target`, `r`, `ri`, `p`,
//! `start`, `end`). Labels, relationship types, and field names are
//! interpolated from trusted, allow-list-checked metadata; every *value*
//! travels as a bound parameter.

use serde_json::Value as JsonValue;

use crate::error::OgmError;
use crate::graph::Params;
use crate::query::options::{PathTraversalOptions, QueryOptions};
use crate::schema::{ident, Direction};

/// The builder's sole output: query text plus its bound parameters.
/// Immutable and single-use.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuery {
    pub text: String,
    pub parameters: Params,
}

impl GeneratedQuery {
    fn new(text: String) -> Self {
        Self {
            text,
            parameters: Params::new(),
        }
    }

    fn param(mut self, name: &str, value: impl Into<JsonValue>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }
}

/// `CREATE (n:<label> $props) RETURN n, ID(n) AS internalId`
pub fn create_node(label: &str, props: Params) -> Result<GeneratedQuery, OgmError> {
    let label = ident::checked(label)?;
    Ok(
        GeneratedQuery::new(format!(
            "CREATE (n:{label} $props) RETURN n, ID(n) AS internalId"
        ))
        .param("props", JsonValue::Object(props.into_iter().collect())),
    )
}

/// Match by internal identity, coercing the supplied id string to the
/// store's native integer identity.
pub fn find_node_by_id(label: &str, id: &str) -> Result<GeneratedQuery, OgmError> {
    let label = ident::checked(label)?;
    Ok(GeneratedQuery::new(format!(
        "MATCH (n:{label}) WHERE ID(n) = toInteger($id) RETURN n"
    ))
    .param("id", id))
}

/// Merge-set the supplied properties; unspecified fields are untouched.
/// Zero returned rows surface downstream as `NotFound`.
pub fn update_node(label: &str, id: &str, props: Params) -> Result<GeneratedQuery, OgmError> {
    let label = ident::checked(label)?;
    Ok(GeneratedQuery::new(format!(
        "MATCH (n:{label}) WHERE ID(n) = toInteger($id) SET n += $props RETURN n"
    ))
    .param("id", id)
    .param("props", JsonValue::Object(props.into_iter().collect())))
}

/// Delete by internal identity. Matching zero rows is not an error.
pub fn delete_node(label: &str, id: &str) -> Result<GeneratedQuery, OgmError> {
    let label = ident::checked(label)?;
    Ok(GeneratedQuery::new(format!(
        "MATCH (n:{label}) WHERE ID(n) = toInteger($id) DELETE n"
    ))
    .param("id", id))
}

/// Match both endpoints by id and create one directed edge with bound
/// properties.
pub fn create_relationship(
    source_label: &str,
    target_label: &str,
    rel_type: &str,
    source_id: &str,
    target_id: &str,
    props: Params,
) -> Result<GeneratedQuery, OgmError> {
    let source_label = ident::checked(source_label)?;
    let target_label = ident::checked(target_label)?;
    let rel_type = ident::checked(rel_type)?;
    Ok(GeneratedQuery::new(format!(
        "MATCH (source:{source_label}), (target:{target_label}) \
         WHERE ID(source) = toInteger($sourceId) AND ID(target) = toInteger($targetId) \
         CREATE (source)-[r:{rel_type} $props]->(target) RETURN r"
    ))
    .param("sourceId", source_id)
    .param("targetId", target_id)
    .param("props", JsonValue::Object(props.into_iter().collect())))
}

/// Match both endpoints once and create the forward and inverse edges in
/// a single query. Returns both edges.
#[allow(clippy::too_many_arguments)]
pub fn create_bidirectional_relationship(
    source_label: &str,
    target_label: &str,
    rel_type: &str,
    inverse_type: &str,
    source_id: &str,
    target_id: &str,
    props: Params,
    inverse_props: Params,
) -> Result<GeneratedQuery, OgmError> {
    let source_label = ident::checked(source_label)?;
    let target_label = ident::checked(target_label)?;
    let rel_type = ident::checked(rel_type)?;
    let inverse_type = ident::checked(inverse_type)?;
    Ok(GeneratedQuery::new(format!(
        "MATCH (source:{source_label}), (target:{target_label}) \
         WHERE ID(source) = toInteger($sourceId) AND ID(target) = toInteger($targetId) \
         CREATE (source)-[r:{rel_type} $props]->(target) \
         CREATE (target)-[ri:{inverse_type} $inverseProps]->(source) \
         RETURN r, ri"
    ))
    .param("sourceId", source_id)
    .param("targetId", target_id)
    .param("props", JsonValue::Object(props.into_iter().collect()))
    .param(
        "inverseProps",
        JsonValue::Object(inverse_props.into_iter().collect()),
    ))
}

/// Match the specific edge between the two identified endpoints and
/// delete it. Matching zero edges is not an error.
pub fn delete_relationship(
    source_label: &str,
    target_label: &str,
    rel_type: &str,
    source_id: &str,
    target_id: &str,
) -> Result<GeneratedQuery, OgmError> {
    let source_label = ident::checked(source_label)?;
    let target_label = ident::checked(target_label)?;
    let rel_type = ident::checked(rel_type)?;
    Ok(GeneratedQuery::new(format!(
        "MATCH (source:{source_label})-[r:{rel_type}]->(target:{target_label}) \
         WHERE ID(source) = toInteger($sourceId) AND ID(target) = toInteger($targetId) \
         DELETE r"
    ))
    .param("sourceId", source_id)
    .param("targetId", target_id))
}

/// One outgoing hop from the identified source to a `target_label` node;
/// returns the target, its identity, and the edge's properties, with
/// ordering/pagination from `options`.
pub fn find_related_nodes(
    source_label: &str,
    rel_type: &str,
    target_label: &str,
    source_id: &str,
    options: &QueryOptions,
) -> Result<GeneratedQuery, OgmError> {
    let source_label = ident::checked(source_label)?;
    let target_label = ident::checked(target_label)?;
    let rel_type = ident::checked(rel_type)?;

    let mut text = format!(
        "MATCH (source:{source_label})-[r:{rel_type}]->(target:{target_label}) \
         WHERE ID(source) = toInteger($sourceId) \
         RETURN target, ID(target) AS targetId, r"
    );
    let mut query = GeneratedQuery::new(String::new()).param("sourceId", source_id);
    append_page_clauses(&mut text, &mut query, "target", options)?;
    query.text = text;
    Ok(query)
}

/// Variable-length path match from the identified start node.
///
/// Depth is `*1..max` (or unbounded `*` when absent), the relationship
/// alternation and target label alternation are omitted when their sets
/// are empty, and the direction picks the pattern glyph. Returns the full
/// path so every (node, relationship) segment can be reconstructed in
/// order.
pub fn traverse_path(
    start_label: &str,
    start_id: &str,
    options: &PathTraversalOptions,
) -> Result<GeneratedQuery, OgmError> {
    let start_label = ident::checked(start_label)?;

    let type_filter = if options.relationship_types.is_empty() {
        String::new()
    } else {
        let mut types = Vec::with_capacity(options.relationship_types.len());
        for t in &options.relationship_types {
            types.push(ident::checked(t)?);
        }
        format!(":{}", types.join("|"))
    };

    let depth = match options.max_depth {
        Some(max) => format!("*1..{max}"),
        None => "*".to_string(),
    };

    let end_filter = if options.node_labels.is_empty() {
        String::new()
    } else {
        let mut labels = Vec::with_capacity(options.node_labels.len());
        for l in &options.node_labels {
            labels.push(ident::checked(l)?);
        }
        format!(":{}", labels.join("|"))
    };

    let edge = format!("[r{type_filter}{depth}]");
    let pattern = match options.direction {
        Direction::Outgoing => format!("-{edge}->"),
        Direction::Incoming => format!("<-{edge}-"),
        Direction::Both => format!("-{edge}-"),
    };

    let mut text = format!(
        "MATCH p = (start:{start_label}){pattern}(end{end_filter}) \
         WHERE ID(start) = toInteger($startId) \
         RETURN p"
    );
    let mut query = GeneratedQuery::new(String::new()).param("startId", start_id);
    append_page_clauses(&mut text, &mut query, "end", &options.query)?;
    query.text = text;
    Ok(query)
}

/// Appends `ORDER BY` / `SKIP` / `LIMIT`, each only when its option is
/// present. Skip and limit are bound parameters; only the (validated)
/// field name is interpolated.
fn append_page_clauses(
    text: &mut String,
    query: &mut GeneratedQuery,
    subject: &str,
    options: &QueryOptions,
) -> Result<(), OgmError> {
    if let Some(field) = options.order_by.as_deref() {
        let field = ident::checked(field)?;
        text.push_str(&format!(
            " ORDER BY {subject}.{field} {}",
            options.order.keyword()
        ));
    }
    if let Some(skip) = options.skip {
        text.push_str(" SKIP $skip");
        query.parameters.insert("skip".to_string(), skip.into());
    }
    if let Some(limit) = options.limit {
        text.push_str(" LIMIT $limit");
        query.parameters.insert("limit".to_string(), limit.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::options::OrderDirection;
    use serde_json::json;

    fn props(pairs: &[(&str, JsonValue)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn create_node_binds_props_as_one_parameter() {
        let q = create_node("Person", props(&[("name", json!("Neo"))])).unwrap();
        assert_eq!(
            q.text,
            "CREATE (n:Person $props) RETURN n, ID(n) AS internalId"
        );
        assert_eq!(q.parameters["props"], json!({"name": "Neo"}));
    }

    #[test]
    fn find_node_coerces_id_through_to_integer() {
        let q = find_node_by_id("Person", "42").unwrap();
        assert!(q.text.contains("WHERE ID(n) = toInteger($id)"));
        assert_eq!(q.parameters["id"], json!("42"));
    }

    #[test]
    fn update_node_uses_merge_set() {
        let q = update_node("Person", "42", props(&[("name", json!("Trinity"))])).unwrap();
        assert!(q.text.contains("SET n += $props"));
        assert!(q.text.ends_with("RETURN n"));
        assert_eq!(q.parameters["id"], json!("42"));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = delete_node("Person", "7").unwrap();
        let b = delete_node("Person", "7").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn label_injection_is_rejected() {
        let err = create_node("Person) DETACH DELETE n //", Params::new()).unwrap_err();
        assert!(matches!(err, OgmError::InvalidIdentifier(_)));
    }

    #[test]
    fn relationship_create_binds_both_ids_and_props() {
        let q = create_relationship(
            "Person",
            "Movie",
            "ACTED_IN",
            "1",
            "2",
            props(&[("role", json!("Neo"))]),
        )
        .unwrap();
        assert!(q
            .text
            .contains("CREATE (source)-[r:ACTED_IN $props]->(target)"));
        assert_eq!(q.parameters["sourceId"], json!("1"));
        assert_eq!(q.parameters["targetId"], json!("2"));
        assert_eq!(q.parameters["props"], json!({"role": "Neo"}));
    }

    #[test]
    fn bidirectional_create_emits_both_edges_in_one_query() {
        let q = create_bidirectional_relationship(
            "User",
            "User",
            "FOLLOWS",
            "FOLLOWED_BY",
            "1",
            "2",
            props(&[("since", json!(2020))]),
            Params::new(),
        )
        .unwrap();
        assert!(q.text.contains("CREATE (source)-[r:FOLLOWS $props]->(target)"));
        assert!(q
            .text
            .contains("CREATE (target)-[ri:FOLLOWED_BY $inverseProps]->(source)"));
        assert!(q.text.ends_with("RETURN r, ri"));
        assert_eq!(q.parameters["inverseProps"], json!({}));
    }

    #[test]
    fn delete_relationship_matches_the_specific_edge() {
        let q = delete_relationship("Person", "Movie", "ACTED_IN", "1", "2").unwrap();
        assert!(q
            .text
            .contains("MATCH (source:Person)-[r:ACTED_IN]->(target:Movie)"));
        assert!(q.text.ends_with("DELETE r"));
    }

    #[test]
    fn related_nodes_order_and_limit_are_emitted_and_bound() {
        let options = QueryOptions::default()
            .order_by("year", OrderDirection::Desc)
            .limit(10);
        let q = find_related_nodes("Person", "ACTED_IN", "Movie", "1", &options).unwrap();
        assert!(q.text.contains("ORDER BY target.year DESC"));
        assert!(q.text.contains("LIMIT $limit"));
        assert!(!q.text.contains("SKIP"));
        assert_eq!(q.parameters["sourceId"], json!("1"));
        assert_eq!(q.parameters["limit"], json!(10));
    }

    #[test]
    fn related_nodes_without_options_has_no_page_clauses() {
        let q = find_related_nodes("Person", "ACTED_IN", "Movie", "1", &QueryOptions::default())
            .unwrap();
        assert!(!q.text.contains("ORDER BY"));
        assert!(!q.text.contains("SKIP"));
        assert!(!q.text.contains("LIMIT"));
    }

    #[test]
    fn zero_limit_and_skip_are_honored_literally() {
        let options = QueryOptions::default().limit(0).skip(0);
        let q = find_related_nodes("Person", "ACTED_IN", "Movie", "1", &options).unwrap();
        assert!(q.text.contains("SKIP $skip"));
        assert!(q.text.contains("LIMIT $limit"));
        assert_eq!(q.parameters["skip"], json!(0));
        assert_eq!(q.parameters["limit"], json!(0));
    }

    #[test]
    fn order_by_injection_is_rejected() {
        let options = QueryOptions {
            order_by: Some("year DESC; MATCH (m) DELETE m".into()),
            ..Default::default()
        };
        let err =
            find_related_nodes("Person", "ACTED_IN", "Movie", "1", &options).unwrap_err();
        assert!(matches!(err, OgmError::InvalidIdentifier(_)));
    }

    #[test]
    fn traverse_bounded_undirected_with_filters() {
        let options = PathTraversalOptions::default()
            .max_depth(2)
            .relationship_types(["FOLLOWS"])
            .direction(Direction::Both)
            .node_labels(["User"]);
        let q = traverse_path("User", "1", &options).unwrap();
        assert!(q.text.contains("MATCH p = (start:User)-[r:FOLLOWS*1..2]-(end:User)"));
        assert!(q.text.contains("WHERE ID(start) = toInteger($startId)"));
        assert_eq!(q.parameters["startId"], json!("1"));
    }

    #[test]
    fn traverse_direction_glyphs() {
        let outgoing = traverse_path("User", "1", &PathTraversalOptions::default()).unwrap();
        assert!(outgoing.text.contains(")-[r*]->("));

        let incoming = traverse_path(
            "User",
            "1",
            &PathTraversalOptions::default().direction(Direction::Incoming),
        )
        .unwrap();
        assert!(incoming.text.contains(")<-[r*]-("));
    }

    #[test]
    fn traverse_empty_sets_mean_no_restriction() {
        let q = traverse_path("User", "1", &PathTraversalOptions::default()).unwrap();
        assert!(q.text.contains("[r*]"));
        assert!(q.text.contains("(end)"));
        assert!(!q.text.contains(":|"));
    }

    #[test]
    fn traverse_multiple_types_and_labels_use_alternation() {
        let options = PathTraversalOptions::default()
            .max_depth(3)
            .relationship_types(["FOLLOWS", "BLOCKS"])
            .node_labels(["User", "Admin"]);
        let q = traverse_path("User", "1", &options).unwrap();
        assert!(q.text.contains("[r:FOLLOWS|BLOCKS*1..3]"));
        assert!(q.text.contains("(end:User|Admin)"));
    }

    #[test]
    fn traverse_honors_pagination_on_end_node() {
        let options = PathTraversalOptions {
            query: QueryOptions::default()
                .order_by("name", OrderDirection::Asc)
                .skip(5)
                .limit(10),
            ..Default::default()
        };
        let q = traverse_path("User", "1", &options).unwrap();
        assert!(q.text.contains("ORDER BY end.name ASC"));
        assert!(q.text.contains("SKIP $skip LIMIT $limit"));
        assert_eq!(q.parameters["skip"], json!(5));
        assert_eq!(q.parameters["limit"], json!(10));
    }
}
