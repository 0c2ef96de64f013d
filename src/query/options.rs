//! Ordering, pagination, and traversal options for generated queries.

use serde::{Deserialize, Serialize};

use crate::schema::Direction;

/// Sort direction for an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Ordering and pagination for a read query.
///
/// Each clause is omitted entirely when its option is `None`; `Some(0)`
/// for `limit`/`skip` is honored literally (a zero-row page is valid).
/// Without `order_by` this layer guarantees no deterministic order.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub order_by: Option<String>,
    pub order: OrderDirection,
}

impl QueryOptions {
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, order: OrderDirection) -> Self {
        self.order_by = Some(field.into());
        self.order = order;
        self
    }
}

/// Options for a bounded variable-depth path traversal.
///
/// Empty `relationship_types` / `node_labels` mean "no restriction"; the
/// corresponding filter is omitted rather than emitted as an impossible
/// empty alternation.
#[derive(Debug, Clone, Default)]
pub struct PathTraversalOptions {
    pub query: QueryOptions,
    /// Maximum number of hops; unbounded when `None`.
    pub max_depth: Option<u32>,
    pub relationship_types: Vec<String>,
    pub direction: Direction,
    pub node_labels: Vec<String>,
}

impl PathTraversalOptions {
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn relationship_types(
        mut self,
        types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.relationship_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn node_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.node_labels = labels.into_iter().map(Into::into).collect();
        self
    }
}
