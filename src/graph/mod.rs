//! Session boundary: the value model, capability traits, and backend
//! adapters for executing generated queries.
//!
//! The core only ever sees [`Session`] and [`SessionProvider`]; anything
//! about pooling, retries, or the wire protocol lives behind a backend.

mod traits;
mod value;

#[cfg(test)]
pub(crate) mod testing;

pub mod backends;

pub use traits::{Session, SessionProvider, Transaction};
pub use value::{
    CellValue, NodeValue, Params, PathSegment, PathValue, Record, RelationshipValue, ResultSet,
};

use crate::error::OgmError;
use crate::query::GeneratedQuery;

/// Runs one generated query with scoped session acquisition.
///
/// The session is acquired, used for exactly one `run`, and closed on
/// every exit path before the caller observes the outcome. A `run`
/// failure takes precedence over a `close` failure.
pub(crate) async fn run_scoped(
    provider: &dyn SessionProvider,
    query: GeneratedQuery,
) -> Result<ResultSet, OgmError> {
    let session = provider.session().await?;
    tracing::debug!(cypher = %query.text, "executing generated query");
    let outcome = session.run(&query.text, query.parameters).await;
    let closed = session.close().await;
    let rows = outcome?;
    closed?;
    Ok(rows)
}
