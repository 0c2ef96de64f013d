//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::di::Context as ContextDerive;
use crate::graph::SessionProvider;
use crate::schema::SchemaCatalog;

/// Root application context for dependency injection.
///
/// The Context holds all shared dependencies and uses `#[derive(Context)]`
/// to generate `FromRef` implementations for each field, enabling
/// compile-time dependency resolution. Two contexts over the same catalog
/// but different providers stay fully independent.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Registered node and relationship schemas.
    pub catalog: Arc<SchemaCatalog>,
    /// Session boundary to the graph store.
    pub sessions: Arc<dyn SessionProvider>,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(catalog: SchemaCatalog, sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions,
        }
    }
}
