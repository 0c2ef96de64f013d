//! Session capability traits at the connection boundary.
//!
//! The core borrows a [`Session`] from a [`SessionProvider`] for exactly
//! one operation: acquire, run one query, close, unconditionally. The
//! provider owns pooling, retries, TLS, and timeouts; the core defines no
//! timeout of its own and propagates cancellation untouched.

use async_trait::async_trait;

use crate::error::OgmError;
use crate::graph::value::{Params, ResultSet};

/// One borrowed unit of work against the store.
#[async_trait]
pub trait Session: Send + Sync {
    /// Executes one query with bound parameters and materializes the
    /// result rows in order.
    async fn run(&self, cypher: &str, params: Params) -> Result<ResultSet, OgmError>;

    /// Releases the session. Idempotent; always called, success or
    /// failure.
    async fn close(&self) -> Result<(), OgmError>;
}

/// Hands out sessions; the only shared resource crossing the boundary.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquires a session, or `ConnectionUnavailable` when the boundary
    /// reports not-connected.
    async fn session(&self) -> Result<Box<dyn Session>, OgmError>;
}

/// Transaction lifecycle for the external transaction collaborator.
///
/// The core never begins transactions itself; this trait exists so a
/// backend can expose explicit commit/rollback to callers that need it.
#[async_trait]
pub trait Transaction: Session {
    /// Commits, making all changes permanent. The transaction must not
    /// be used afterwards.
    async fn commit(self: Box<Self>) -> Result<(), OgmError>;

    /// Rolls back, discarding all changes.
    async fn rollback(self: Box<Self>) -> Result<(), OgmError>;
}
