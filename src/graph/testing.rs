//! Recording session mock shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::OgmError;
use crate::graph::{Params, ResultSet, Session, SessionProvider};

#[derive(Default)]
struct LogInner {
    queries: Vec<(String, Params)>,
    results: VecDeque<ResultSet>,
}

/// Shared log of executed queries plus a queue of canned results.
#[derive(Clone, Default)]
pub(crate) struct MockSessionLog {
    inner: Arc<Mutex<LogInner>>,
}

impl MockSessionLog {
    /// Queues the result for the next `run`. Unqueued runs yield an
    /// empty result set.
    pub(crate) fn push_result(&self, rows: ResultSet) {
        self.inner.lock().unwrap().results.push_back(rows);
    }

    pub(crate) fn queries(&self) -> Vec<(String, Params)> {
        self.inner.lock().unwrap().queries.clone()
    }
}

pub(crate) struct MockProvider {
    log: MockSessionLog,
}

impl MockProvider {
    pub(crate) fn new(log: MockSessionLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl SessionProvider for MockProvider {
    async fn session(&self) -> Result<Box<dyn Session>, OgmError> {
        Ok(Box::new(MockSession {
            log: self.log.clone(),
        }))
    }
}

struct MockSession {
    log: MockSessionLog,
}

#[async_trait]
impl Session for MockSession {
    async fn run(&self, cypher: &str, params: Params) -> Result<ResultSet, OgmError> {
        let mut inner = self.log.inner.lock().unwrap();
        inner.queries.push((cypher.to_string(), params));
        Ok(inner.results.pop_front().unwrap_or_default())
    }

    async fn close(&self) -> Result<(), OgmError> {
        Ok(())
    }
}
