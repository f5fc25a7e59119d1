//! Fake record sources.
//!
//! [`DelayedSource`] answers from an in-memory [`QueryIndex`] after a
//! per-query delay, or fails for queries marked as failing or rejected. Every call is
//! logged so harnesses can assert on what was actually looked up.

use parking_lot::Mutex;
use portscope_core::error::LookupError;
use portscope_core::index::{QueryIndex, RecordSource};
use portscope_core::{Record, ResultSet};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

pub struct DelayedSource {
    index: QueryIndex,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    failing: HashSet<String>,
    rejected: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl DelayedSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            index: QueryIndex::new(records),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            failing: HashSet::new(),
            rejected: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Resolve `query` only after `ms` milliseconds of (tokio) time.
    pub fn delay(mut self, query: &str, ms: u64) -> Self {
        self.delays
            .insert(query.to_string(), Duration::from_millis(ms));
        self
    }

    pub fn default_delay(mut self, ms: u64) -> Self {
        self.default_delay = Duration::from_millis(ms);
        self
    }

    /// Make lookups for `query` fail with [`LookupError::Unavailable`].
    pub fn failing(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Make lookups for `query` fail with [`LookupError::Failed`].
    pub fn rejecting(mut self, query: &str, reason: &str) -> Self {
        self.rejected.insert(query.to_string(), reason.to_string());
        self
    }

    /// Queries looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// What the underlying index would answer, for expectations.
    pub fn expected(&self, query: &str) -> ResultSet {
        self.index.lookup(query)
    }
}

impl RecordSource for DelayedSource {
    fn lookup(&self, query: &str) -> impl Future<Output = Result<ResultSet, LookupError>> + Send {
        self.calls.lock().push(query.to_string());
        let delay = self
            .delays
            .get(query)
            .copied()
            .unwrap_or(self.default_delay);
        let result = if self.failing.contains(query) {
            Err(LookupError::Unavailable("fake backend down".to_string()))
        } else if let Some(reason) = self.rejected.get(query) {
            Err(LookupError::Failed {
                query: query.to_string(),
                reason: reason.clone(),
            })
        } else {
            Ok(self.index.lookup(query))
        };
        async move {
            tokio::time::sleep(delay).await;
            result
        }
    }
}
