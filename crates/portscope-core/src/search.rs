//! Search coordinator — turns "the user typed something" into an applied
//! result set with a take-latest policy.
//!
//! Every [`SearchCoordinator::submit`] bumps a generation counter and spawns
//! the lookup on the runtime. When a lookup completes it applies its result
//! only if its captured generation is still the current one; otherwise the
//! result is discarded. The generation check and the store write happen under
//! the same lock, so a superseded lookup can never overwrite a newer result,
//! whatever order the lookups finish in.
//!
//! Cancellation is cooperative. A superseded lookup keeps running to
//! completion and is ignored when it arrives.
//!
//! ```text
//!          submit(q)                  lookup done (current gen)
//!  Idle ───────────────► Pending(q) ─────────────────────────► Idle
//!    ▲                      │  ▲
//!    │     submit("")       │  │ submit(q')
//!    └──────────────────────┘  └──── (supersedes q)
//! ```

use crate::index::RecordSource;
use crate::store::ViewStore;
use crate::types::SearchStatus;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Observable coordinator phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Pending { generation: u64, query: String },
}

/// What happened to a dispatched lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result set was written to the store.
    Applied { generation: u64, results: usize },
    /// A later submit superseded this lookup; its result was discarded.
    Superseded { generation: u64 },
    /// The lookup failed while still current. Results were left unchanged.
    Failed { generation: u64, reason: String },
}

#[derive(Debug)]
struct Flight {
    generation: u64,
    pending: Option<String>,
}

struct Inner<S> {
    source: S,
    store: ViewStore,
    flight: Mutex<Flight>,
}

/// Cloneable take-latest dispatcher between user input and a [`RecordSource`].
pub struct SearchCoordinator<S> {
    inner: Arc<Inner<S>>,
    runtime: Handle,
}

impl<S> Clone for SearchCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S: RecordSource> SearchCoordinator<S> {
    /// Lookups are spawned on `runtime`.
    pub fn new(source: S, store: ViewStore, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                flight: Mutex::new(Flight {
                    generation: 0,
                    pending: None,
                }),
            }),
            runtime,
        }
    }

    pub fn store(&self) -> &ViewStore {
        &self.inner.store
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Generation of the most recent submit.
    pub fn generation(&self) -> u64 {
        self.inner.flight.lock().generation
    }

    pub fn phase(&self) -> SearchPhase {
        let flight = self.inner.flight.lock();
        match &flight.pending {
            Some(query) => SearchPhase::Pending {
                generation: flight.generation,
                query: query.clone(),
            },
            None => SearchPhase::Idle,
        }
    }

    /// Record intent to search for `query`.
    ///
    /// An empty query skips the source entirely: the result set is cleared
    /// immediately and `None` is returned. Otherwise the lookup is spawned and
    /// its handle returned. Awaiting the handle is optional.
    pub fn submit(&self, query: impl Into<String>) -> Option<JoinHandle<Outcome>> {
        let query = query.into();

        if query.is_empty() {
            let mut flight = self.inner.flight.lock();
            flight.generation += 1;
            flight.pending = None;
            tracing::debug!(generation = flight.generation, "search: cleared");
            self.inner.store.update(|d| {
                d.set_results(Vec::new());
                d.set_status(SearchStatus::Idle);
            });
            return None;
        }

        let generation = {
            let mut flight = self.inner.flight.lock();
            flight.generation += 1;
            flight.pending = Some(query.clone());
            self.inner.store.set_status(SearchStatus::Pending);
            flight.generation
        };
        tracing::debug!(query = %query, generation, "search: dispatched");

        let inner = self.inner.clone();
        Some(self.runtime.spawn(async move {
            let result = inner.source.lookup(&query).await;
            inner.complete(generation, &query, result)
        }))
    }
}

impl<S> Inner<S> {
    fn complete(
        &self,
        generation: u64,
        query: &str,
        result: Result<crate::types::ResultSet, crate::error::LookupError>,
    ) -> Outcome {
        let mut flight = self.flight.lock();
        if flight.generation != generation {
            tracing::debug!(
                query = %query,
                generation,
                current = flight.generation,
                "search: superseded result discarded"
            );
            return Outcome::Superseded { generation };
        }
        flight.pending = None;

        match result {
            Ok(results) => {
                let count = results.len();
                self.store.update(|d| {
                    d.set_results(results);
                    d.set_status(SearchStatus::Idle);
                });
                tracing::debug!(query = %query, generation, results = count, "search: applied");
                Outcome::Applied {
                    generation,
                    results: count,
                }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(query = %query, generation, error = %e, "search: lookup failed");
                self.store
                    .set_status(SearchStatus::Unavailable(reason.clone()));
                Outcome::Failed { generation, reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::QueryIndex;
    use crate::types::{CameraState, Coordinates, Record};
    use pretty_assertions::assert_eq;

    fn coordinator() -> SearchCoordinator<QueryIndex> {
        let index = QueryIndex::new(vec![
            Record::new("Vancouver", Coordinates::new(-123.07, 49.29)),
            Record::new("Valencia", Coordinates::new(-0.31, 39.44)),
            Record::new("Osaka", Coordinates::new(135.43, 34.64)),
        ]);
        let store = ViewStore::new(CameraState::new(Coordinates::new(0.0, 0.0), 2.0));
        SearchCoordinator::new(index, store, Handle::current())
    }

    #[tokio::test]
    async fn submit_applies_results() {
        let search = coordinator();
        let outcome = search.submit("va").unwrap().await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Applied {
                generation: 1,
                results: 2
            }
        );
        assert_eq!(search.store().state().results.len(), 2);
        assert_eq!(search.store().state().status, SearchStatus::Idle);
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn empty_query_clears_without_lookup() {
        let search = coordinator();
        search.submit("osa").unwrap().await.unwrap();
        assert!(search.submit("").is_none());
        assert!(search.store().state().results.is_empty());
        assert_eq!(search.generation(), 2);
    }

    #[tokio::test]
    async fn pending_phase_tracks_latest_query() {
        let search = coordinator();
        let first = search.submit("va").unwrap();
        let second = search.submit("osa").unwrap();
        assert_eq!(
            search.phase(),
            SearchPhase::Pending {
                generation: 2,
                query: "osa".to_string()
            }
        );
        assert_eq!(
            first.await.unwrap(),
            Outcome::Superseded { generation: 1 }
        );
        second.await.unwrap();
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn clear_supersedes_in_flight_lookup() {
        let search = coordinator();
        let handle = search.submit("va").unwrap();
        search.submit("");
        assert_eq!(handle.await.unwrap(), Outcome::Superseded { generation: 1 });
        assert!(search.store().state().results.is_empty());
    }
}
