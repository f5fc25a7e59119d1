//! Query index: the preloaded, immutable collection of searchable records.
//!
//! [`QueryIndex::lookup`] is a case-insensitive substring filter over record
//! names. It never ranks: matches come back in the index's native order. The
//! empty query deliberately returns nothing rather than everything.
//!
//! [`RecordSource`] is the async seam the search coordinator depends on. The
//! index implements it by answering immediately; a remote service would
//! suspend instead.

use crate::error::LookupError;
use crate::types::{Record, ResultSet};
use std::future::Future;
use std::sync::Arc;

/// Anything that can answer a query with a result set.
pub trait RecordSource: Send + Sync + 'static {
    fn lookup(&self, query: &str)
        -> impl Future<Output = Result<ResultSet, LookupError>> + Send;
}

impl<S: RecordSource> RecordSource for Arc<S> {
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ResultSet, LookupError>> + Send {
        (**self).lookup(query)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryIndex {
    records: Vec<Record>,
    /// Lowercased names, parallel to `records`. `None` for unnamed records.
    folded: Vec<Option<String>>,
}

impl QueryIndex {
    pub fn new(records: Vec<Record>) -> Self {
        let folded = records
            .iter()
            .map(|r| r.name.as_deref().map(str::to_lowercase))
            .collect();
        Self { records, folded }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record, in native order. Used to draw the full dataset.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn lookup(&self, query: &str) -> ResultSet {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.records
            .iter()
            .zip(&self.folded)
            .filter(|(_, name)| name.as_deref().is_some_and(|n| n.contains(&needle)))
            .map(|(record, _)| record.clone())
            .collect()
    }
}

impl RecordSource for QueryIndex {
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ResultSet, LookupError>> + Send {
        std::future::ready(Ok(QueryIndex::lookup(self, query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ports() -> QueryIndex {
        QueryIndex::new(vec![
            Record::new("Vancouver", Coordinates::new(-123.07, 49.29)),
            Record::new("Valencia", Coordinates::new(-0.31, 39.44)),
            Record::new("Osaka", Coordinates::new(135.43, 34.64)),
            Record {
                name: None,
                coordinates: Coordinates::new(1.0, 1.0),
                properties: Default::default(),
            },
        ])
    }

    fn names(results: &ResultSet) -> Vec<&str> {
        results.iter().map(Record::display_name).collect()
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(ports().lookup("").is_empty());
    }

    #[rstest]
    #[case("va", &["Vancouver", "Valencia"])]
    #[case("VA", &["Vancouver", "Valencia"])]
    #[case("osa", &["Osaka"])]
    #[case("a", &["Vancouver", "Valencia", "Osaka"])]
    #[case("lisbon", &[])]
    fn substring_match_is_case_insensitive(#[case] query: &str, #[case] expected: &[&str]) {
        assert_eq!(names(&ports().lookup(query)), expected);
    }

    #[test]
    fn unnamed_records_never_match() {
        let results = ports().lookup("unnamed");
        assert!(results.is_empty());
    }

    #[test]
    fn empty_index_is_not_an_error() {
        assert!(QueryIndex::default().lookup("va").is_empty());
    }

    #[tokio::test]
    async fn record_source_matches_sync_lookup() {
        let index = ports();
        let via_source = RecordSource::lookup(&index, "va").await.unwrap();
        assert_eq!(via_source, index.lookup("va"));
    }
}
