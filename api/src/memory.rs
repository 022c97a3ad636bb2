//! In-process backend over fixed data. Used by tests and offline demos.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, VecDeque},
};

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::{
    backend::SessionBackend,
    error::ApiError,
    model::{DailyRecord, DayDetail, RangeSummary, SessionDetail},
    range::DateRange,
};

/// A call observed by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Range(DateRange),
    DayDetail { range: DateRange, date_key: String },
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Vec<DailyRecord>,
    day_sessions: BTreeMap<String, Vec<SessionDetail>>,
    failures: RefCell<VecDeque<ApiError>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MemoryBackend {
    pub fn new(records: Vec<DailyRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Full session list served by the day-detail call for `date_key`.
    pub fn with_day_sessions(mut self, date_key: impl Into<String>, sessions: Vec<SessionDetail>) -> Self {
        self.day_sessions.insert(date_key.into(), sessions);
        self
    }

    /// Make the next call fail with `error`. Failures queue up in order.
    pub fn fail_next(&self, error: ApiError) {
        self.failures.borrow_mut().push_back(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn take_failure(&self) -> Option<ApiError> {
        self.failures.borrow_mut().pop_front()
    }

    fn summarize(&self, range: &DateRange) -> RangeSummary {
        let records: Vec<DailyRecord> = self
            .records
            .iter()
            .filter(|record| range.contains_key(&record.date_key))
            .cloned()
            .collect();

        let total_snort_hits = records
            .iter()
            .fold(0u32, |total, record| total.saturating_add(record.hit_count));
        let unique: BTreeSet<&str> = records.iter().flat_map(DailyRecord::group_ids).collect();

        RangeSummary {
            total_snort_hits,
            total_unique_sessions: unique.len() as u32,
            records,
        }
    }
}

impl SessionBackend for MemoryBackend {
    fn query_range(&self, range: DateRange) -> LocalBoxFuture<'_, Result<RangeSummary, ApiError>> {
        self.calls.borrow_mut().push(RecordedCall::Range(range));

        let outcome = match self.take_failure() {
            Some(error) => Err(error),
            None => Ok(self.summarize(&range)),
        };
        future::ready(outcome).boxed_local()
    }

    fn query_day_detail(
        &self,
        range: DateRange,
        date_key: String,
    ) -> LocalBoxFuture<'_, Result<DayDetail, ApiError>> {
        self.calls.borrow_mut().push(RecordedCall::DayDetail {
            range,
            date_key: date_key.clone(),
        });

        let outcome = if let Some(error) = self.take_failure() {
            Err(error)
        } else if !range.contains_key(&date_key) {
            Err(ApiError::Server(
                "Target date must be within the specified date range".to_string(),
            ))
        } else {
            Ok(DayDetail {
                sessions: self.day_sessions.get(&date_key).cloned().unwrap_or_default(),
            })
        };
        future::ready(outcome).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn record(date_key: &str, counts: serde_json::Value) -> DailyRecord {
        serde_json::from_value(json!({
            "singaporeDate": date_key,
            "hitCount": 3,
            "communityIdHitCounts": counts,
        }))
        .unwrap()
    }

    #[test]
    fn range_query_filters_and_totals() {
        let backend = MemoryBackend::new(vec![
            record("2025-01-01", json!({ "1:aa": 2, "1:bb": 1 })),
            record("2025-01-05", json!({ "1:aa": 3 })),
            record("2025-02-01", json!({ "1:cc": 3 })),
        ]);
        let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();

        let summary = block_on(backend.query_range(range)).unwrap();

        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.total_snort_hits, 6);
        assert_eq!(summary.total_unique_sessions, 2);
        assert_eq!(backend.calls(), vec![RecordedCall::Range(range)]);
    }

    #[test]
    fn hit_total_saturates_instead_of_overflowing() {
        let busy_day = |date_key: &str| -> DailyRecord {
            serde_json::from_value(json!({ "singaporeDate": date_key, "hitCount": u32::MAX }))
                .unwrap()
        };
        let backend = MemoryBackend::new(vec![busy_day("2025-01-01"), busy_day("2025-01-02")]);
        let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();

        let summary = block_on(backend.query_range(range)).unwrap();
        assert_eq!(summary.total_snort_hits, u32::MAX);
    }

    #[test]
    fn primed_failure_is_returned_once() {
        let backend = MemoryBackend::default();
        let range = DateRange::parse("2025-01-01", "2025-01-02").unwrap();
        backend.fail_next(ApiError::Network("offline".into()));

        assert!(block_on(backend.query_range(range)).is_err());
        assert!(block_on(backend.query_range(range)).is_ok());
    }

    #[test]
    fn day_detail_outside_range_is_rejected() {
        let backend = MemoryBackend::default();
        let range = DateRange::parse("2025-01-01", "2025-01-02").unwrap();

        let err = block_on(backend.query_day_detail(range, "2025-03-01".into())).unwrap_err();
        assert!(err.server_message().is_some());
    }
}
