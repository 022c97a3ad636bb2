//! End-to-end analyzer flow against the in-memory backend: query a range,
//! click a point, load the day's full session list.

use api::{ApiError, DailyRecord, MemoryBackend, RecordedCall, SessionDetail};
use futures::executor::block_on;
use serde_json::json;
use ui::analysis::{
    AnalyzerState, DrillDownError, Interaction, LoadCommit, PointerEvent, QueryStatus,
};
use ui::core::format;

fn records() -> Vec<DailyRecord> {
    serde_json::from_value(json!([
        {
            "singaporeDate": "2025-01-01",
            "timestamp": 1_735_660_800_000_i64,
            "hitCount": 5,
            "communityIdHitCounts": { "1:aa": 5 },
            "sampleSessions": [
                { "communityId": "1:aa", "documentId": "s-1", "sid": 2_100_498,
                  "sourceIp": "10.0.0.5", "sourcePort": "51515",
                  "destIp": "203.0.113.9", "destPort": 443,
                  "snortMessage": "ET POLICY curl User-Agent" },
                { "communityId": "1:bb", "documentId": "s-2" }
            ],
            "hasMoreSessions": true
        },
        {
            "singaporeDate": "2025-01-02",
            "timestamp": 1_735_747_200_000_i64,
            "hitCount": 0
        }
    ]))
    .unwrap()
}

fn full_day() -> Vec<SessionDetail> {
    (0..50)
        .map(|n| SessionDetail {
            group_id: if n < 20 { "1:aa" } else { "1:cc" }.to_string(),
            document_id: Some(format!("doc-{n}")),
            ..SessionDetail::default()
        })
        .collect()
}

fn loaded_state(backend: &MemoryBackend) -> AnalyzerState {
    let mut state = AnalyzerState::default();
    let ticket = state.submit("2025-01-01", "2025-01-31").unwrap();
    assert!(state.apply_range(block_on(ticket.fetch(backend))));
    state
}

fn click_first_point(state: &mut AnalyzerState) -> Interaction {
    let line = &state.series()[0];
    let event = PointerEvent::Click {
        group_id: line.group_id.clone(),
        point: line.points[0].clone(),
    };
    state.pointer(event)
}

#[test]
fn range_query_charts_positive_days_only() {
    let backend = MemoryBackend::new(records());
    let state = loaded_state(&backend);

    assert_eq!(state.status(), &QueryStatus::Ready);
    let series = state.series();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].group_id, "1:aa");
    let points: Vec<(&str, u32)> = series[0]
        .points
        .iter()
        .map(|point| (point.date_key.as_str(), point.hit_count))
        .collect();
    assert_eq!(points, vec![("2025-01-01", 5)]);

    let geometry = state.geometry(920.0, 420.0);
    let plot = geometry.plot().expect("plot");
    assert_eq!(plot.date_count, 1);
}

#[test]
fn click_then_load_all_narrows_to_the_group() {
    let backend = MemoryBackend::new(records()).with_day_sessions("2025-01-01", full_day());
    let mut state = loaded_state(&backend);

    let Interaction::Selected(context) = click_first_point(&mut state) else {
        panic!("expected a selection");
    };
    assert_eq!(context.selected_group_id.as_deref(), Some("1:aa"));
    assert_eq!(context.sample_sessions.len(), 1);

    let sample = &state.drilldown().displayed_sessions()[0];
    assert_eq!(format::join_or_na(&sample.sid), "2100498");
    assert_eq!(format::source_endpoint(sample), "10.0.0.5:51515");
    assert_eq!(format::dest_endpoint(sample), "203.0.113.9:443");
    assert_eq!(
        format::load_all_label(state.drilldown()).as_deref(),
        Some("Load All Sessions for Community ID")
    );

    let request = state.begin_load_all().unwrap();
    assert_eq!(
        state.begin_load_all(),
        Err(DrillDownError::LoadInFlight)
    );
    let commit = state.complete_load(block_on(request.fetch(&backend)));

    assert_eq!(commit, LoadCommit::Applied { sessions: 20 });
    assert_eq!(state.drilldown().displayed_sessions().len(), 20);
    assert_eq!(format::load_all_label(state.drilldown()), None);
    assert_eq!(
        format::sessions_header(state.drilldown()),
        "Showing 20 of 5 sessions for selected Community ID"
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[1],
        RecordedCall::DayDetail { date_key, .. } if date_key == "2025-01-01"
    ));
}

#[test]
fn failed_load_keeps_samples_and_allows_retry() {
    let backend = MemoryBackend::new(records()).with_day_sessions("2025-01-01", full_day());
    let mut state = loaded_state(&backend);
    click_first_point(&mut state);

    backend.fail_next(ApiError::Server("HTTP error! Status: 502".into()));
    let request = state.begin_load_all().unwrap();
    assert_eq!(
        state.complete_load(block_on(request.fetch(&backend))),
        LoadCommit::Failed
    );
    assert_eq!(state.drilldown().error(), Some("HTTP error! Status: 502"));
    assert_eq!(state.drilldown().displayed_sessions().len(), 1);

    let request = state.begin_load_all().unwrap();
    assert_eq!(
        state.complete_load(block_on(request.fetch(&backend))),
        LoadCommit::Applied { sessions: 20 }
    );
    assert_eq!(state.drilldown().error(), None);
}

#[test]
fn new_query_invalidates_an_in_flight_load() {
    let backend = MemoryBackend::new(records()).with_day_sessions("2025-01-01", full_day());
    let mut state = loaded_state(&backend);
    click_first_point(&mut state);
    let request = state.begin_load_all().unwrap();

    let ticket = state.submit("2025-01-01", "2025-01-15").unwrap();
    assert!(state.drilldown().context().is_none());

    assert_eq!(
        state.complete_load(block_on(request.fetch(&backend))),
        LoadCommit::Discarded
    );
    state.apply_range(block_on(ticket.fetch(&backend)));
    assert!(state.drilldown().displayed_sessions().is_empty());
    assert_eq!(state.series().len(), 1);
}

#[test]
fn load_all_without_selection_names_the_missing_day() {
    let backend = MemoryBackend::new(records());
    let mut state = loaded_state(&backend);

    let err = state.begin_load_all().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required data for loading sessions: selectedDay"
    );
    assert_eq!(backend.calls().len(), 1);
}
