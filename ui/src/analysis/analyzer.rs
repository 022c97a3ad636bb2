//! Page-level state: the submitted range, its results and the drill-down.

use api::{ApiError, DateRange, RangeError, RangeSummary, SessionBackend};

use super::drilldown::{DrillDownError, DrillDownStore, LoadCommit, LoadRequest, LoadResponse};
use super::geometry::ChartGeometry;
use super::interaction::{HoverState, Interaction, InteractionController, PointerEvent};
use super::series::{build_series, CommunitySeries};

/// Shown when a range query fails without a usable server message.
pub const QUERY_FAILED_MESSAGE: &str = "Failed to fetch data.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Counters reported by the backend for the active range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeTotals {
    pub snort_hits: u32,
    pub unique_sessions: u32,
}

/// A submitted range query. Only the latest ticket may apply its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeTicket {
    generation: u64,
    pub range: DateRange,
}

impl RangeTicket {
    pub async fn fetch<B: SessionBackend + ?Sized>(self, backend: &B) -> RangeResponse {
        RangeResponse {
            generation: self.generation,
            range: self.range,
            result: backend.query_range(self.range).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeResponse {
    generation: u64,
    pub range: DateRange,
    pub result: Result<RangeSummary, ApiError>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerState {
    generation: u64,
    status: QueryStatus,
    range: Option<DateRange>,
    totals: Option<RangeTotals>,
    series: Vec<CommunitySeries>,
    interaction: InteractionController,
    drilldown: DrillDownStore,
}

impl AnalyzerState {
    pub fn status(&self) -> &QueryStatus {
        &self.status
    }

    pub fn is_querying(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Range that produced the current results.
    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn totals(&self) -> Option<RangeTotals> {
        self.totals
    }

    pub fn series(&self) -> &[CommunitySeries] {
        &self.series
    }

    pub fn hover(&self) -> &HoverState {
        self.interaction.hover_state()
    }

    pub fn drilldown(&self) -> &DrillDownStore {
        &self.drilldown
    }

    pub fn geometry(&self, width: f64, height: f64) -> ChartGeometry {
        ChartGeometry::compute(&self.series, width, height)
    }

    /// Validate the form input and start a new query. Every submit clears
    /// the previous results and selection; results of any query still in
    /// flight will be discarded.
    pub fn submit(&mut self, start: &str, end: &str) -> Result<RangeTicket, RangeError> {
        self.generation += 1;
        self.clear_results();

        let range = match DateRange::parse(start, end) {
            Ok(range) => range,
            Err(err) => {
                tracing::warn!(start, end, %err, "rejected date range");
                self.status = QueryStatus::Failed(err.to_string());
                return Err(err);
            }
        };
        self.status = QueryStatus::Loading;

        tracing::info!(%range, generation = self.generation, "querying range");
        Ok(RangeTicket {
            generation: self.generation,
            range,
        })
    }

    fn clear_results(&mut self) {
        self.range = None;
        self.totals = None;
        self.series.clear();
        self.interaction = InteractionController::default();
        self.drilldown.select(None);
    }

    /// Apply a finished range query. Returns `false` when a newer query has
    /// been submitted since.
    pub fn apply_range(&mut self, response: RangeResponse) -> bool {
        if response.generation != self.generation {
            tracing::debug!(
                range = %response.range,
                generation = response.generation,
                current = self.generation,
                "discarding stale range result"
            );
            return false;
        }

        match response.result {
            Ok(summary) => {
                self.series = build_series(&summary.records);
                self.totals = Some(RangeTotals {
                    snort_hits: summary.total_snort_hits,
                    unique_sessions: summary.total_unique_sessions,
                });
                self.range = Some(response.range);
                tracing::info!(
                    range = %response.range,
                    records = summary.records.len(),
                    series = self.series.len(),
                    "range loaded"
                );
                self.interaction = InteractionController::new(summary.records);
                self.status = QueryStatus::Ready;
            }
            Err(err) => {
                tracing::error!(range = %response.range, %err, "range query failed");
                self.status = QueryStatus::Failed(
                    err.server_message()
                        .unwrap_or(QUERY_FAILED_MESSAGE)
                        .to_string(),
                );
            }
        }
        true
    }

    /// Route a chart pointer event; clicks on non-empty points open the
    /// drill-down for that day.
    pub fn pointer(&mut self, event: PointerEvent) -> Interaction {
        let interaction = self.interaction.handle(event);
        if let Interaction::Selected(context) = &interaction {
            self.drilldown.select(Some(context.clone()));
        }
        interaction
    }

    /// True when `event` would change nothing; lets the view skip a write.
    pub fn is_redundant_pointer(&self, event: &PointerEvent) -> bool {
        self.interaction.is_redundant(event)
    }

    pub fn close_details(&mut self) {
        self.drilldown.select(None);
    }

    pub fn begin_load_all(&mut self) -> Result<LoadRequest, DrillDownError> {
        self.drilldown.begin_load(self.range)
    }

    pub fn complete_load(&mut self, response: LoadResponse) -> LoadCommit {
        self.drilldown.complete(response)
    }
}
