//! Pointer events on the chart → hover presentation and day selection.

use std::sync::atomic::{AtomicU64, Ordering};

use api::{DailyRecord, SessionDetail};

use super::series::DataPoint;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one selection. Two contexts built from the same click on the
/// same day are still different selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The day (and community) an analyst drilled into.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDayContext {
    id: ContextId,
    pub date_key: String,
    /// Hits of the selected community on that day.
    pub hit_count: u32,
    pub sids: Vec<String>,
    pub sample_sessions: Vec<SessionDetail>,
    pub selected_group_id: Option<String>,
    pub has_more_sessions: bool,
}

impl SelectedDayContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Context for a day whose raw record is unknown: no samples, but the full
    /// load stays available.
    pub fn detached(date_key: impl Into<String>, hit_count: u32, group_id: Option<String>) -> Self {
        Self {
            id: ContextId::next(),
            date_key: date_key.into(),
            hit_count,
            sids: Vec::new(),
            sample_sessions: Vec::new(),
            selected_group_id: group_id,
            has_more_sessions: true,
        }
    }

    fn from_record(record: &DailyRecord, group_id: &str, hit_count: u32) -> Self {
        Self {
            id: ContextId::next(),
            date_key: record.date_key.clone(),
            hit_count,
            sids: record.sids.clone(),
            sample_sessions: record
                .sample_sessions
                .iter()
                .filter(|session| session.group_id == group_id)
                .cloned()
                .collect(),
            selected_group_id: Some(group_id.to_string()),
            has_more_sessions: record.has_more_sessions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub date_key: String,
    pub group_id: String,
    pub hit_count: u32,
}

/// Presentational state of the chart. `Default` is the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    pub emphasized: bool,
    pub tooltip: Option<Tooltip>,
}

impl HoverState {
    /// Whether the point for `group_id` on `date_key` is the hovered one.
    pub fn is_emphasized(&self, group_id: &str, date_key: &str) -> bool {
        self.emphasized
            && self
                .tooltip
                .as_ref()
                .is_some_and(|tip| tip.group_id == group_id && tip.date_key == date_key)
    }
}

fn hovered(group_id: &str, point: &DataPoint) -> HoverState {
    HoverState {
        emphasized: true,
        tooltip: Some(Tooltip {
            date_key: point.date_key.clone(),
            group_id: group_id.to_string(),
            hit_count: point.hit_count,
        }),
    }
}

/// Events the render surface reports for a data point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Hover { group_id: String, point: DataPoint },
    Move { group_id: String, point: DataPoint },
    Leave,
    Click { group_id: String, point: DataPoint },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Presentation(HoverState),
    Selected(SelectedDayContext),
    Ignored,
}

/// Owns the raw records behind the current chart so clicks can recover the
/// full day (samples, flags) rather than just the plotted count.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    records: Vec<DailyRecord>,
    hover: HoverState,
}

impl InteractionController {
    pub fn new(records: Vec<DailyRecord>) -> Self {
        Self {
            records,
            hover: HoverState::default(),
        }
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn hover_state(&self) -> &HoverState {
        &self.hover
    }

    pub fn hover(&mut self, group_id: &str, point: &DataPoint) -> &HoverState {
        self.hover = hovered(group_id, point);
        &self.hover
    }

    /// Whether `event` would leave the presentation exactly as it is.
    /// Clicks always count as changes.
    pub fn is_redundant(&self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::Hover { group_id, point } | PointerEvent::Move { group_id, point } => {
                self.hover == hovered(group_id, point)
            }
            PointerEvent::Leave => self.hover == HoverState::default(),
            PointerEvent::Click { .. } => false,
        }
    }

    pub fn unhover(&mut self) -> &HoverState {
        self.hover = HoverState::default();
        &self.hover
    }

    /// Select the clicked day. Points without hits select nothing.
    pub fn click(&self, group_id: &str, point: &DataPoint) -> Option<SelectedDayContext> {
        if point.hit_count == 0 {
            return None;
        }

        let context = match self
            .records
            .iter()
            .find(|record| record.date_key == point.date_key)
        {
            Some(record) => SelectedDayContext::from_record(record, group_id, point.hit_count),
            None => {
                tracing::warn!(
                    date_key = %point.date_key,
                    group_id,
                    "clicked point has no matching daily record"
                );
                SelectedDayContext::detached(
                    point.date_key.clone(),
                    point.hit_count,
                    Some(group_id.to_string()),
                )
            }
        };

        tracing::debug!(
            date_key = %context.date_key,
            group_id,
            samples = context.sample_sessions.len(),
            "day selected"
        );
        Some(context)
    }

    pub fn handle(&mut self, event: PointerEvent) -> Interaction {
        match event {
            PointerEvent::Hover { group_id, point } | PointerEvent::Move { group_id, point } => {
                Interaction::Presentation(self.hover(&group_id, &point).clone())
            }
            PointerEvent::Leave => Interaction::Presentation(self.unhover().clone()),
            PointerEvent::Click { group_id, point } => match self.click(&group_id, &point) {
                Some(context) => Interaction::Selected(context),
                None => Interaction::Ignored,
            },
        }
    }
}
