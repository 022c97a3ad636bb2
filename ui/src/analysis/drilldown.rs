//! Session list for a selected day: samples first, full list on demand.

use std::fmt;

use api::{ApiError, DateRange, DayDetail, SessionBackend, SessionDetail};
use thiserror::Error;

use super::interaction::{ContextId, SelectedDayContext};

/// Shown when a full load fails without a usable server message.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load all sessions";

/// Which inputs were missing when a full load was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingData {
    pub selected_day: bool,
    pub date_range: bool,
}

impl fmt::Display for MissingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (self.selected_day, "selectedDay"),
            (self.date_range, "dateRange"),
        ]
        .into_iter()
        .filter_map(|(missing, name)| missing.then_some(name))
        .collect();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillDownError {
    #[error("Missing required data for loading sessions: {0}")]
    Validation(MissingData),
    #[error("Sessions for this day are already loading")]
    LoadInFlight,
    #[error("All sessions for this day are already shown")]
    AlreadyLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Showing the sample sessions carried by the daily record.
    #[default]
    Idle,
    Loading,
    /// Showing the full session list for the selected group.
    Loaded,
}

/// A full-load request captured against one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub context_id: ContextId,
    pub range: DateRange,
    pub date_key: String,
}

impl LoadRequest {
    pub async fn fetch<B: SessionBackend + ?Sized>(self, backend: &B) -> LoadResponse {
        let result = backend
            .query_day_detail(self.range, self.date_key.clone())
            .await;
        LoadResponse {
            context_id: self.context_id,
            date_key: self.date_key,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadResponse {
    pub context_id: ContextId,
    pub date_key: String,
    pub result: Result<DayDetail, ApiError>,
}

/// What happened to a [`LoadResponse`] handed back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCommit {
    Applied { sessions: usize },
    Failed,
    /// The selection changed while the request was in flight.
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrillDownStore {
    context: Option<SelectedDayContext>,
    phase: LoadPhase,
    full_sessions: Vec<SessionDetail>,
    error: Option<String>,
}

impl DrillDownStore {
    pub fn context(&self) -> Option<&SelectedDayContext> {
        self.context.as_ref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn showing_all(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the selection. A different selection resets the full list and
    /// any error; re-selecting the same one keeps them.
    pub fn select(&mut self, context: Option<SelectedDayContext>) {
        let same = match (&self.context, &context) {
            (Some(current), Some(next)) => current.id() == next.id(),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }

        if let Some(previous) = &self.context {
            if self.phase == LoadPhase::Loading {
                tracing::debug!(date_key = %previous.date_key, "selection changed during load");
            }
        }
        self.reset();
        self.context = context;
    }

    pub fn reset(&mut self) {
        self.phase = LoadPhase::Idle;
        self.full_sessions.clear();
        self.error = None;
    }

    pub fn displayed_sessions(&self) -> &[SessionDetail] {
        match (&self.context, self.phase) {
            (Some(_), LoadPhase::Loaded) => &self.full_sessions,
            (Some(context), _) => &context.sample_sessions,
            (None, _) => &[],
        }
    }

    pub fn can_load_more(&self) -> bool {
        self.context
            .as_ref()
            .is_some_and(|context| context.has_more_sessions)
            && self.phase != LoadPhase::Loaded
    }

    /// Start loading every session of the selected day within `range`.
    pub fn begin_load(&mut self, range: Option<DateRange>) -> Result<LoadRequest, DrillDownError> {
        match self.phase {
            LoadPhase::Loading => return Err(DrillDownError::LoadInFlight),
            LoadPhase::Loaded => return Err(DrillDownError::AlreadyLoaded),
            LoadPhase::Idle => {}
        }

        let (context, range) = match (&self.context, range) {
            (Some(context), Some(range)) => (context, range),
            (context, range) => {
                let err = DrillDownError::Validation(MissingData {
                    selected_day: context.is_none(),
                    date_range: range.is_none(),
                });
                tracing::warn!(%err, "cannot load sessions");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let request = LoadRequest {
            context_id: context.id(),
            range,
            date_key: context.date_key.clone(),
        };
        tracing::info!(date_key = %request.date_key, %range, "loading all sessions");

        self.phase = LoadPhase::Loading;
        self.error = None;
        Ok(request)
    }

    /// Apply a finished load if it still belongs to the current selection.
    pub fn complete(&mut self, response: LoadResponse) -> LoadCommit {
        let current = self.context.as_ref().map(SelectedDayContext::id);
        if current != Some(response.context_id) || self.phase != LoadPhase::Loading {
            tracing::debug!(date_key = %response.date_key, "discarding stale session load");
            return LoadCommit::Discarded;
        }

        let selected_group = self
            .context
            .as_ref()
            .and_then(|context| context.selected_group_id.clone());

        match response.result {
            Ok(detail) => {
                let fetched = detail.sessions.len();
                self.full_sessions = match selected_group {
                    Some(group_id) => detail
                        .sessions
                        .into_iter()
                        .filter(|session| session.group_id == group_id)
                        .collect(),
                    None => detail.sessions,
                };
                self.phase = LoadPhase::Loaded;
                self.error = None;
                tracing::info!(
                    date_key = %response.date_key,
                    fetched,
                    kept = self.full_sessions.len(),
                    "sessions loaded"
                );
                LoadCommit::Applied {
                    sessions: self.full_sessions.len(),
                }
            }
            Err(err) => {
                tracing::error!(date_key = %response.date_key, %err, "session load failed");
                self.phase = LoadPhase::Idle;
                self.error = Some(
                    err.server_message()
                        .unwrap_or(LOAD_FAILED_MESSAGE)
                        .to_string(),
                );
                LoadCommit::Failed
            }
        }
    }
}
