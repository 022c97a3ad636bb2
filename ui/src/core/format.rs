//! Formatting helpers for presenting sessions and chart labels.

use api::SessionDetail;

use crate::analysis::{DrillDownStore, Tooltip};

const ABBREVIATE_OVER: usize = 20;

/// Shorten long community ids to `first8...last4`.
pub fn abbreviate_group_id(group_id: &str) -> String {
    let chars: Vec<char> = group_id.chars().collect();
    if chars.len() <= ABBREVIATE_OVER {
        return group_id.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        "N/A".to_string()
    } else {
        values.join(", ")
    }
}

pub fn endpoint(ip: Option<&str>, port: Option<u16>) -> String {
    let ip = ip.filter(|ip| !ip.is_empty()).unwrap_or("N/A");
    match port {
        Some(port) => format!("{ip}:{port}"),
        None => format!("{ip}:N/A"),
    }
}

pub fn source_endpoint(session: &SessionDetail) -> String {
    endpoint(session.source_ip.as_deref(), session.source_port)
}

pub fn dest_endpoint(session: &SessionDetail) -> String {
    endpoint(session.dest_ip.as_deref(), session.dest_port)
}

pub fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

pub fn tooltip_lines(tooltip: &Tooltip) -> [String; 3] {
    [
        format!("Date: {}", tooltip.date_key),
        format!("Community ID: {}", tooltip.group_id),
        format!("Snort Hits: {}", tooltip.hit_count),
    ]
}

/// "Showing X of Y sessions", naming the group filter when one applies.
pub fn sessions_header(store: &DrillDownStore) -> String {
    let shown = store.displayed_sessions().len();
    let total = store.context().map_or(0, |context| context.hit_count);
    let filtered = store
        .context()
        .is_some_and(|context| context.selected_group_id.is_some());
    let suffix = if filtered {
        " for selected Community ID"
    } else {
        ""
    };
    format!("Showing {shown} of {total} sessions{suffix}")
}

/// Label for the full-load button, or `None` when it should be hidden.
pub fn load_all_label(store: &DrillDownStore) -> Option<String> {
    if !store.can_load_more() {
        return None;
    }
    let context = store.context()?;
    if store.is_loading() {
        return Some("Loading...".to_string());
    }
    Some(match context.selected_group_id {
        Some(_) => "Load All Sessions for Community ID".to_string(),
        None => format!("Load All {} Sessions", context.hit_count),
    })
}
