//! Daily records → dense per-community time series.

use std::collections::{BTreeMap, BTreeSet};

use api::DailyRecord;
use time::OffsetDateTime;

use super::color::{color_for, Color};

#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub date: OffsetDateTime,
    pub date_key: String,
    pub hit_count: u32,
}

/// One line on the chart: a community id with a point for every axis day.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunitySeries {
    pub group_id: String,
    pub color: Color,
    pub points: Vec<DataPoint>,
}

impl CommunitySeries {
    pub fn max_hit_count(&self) -> u32 {
        self.points.iter().map(|point| point.hit_count).max().unwrap_or(0)
    }

    pub fn total_hits(&self) -> u64 {
        self.points.iter().map(|point| u64::from(point.hit_count)).sum()
    }
}

/// A day on the canonical axis with its per-group counts already resolved.
#[derive(Debug, Clone)]
struct AxisDay {
    date: OffsetDateTime,
    date_key: String,
    counts: BTreeMap<String, u32>,
}

/// Build one series per community id seen on days with hits.
///
/// The axis is the sorted set of date keys of records with `hit_count > 0`;
/// every series carries exactly one point per axis day (zero where the
/// community had no hits) and series without any hit are dropped. Records
/// sharing a date key are merged by summing their counts, so the result is
/// independent of input order. Series come out sorted by group id.
pub fn build_series(records: &[DailyRecord]) -> Vec<CommunitySeries> {
    let axis = canonical_axis(records);

    let group_ids: BTreeSet<&str> = axis
        .iter()
        .flat_map(|day| day.counts.keys().map(String::as_str))
        .collect();

    let series: Vec<CommunitySeries> = group_ids
        .into_iter()
        .filter_map(|group_id| {
            let points: Vec<DataPoint> = axis
                .iter()
                .map(|day| DataPoint {
                    date: day.date,
                    date_key: day.date_key.clone(),
                    hit_count: day.counts.get(group_id).copied().unwrap_or(0),
                })
                .collect();

            points
                .iter()
                .any(|point| point.hit_count > 0)
                .then(|| CommunitySeries {
                    group_id: group_id.to_string(),
                    color: color_for(group_id),
                    points,
                })
        })
        .collect();

    tracing::debug!(
        records = records.len(),
        axis_days = axis.len(),
        series = series.len(),
        "built community series"
    );
    series
}

/// Sorted date keys of the days that will appear on the chart.
pub fn date_axis(records: &[DailyRecord]) -> Vec<String> {
    canonical_axis(records)
        .into_iter()
        .map(|day| day.date_key)
        .collect()
}

fn canonical_axis(records: &[DailyRecord]) -> Vec<AxisDay> {
    let mut days: BTreeMap<&str, AxisDay> = BTreeMap::new();

    for record in records.iter().filter(|record| record.hit_count > 0) {
        let day = days
            .entry(record.date_key.as_str())
            .or_insert_with(|| AxisDay {
                date: record.timestamp,
                date_key: record.date_key.clone(),
                counts: BTreeMap::new(),
            });
        day.date = day.date.min(record.timestamp);

        for group_id in record.group_ids() {
            let count = day.counts.entry(group_id.to_string()).or_insert(0);
            *count = count.saturating_add(record.group_hit_count(group_id));
        }
    }

    let mut axis: Vec<AxisDay> = days.into_values().collect();
    axis.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.date_key.cmp(&b.date_key)));
    axis
}
