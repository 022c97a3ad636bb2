//! Wire model for the session analytics backend.
//!
//! Every field the backend sends is optional on the wire. Records are
//! deserialized through loose `Raw*` shapes and then normalized once, here,
//! so consumers never branch on missing fields.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{
    macros::{format_description, offset},
    Date, OffsetDateTime, UtcOffset,
};

/// Offset the backend uses to cut calendar days (Asia/Singapore, no DST).
pub const REPORTING_OFFSET: UtcOffset = offset!(+8);

/// How a day's hits are attributed to community ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAttribution {
    /// Per-group counts reported by the backend.
    Exact { counts: BTreeMap<String, u32> },
    /// Legacy records only list which groups were active.
    Legacy { ids: BTreeSet<String> },
}

impl Default for GroupAttribution {
    fn default() -> Self {
        Self::Legacy {
            ids: BTreeSet::new(),
        }
    }
}

/// One calendar day returned by the range query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDailyRecord")]
pub struct DailyRecord {
    pub timestamp: OffsetDateTime,
    pub date_key: String,
    pub hit_count: u32,
    pub attribution: GroupAttribution,
    pub sids: Vec<String>,
    pub sample_sessions: Vec<SessionDetail>,
    pub has_more_sessions: bool,
}

impl DailyRecord {
    /// Hits for `group_id` on this day. Legacy records spread the day total
    /// evenly (rounded up) over the listed groups.
    pub fn group_hit_count(&self, group_id: &str) -> u32 {
        match &self.attribution {
            GroupAttribution::Exact { counts } => counts.get(group_id).copied().unwrap_or(0),
            GroupAttribution::Legacy { ids } => {
                if ids.contains(group_id) {
                    self.hit_count.div_ceil(ids.len() as u32)
                } else {
                    0
                }
            }
        }
    }

    /// Group ids this record attributes hits to.
    pub fn group_ids(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match &self.attribution {
            GroupAttribution::Exact { counts } => Box::new(counts.keys().map(String::as_str)),
            GroupAttribution::Legacy { ids } => Box::new(ids.iter().map(String::as_str)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDailyRecord {
    date: Option<String>,
    singapore_date: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    timestamp: Option<i64>,
    #[serde(deserialize_with = "lenient_u32")]
    hit_count: Option<u32>,
    #[serde(deserialize_with = "one_or_many")]
    community_ids: Vec<String>,
    community_id_hit_counts: Option<BTreeMap<String, Value>>,
    #[serde(deserialize_with = "one_or_many")]
    sids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    sample_sessions: Vec<SessionDetail>,
    #[serde(deserialize_with = "null_as_default")]
    has_more_sessions: bool,
}

impl From<RawDailyRecord> for DailyRecord {
    fn from(raw: RawDailyRecord) -> Self {
        let parsed_instant = raw.timestamp.and_then(instant_from_millis);
        let date_key = raw
            .singapore_date
            .filter(|key| !key.trim().is_empty())
            .or(raw.date.filter(|key| !key.trim().is_empty()))
            .or_else(|| parsed_instant.map(date_key_for))
            .unwrap_or_default();
        let timestamp = parsed_instant
            .or_else(|| start_of_day(&date_key))
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);

        let attribution = match raw.community_id_hit_counts {
            Some(counts) => GroupAttribution::Exact {
                counts: counts
                    .into_iter()
                    .map(|(id, value)| (id, value_as_u32(&value)))
                    .collect(),
            },
            None => GroupAttribution::Legacy {
                ids: raw
                    .community_ids
                    .into_iter()
                    .filter(|id| !id.is_empty())
                    .collect(),
            },
        };

        Self {
            timestamp,
            date_key,
            hit_count: raw.hit_count.unwrap_or(0),
            attribution,
            sids: raw.sids,
            sample_sessions: raw.sample_sessions,
            has_more_sessions: raw.has_more_sessions,
        }
    }
}

/// One network session that triggered an alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDetail {
    #[serde(deserialize_with = "lenient_text")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub index_name: String,
    #[serde(rename = "communityId", deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "one_or_many")]
    pub sid: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub source_ip: Option<String>,
    #[serde(deserialize_with = "lenient_port")]
    pub source_port: Option<u16>,
    #[serde(deserialize_with = "null_as_default")]
    pub dest_ip: Option<String>,
    #[serde(deserialize_with = "lenient_port")]
    pub dest_port: Option<u16>,
    #[serde(deserialize_with = "one_or_many")]
    pub snort_message: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub document_id: Option<String>,
}

/// Body of a successful range query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeSummary {
    #[serde(rename = "timeseriesData", deserialize_with = "null_as_default")]
    pub records: Vec<DailyRecord>,
    #[serde(deserialize_with = "lenient_u32_or_zero")]
    pub total_snort_hits: u32,
    #[serde(deserialize_with = "lenient_u32_or_zero")]
    pub total_unique_sessions: u32,
}

/// Body of a successful day-detail query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    pub sessions: Vec<SessionDetail>,
}

/// Calendar-day key for an instant, cut at [`REPORTING_OFFSET`]. Instants
/// that cannot be shifted to that offset keep their own calendar day.
pub fn date_key_for(instant: OffsetDateTime) -> String {
    let date = instant
        .checked_to_offset(REPORTING_OFFSET)
        .unwrap_or(instant)
        .date();
    format_date_key(date)
}

pub fn format_date_key(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date_key(key: &str) -> Option<Date> {
    Date::parse(key.trim(), format_description!("[year]-[month]-[day]")).ok()
}

fn start_of_day(date_key: &str) -> Option<OffsetDateTime> {
    parse_date_key(date_key).map(|date| date.midnight().assume_offset(REPORTING_OFFSET))
}

/// `None` also for instants with no calendar day at [`REPORTING_OFFSET`].
fn instant_from_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .filter(|instant| instant.checked_to_offset(REPORTING_OFFSET).is_some())
}

fn value_as_u32(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn value_as_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(value_as_text).collect(),
        other => value_as_text(other).into_iter().collect(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_text(value).unwrap_or_default())
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(value_as_u32(&other)),
    })
}

fn lenient_u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32(deserializer)?.unwrap_or(0))
}

fn lenient_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_record_uses_exact_counts() {
        let record: DailyRecord = serde_json::from_value(json!({
            "date": "2025-08-12",
            "singaporeDate": "2025-08-12",
            "timestamp": 1_754_928_000_000_i64,
            "hitCount": 7,
            "communityIds": ["1:aa", "1:bb"],
            "communityIdHitCounts": { "1:aa": 5, "1:bb": 2 },
            "sids": [2_100_498, 2_013_028],
            "sampleSessions": [],
            "hasMoreSessions": false
        }))
        .unwrap();

        assert_eq!(record.date_key, "2025-08-12");
        assert_eq!(record.hit_count, 7);
        assert_eq!(record.group_hit_count("1:aa"), 5);
        assert_eq!(record.group_hit_count("1:zz"), 0);
        assert_eq!(record.sids, vec!["2100498", "2013028"]);
        assert!(matches!(record.attribution, GroupAttribution::Exact { .. }));
    }

    #[test]
    fn legacy_record_spreads_hits_rounding_up() {
        let record: DailyRecord = serde_json::from_value(json!({
            "date": "2025-08-13",
            "timestamp": 1_755_014_400_000_i64,
            "hitCount": 5,
            "communityIds": ["1:aa", "1:bb"]
        }))
        .unwrap();

        assert_eq!(record.group_hit_count("1:aa"), 3);
        assert_eq!(record.group_hit_count("1:bb"), 3);
        assert_eq!(record.group_hit_count("1:cc"), 0);
    }

    #[test]
    fn empty_count_map_is_still_exact() {
        let record: DailyRecord = serde_json::from_value(json!({
            "singaporeDate": "2025-08-13",
            "hitCount": 4,
            "communityIds": ["1:aa"],
            "communityIdHitCounts": {}
        }))
        .unwrap();

        assert_eq!(record.group_hit_count("1:aa"), 0);
        assert_eq!(record.group_ids().count(), 0);
    }

    #[test]
    fn missing_fields_fall_back_to_safe_defaults() {
        let record: DailyRecord = serde_json::from_value(json!({
            "timestamp": 1_754_928_000_000_i64,
            "hitCount": null,
            "sampleSessions": null
        }))
        .unwrap();

        // 2025-08-11T16:00Z is midnight in the reporting offset.
        assert_eq!(record.date_key, "2025-08-12");
        assert_eq!(record.hit_count, 0);
        assert!(record.sample_sessions.is_empty());
        assert!(!record.has_more_sessions);
    }

    #[test]
    fn date_key_without_timestamp_anchors_to_start_of_day() {
        let record: DailyRecord =
            serde_json::from_value(json!({ "date": "2025-01-02", "hitCount": 1 })).unwrap();

        assert_eq!(date_key_for(record.timestamp), "2025-01-02");
    }

    #[test]
    fn timestamp_past_the_calendar_is_treated_as_missing() {
        let record: DailyRecord = serde_json::from_value(json!({
            "timestamp": 253_402_300_799_000_i64,
            "hitCount": 1
        }))
        .unwrap();

        assert_eq!(record.timestamp, OffsetDateTime::UNIX_EPOCH);
        assert_eq!(record.date_key, "");
        assert_eq!(record.hit_count, 1);

        let record: DailyRecord = serde_json::from_value(json!({
            "singaporeDate": "2025-01-02",
            "timestamp": 253_402_300_799_000_i64,
            "hitCount": 1
        }))
        .unwrap();

        assert_eq!(record.date_key, "2025-01-02");
        assert_eq!(date_key_for(record.timestamp), "2025-01-02");
    }

    #[test]
    fn date_key_at_the_end_of_the_calendar_keeps_its_day() {
        let last = time::PrimitiveDateTime::MAX.assume_utc();
        assert_eq!(date_key_for(last), "9999-12-31");
    }

    #[test]
    fn session_fields_accept_scalars_and_lists() {
        let session: SessionDetail = serde_json::from_value(json!({
            "timestamp": "2025-08-12T03:15:00Z",
            "indexName": "arkime_sessions3-250812",
            "documentId": "abc",
            "communityId": "1:aa",
            "sid": 2_100_498,
            "sourceIp": "10.0.0.1",
            "sourcePort": "51515",
            "destIp": "10.0.0.2",
            "destPort": 443,
            "snortMessage": "ET POLICY"
        }))
        .unwrap();

        assert_eq!(session.sid, vec!["2100498"]);
        assert_eq!(session.snort_message, vec!["ET POLICY"]);
        assert_eq!(session.source_port, Some(51515));
        assert_eq!(session.dest_port, Some(443));
        assert_eq!(session.group_id, "1:aa");
    }

    #[test]
    fn range_summary_reads_totals() {
        let summary: RangeSummary = serde_json::from_value(json!({
            "timeseriesData": [{ "date": "2025-01-01", "hitCount": 2 }],
            "totalSnortHits": 2,
            "totalUniqueSessions": 1
        }))
        .unwrap();

        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.total_snort_hits, 2);
        assert_eq!(summary.total_unique_sessions, 1);
    }
}
