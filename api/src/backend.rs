//! Remote contract for the analytics backend and its HTTP implementation.

use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::ApiError,
    model::{DayDetail, RangeSummary},
    range::DateRange,
};

/// Env var overriding [`ApiConfig::base_url`] on native targets.
pub const API_URL_ENV: &str = "SESSIONSCOPE_API_URL";

/// Path the backend is mounted under on its origin.
pub const API_PATH: &str = "/api";

const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// The two remote calls the analyzer depends on.
///
/// Futures are not `Send`: the UI drives them from a single thread.
pub trait SessionBackend {
    fn query_range(&self, range: DateRange) -> LocalBoxFuture<'_, Result<RangeSummary, ApiError>>;

    fn query_day_detail(
        &self,
        range: DateRange,
        date_key: String,
    ) -> LocalBoxFuture<'_, Result<DayDetail, ApiError>>;
}

impl<B: SessionBackend + ?Sized> SessionBackend for Rc<B> {
    fn query_range(&self, range: DateRange) -> LocalBoxFuture<'_, Result<RangeSummary, ApiError>> {
        (**self).query_range(range)
    }

    fn query_day_detail(
        &self,
        range: DateRange,
        date_key: String,
    ) -> LocalBoxFuture<'_, Result<DayDetail, ApiError>> {
        (**self).query_day_detail(range, date_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_origin(DEFAULT_ORIGIN)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Backend served from `origin` under [`API_PATH`].
    pub fn for_origin(origin: &str) -> Self {
        Self::new(format!("{}{API_PATH}", origin.trim_end_matches('/')))
    }

    /// Default config, with the base URL taken from [`API_URL_ENV`] when set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Backend reached over HTTP: `GET {base}/sessions` and
/// `GET {base}/sessions/daily-details`.
#[derive(Debug, Clone, Default)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, ?query, "backend request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "backend returned an error status");
            return Err(ApiError::Server(format!(
                "HTTP error! Status: {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))
    }
}

impl SessionBackend for HttpBackend {
    fn query_range(&self, range: DateRange) -> LocalBoxFuture<'_, Result<RangeSummary, ApiError>> {
        async move {
            let body = self
                .get_text(
                    "sessions",
                    &[("start", range.start_key()), ("end", range.end_key())],
                )
                .await?;
            decode_range(&body)
        }
        .boxed_local()
    }

    fn query_day_detail(
        &self,
        range: DateRange,
        date_key: String,
    ) -> LocalBoxFuture<'_, Result<DayDetail, ApiError>> {
        async move {
            let body = self
                .get_text(
                    "sessions/daily-details",
                    &[
                        ("start", range.start_key()),
                        ("end", range.end_key()),
                        ("date", date_key),
                    ],
                )
                .await?;
            decode_day_detail(&body)
        }
        .boxed_local()
    }
}

/// Decode a range-query body, honouring the backend's `{ "error": ... }` envelope.
pub fn decode_range(body: &str) -> Result<RangeSummary, ApiError> {
    let value = parse_envelope(body)?;
    decode_value(value)
}

/// Decode a day-detail body. A body without `sessions` is an error, not an empty day.
pub fn decode_day_detail(body: &str) -> Result<DayDetail, ApiError> {
    let value = parse_envelope(body)?;
    match value.get("sessions") {
        Some(sessions) if !sessions.is_null() => decode_value(value),
        _ => Err(ApiError::Server(
            "No session data returned from server".to_string(),
        )),
    }
}

fn parse_envelope(body: &str) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        tracing::warn!(%err, "unreadable backend response");
        ApiError::Server("Unexpected response from server".to_string())
    })?;

    if let Some(error) = value.get("error").filter(|error| !error.is_null()) {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ApiError::Server(message));
    }

    Ok(value)
}

fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| {
        tracing::warn!(%err, "backend response did not match the expected shape");
        ApiError::Server("Unexpected response from server".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ApiConfig::new("http://example.test/api/");
        assert_eq!(
            config.endpoint("sessions/daily-details"),
            "http://example.test/api/sessions/daily-details"
        );
    }

    #[test]
    fn origin_config_mounts_the_api_path() {
        assert_eq!(
            ApiConfig::for_origin("https://soc.example.test/").base_url,
            "https://soc.example.test/api"
        );
        assert_eq!(ApiConfig::default().base_url, "http://localhost:8080/api");
    }

    #[test]
    fn error_envelope_becomes_server_error() {
        let err = decode_range(r#"{"error":"Start date cannot be after end date"}"#).unwrap_err();
        assert_eq!(
            err.server_message(),
            Some("Start date cannot be after end date")
        );
    }

    #[test]
    fn range_body_decodes_records() {
        let summary = decode_range(
            r#"{"timeseriesData":[{"singaporeDate":"2025-01-01","hitCount":5,
                "communityIdHitCounts":{"1:aa":5}}],"totalSnortHits":5,"totalUniqueSessions":1}"#,
        )
        .unwrap();
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].group_hit_count("1:aa"), 5);
    }

    #[test]
    fn day_detail_without_sessions_is_an_error() {
        let err = decode_day_detail(r#"{"date":"2025-01-01"}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server("No session data returned from server".to_string())
        );
    }

    #[test]
    fn day_detail_decodes_sessions() {
        let detail = decode_day_detail(
            r#"{"sessions":[{"communityId":"1:aa","sid":[1,2]}],"date":"2025-01-01","totalSessions":1}"#,
        )
        .unwrap();
        assert_eq!(detail.sessions.len(), 1);
        assert_eq!(detail.sessions[0].sid, vec!["1", "2"]);
    }

    #[test]
    fn garbage_body_is_a_server_error_without_details() {
        let err = decode_range("<html>").unwrap_err();
        assert!(matches!(err, ApiError::Server(_)));
    }
}
