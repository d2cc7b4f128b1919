//! HTTP client for a remote reading log service.
//!
//! Issues `GET {base_url}/readings` with the query encoded as parameters:
//! `recorded_by`, `site_id`, `from`, `to` (RFC 3339) and `limit`. The
//! response is filtered and capped locally as well, so a server that
//! ignores some parameters still yields a correct window.

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use tracing::{debug, instrument};

use super::payload::{decode_entries, select_entries};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LogSourceConfig;
use crate::domain::ports::{ReadingLogEntry, ReadingLogQuery, ReadingLogSource};

/// HTTP-backed reading log.
#[derive(Debug, Clone)]
pub struct HttpReadingLog {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpReadingLog {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> DomainResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Client for the configured service, `None` when no base URL is set.
    pub fn from_config(config: &LogSourceConfig) -> DomainResult<Option<Self>> {
        config
            .base_url
            .as_deref()
            .map(|url| {
                Self::new(
                    url,
                    config.api_key.clone(),
                    Duration::from_secs(config.timeout_secs),
                )
            })
            .transpose()
    }

    fn query_params(query: &ReadingLogQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("recorded_by", query.recorded_by.clone()),
            ("from", query.window_start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("to", query.window_end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("limit", query.limit.to_string()),
        ];
        if let Some(site_id) = &query.site_id {
            params.push(("site_id", site_id.clone()));
        }
        params
    }
}

#[async_trait]
impl ReadingLogSource for HttpReadingLog {
    #[instrument(skip(self, query), fields(recorded_by = %query.recorded_by))]
    async fn fetch_readings(&self, query: &ReadingLogQuery) -> DomainResult<Vec<ReadingLogEntry>> {
        let url = format!("{}/readings", self.base_url);
        let mut request = self.http.get(&url).query(&Self::query_params(query));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let resp = request.send().await.map_err(|e| {
            DomainError::LogSourceUnavailable(format!("reading log request failed: {e}"))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::LogSourceUnavailable(format!(
                "reading log returned {status}: {body}"
            )));
        }

        let payload = resp.json::<serde_json::Value>().await.map_err(|e| {
            DomainError::SerializationError(format!("reading log parse failed: {e}"))
        })?;
        let entries = decode_entries(payload)?;
        debug!(received = entries.len(), "reading log responded");

        Ok(select_entries(&entries, query))
    }
}
