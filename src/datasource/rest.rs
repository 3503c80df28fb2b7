//! Hosted record store reached over a PostgREST-style HTTP API.

use super::{DataSourceError, DateRangeFilter, RecordStore, Row};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Reads tables from `{base_url}/rest/v1/{table}`.
#[derive(Clone)]
pub struct RestRecordStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for RestRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestRecordStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestRecordStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Query string for a table read, `select=*` plus `gte`/`lt` range bounds.
    pub fn query_params(filter: Option<&DateRangeFilter>) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(f) = filter {
            params.push((f.column.clone(), format!("gte.{}", f.from)));
            params.push((f.column.clone(), format!("lt.{}", f.until)));
        }
        params
    }

    async fn get_table(
        &self,
        table: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(&url)
                .query(params)
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if status == 404 {
                return Err(backoff::Error::permanent(DataSourceError::UnknownTable(
                    table.to_string(),
                )));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        filter: Option<&DateRangeFilter>,
    ) -> Result<Vec<Row>, DataSourceError> {
        debug!(table, ?filter, "Fetching records from hosted store");
        let params = Self::query_params(filter);
        let body = self.get_table(table, &params).await?;
        rows_from_body(body)
    }
}

fn rows_from_body(body: serde_json::Value) -> Result<Vec<Row>, DataSourceError> {
    let serde_json::Value::Array(items) = body else {
        return Err(DataSourceError::ParseError(
            "Expected array response".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(row) => Ok(row),
            other => Err(DataSourceError::ParseError(format!(
                "Expected object row, got {}",
                other
            ))),
        })
        .collect()
}
