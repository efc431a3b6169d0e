// Time-series store client. Points are written to an InfluxDB 1.x server over
// its HTTP API, one line-protocol line per request.
//
// The reqwest client is built without a timeout: a hung store stalls the
// request that is writing to it and nothing else.
use crate::point::DataPoint;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store at {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store rejected request with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Sink for decoded data points. Shared by all request handlers, so
/// implementations must tolerate concurrent calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointWriter: Send + Sync {
    async fn write_point(&self, point: &DataPoint) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct InfluxClient {
    http: Client,
    base_url: String,
    database: String,
}

impl InfluxClient {
    pub fn new(host: &str, port: u16, database: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: format!("http://{host}:{port}"),
            database: database.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Create the target database if needed. The server treats an existing
    /// database as success; any other refusal is logged and ignored so the
    /// service can still write to a database provisioned out of band. Only a
    /// connection failure is returned as an error.
    pub async fn ensure_database(&self) -> Result<(), StoreError> {
        let url = format!("{}/query", self.base_url);
        let statement = format!("CREATE DATABASE \"{}\"", self.database.replace('"', "\\\""));

        let res = self
            .http
            .post(&url)
            .query(&[("q", statement.as_str())])
            .send()
            .await
            .map_err(|source| StoreError::Unreachable { url: url.clone(), source })?;

        let status = res.status();
        let body = read_body(res).await;

        match statement_error(status, &body) {
            None => info!(database = %self.database, "database ready"),
            Some(reason) => warn!(
                database = %self.database,
                %status,
                %reason,
                "could not create database, assuming it already exists"
            ),
        }
        Ok(())
    }
}

#[async_trait]
impl PointWriter for InfluxClient {
    async fn write_point(&self, point: &DataPoint) -> Result<(), StoreError> {
        let url = format!("{}/write", self.base_url);
        let line = point.to_line_protocol();
        debug!(%line, "writing point");

        let res = self
            .http
            .post(&url)
            .query(&[("db", self.database.as_str()), ("precision", "ns")])
            .body(line)
            .send()
            .await
            .map_err(|source| StoreError::Unreachable { url, source })?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let body = read_body(res).await;
        Err(StoreError::Rejected { status, body })
    }
}

async fn read_body(res: reqwest::Response) -> String {
    let url = res.url().to_string();
    match res.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(%url, error = %e, "failed to read store response body");
            String::new()
        }
    }
}

/// Extract the failure reason from a `/query` response, if any. InfluxDB
/// reports statement errors either through the status code or inside a 200
/// body as `{"results":[{"error":"..."}]}`.
fn statement_error(status: StatusCode, body: &str) -> Option<String> {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let embedded = parsed.as_ref().and_then(|v| {
        v.get("error")
            .or_else(|| v.get("results")?.get(0)?.get("error"))
            .and_then(|e| e.as_str())
            .map(str::to_string)
    });

    match embedded {
        Some(reason) => Some(reason),
        None if !status.is_success() => Some(body.trim().to_string()),
        None => None,
    }
}
