//! Docker Engine API client and container data model.
//!
//! Lookups are defined against the [`ContainerApi`] trait so the directory
//! and resolver can be exercised in tests without a running daemon.
//! [`DockerClient`] is the HTTP implementation against the Engine REST API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from the Docker Engine API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The container does not exist (HTTP 404). An expected miss, not a fault.
    #[error("container not found")]
    NotFound,

    /// The daemon could not be reached or the request failed in transit.
    #[error("docker daemon request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The daemon answered with an unexpected status code.
    #[error("unexpected docker daemon response: {0}")]
    UnexpectedStatus(StatusCode),

    /// The daemon answered with a body we could not interpret.
    #[error("malformed docker daemon response: {0}")]
    Malformed(String),
}

/// Minimal listing entry from the bulk enumeration endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSummary {
    /// Container ID as reported by the daemon.
    #[serde(rename = "Id")]
    pub id: String,
}

/// Full container record from a per-ID inspect call.
#[derive(Debug, Clone)]
pub struct ContainerDetail {
    /// Container ID.
    pub id: String,
    /// Configured hostname (`Config.Hostname`), empty if unset.
    pub hostname: String,
    /// IPv4 address (`NetworkSettings.IPAddress`). Empty means the container
    /// currently has no assigned address, which is distinct from not-found.
    pub ip_address: String,
    /// The full inspect document as returned by the daemon.
    pub raw: Value,
}

impl ContainerDetail {
    /// Build a detail record from a raw inspect document.
    /// Returns `None` if the document carries no container ID.
    pub fn from_value(raw: Value) -> Option<Self> {
        // Old daemons reported "ID", newer ones "Id".
        let id = raw
            .get("Id")
            .or_else(|| raw.get("ID"))?
            .as_str()?
            .to_string();
        let hostname = value_at(&raw, &["Config", "Hostname"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let ip_address = value_at(&raw, &["NetworkSettings", "IPAddress"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self {
            id,
            hostname,
            ip_address,
            raw,
        })
    }

    /// Look up a nested value in the raw inspect document.
    pub fn value_at(&self, path: &[&str]) -> Option<&Value> {
        value_at(&self.raw, path)
    }
}

/// Walk a nested JSON document along an ordered list of object keys.
pub fn value_at<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = doc;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// Container registry operations the directory needs.
#[async_trait]
pub trait ContainerApi: Send + Sync {
    /// Enumerate containers. With `all`, stopped containers are included.
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ApiError>;

    /// Inspect a single container by ID or ID prefix.
    async fn inspect(&self, id: &str) -> Result<ContainerDetail, ApiError>;
}

/// HTTP client for the Docker Engine REST API.
#[derive(Debug, Clone)]
pub struct DockerClient {
    http: reqwest::Client,
    base_url: String,
}

impl DockerClient {
    /// Create a client for the daemon at `docker_url`.
    pub fn new(docker_url: &str) -> Result<Self, crate::error::DnsError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: docker_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ContainerApi for DockerClient {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ApiError> {
        let url = format!("{}/containers/json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("all", if all { "true" } else { "false" })])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::UnexpectedStatus(response.status()));
        }

        Ok(response.json().await?)
    }

    async fn inspect(&self, id: &str) -> Result<ContainerDetail, ApiError> {
        let url = format!("{}/containers/{}/json", self.base_url, id);
        let response = self.http.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status if status.is_success() => {
                let raw: Value = response.json().await?;
                ContainerDetail::from_value(raw)
                    .ok_or_else(|| ApiError::Malformed("inspect document has no Id".to_string()))
            }
            status => Err(ApiError::UnexpectedStatus(status)),
        }
    }
}
