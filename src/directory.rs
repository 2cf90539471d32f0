//! Container directory: translates DNS query names into container records.
//!
//! Two query shapes are understood:
//! - ID-form: `<token>.docker`, where the token is handed straight to the
//!   daemon's inspect endpoint (which accepts ID prefixes).
//! - Hostname-form: anything else, matched by exact equality against each
//!   container's configured hostname.
//!
//! The directory never surfaces a hard error. A flaky daemon degrades to
//! "not found" so the server keeps answering; failures are logged here.

use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::docker::{ApiError, ContainerApi, ContainerDetail};
use crate::metrics;

/// Path to the configured hostname in an inspect document.
const HOSTNAME_PATH: &[&str] = &["Config", "Hostname"];

static ID_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z0-9]+)\.docker$").expect("invalid ID-form pattern"));

/// Looks up container data for DNS query names. No protocol awareness.
#[derive(Clone)]
pub struct ContainerDirectory {
    api: Arc<dyn ContainerApi>,
}

impl ContainerDirectory {
    /// Create a directory over the given registry client.
    pub fn new(api: Arc<dyn ContainerApi>) -> Self {
        Self { api }
    }

    /// Find the container matching a query name, or `None`.
    ///
    /// A daemon failure is indistinguishable from an absent container by
    /// design: callers always get `None` and the server stays up.
    pub async fn lookup_container(&self, name: &str) -> Option<ContainerDetail> {
        if let Some(captures) = ID_FORM.captures(name) {
            let candidate = captures.get(1)?.as_str();
            debug!(name, candidate, "ID-form lookup");
            match self.api.inspect(candidate).await {
                Ok(detail) => Some(detail),
                Err(ApiError::NotFound) => {
                    debug!(name, "no container for ID-form query");
                    None
                }
                Err(err) => {
                    warn!(name, error = %err, "container inspect failed");
                    metrics::record_backend_error("inspect");
                    None
                }
            }
        } else {
            debug!(name, "hostname-form lookup");
            self.first_matching(HOSTNAME_PATH, &Value::from(name)).await
        }
    }

    /// Get the IPv4 address for a query name.
    ///
    /// Returns `None` when the container is absent or exists without an
    /// assigned address; the two are computed via different paths but look
    /// the same to callers.
    pub async fn get_address(&self, name: &str) -> Option<String> {
        let container = self.lookup_container(name).await?;

        if container.ip_address.is_empty() {
            debug!(name, id = %container.id, "container has no assigned address");
            return None;
        }

        Some(container.ip_address)
    }

    /// Whether `get_address` would return an address for this name.
    pub async fn has_address(&self, name: &str) -> bool {
        self.get_address(name).await.is_some()
    }

    /// First container (in enumeration order) whose inspect document at
    /// `path` equals `value`.
    ///
    /// When several containers match, whichever the daemon lists first wins.
    /// That is input-order-determinism, not a policy; do not add a tie-break.
    async fn first_matching(&self, path: &[&str], value: &Value) -> Option<ContainerDetail> {
        let summaries = match self.api.list_containers(true).await {
            Ok(summaries) => summaries,
            Err(err) => {
                warn!(error = %err, "container enumeration failed");
                metrics::record_backend_error("list");
                return None;
            }
        };

        for summary in summaries {
            let detail = match self.api.inspect(&summary.id).await {
                Ok(detail) => detail,
                Err(ApiError::NotFound) => {
                    // Removed between list and inspect.
                    debug!(id = %summary.id, "container vanished during scan");
                    continue;
                }
                Err(err) => {
                    warn!(id = %summary.id, error = %err, "inspect failed during scan");
                    metrics::record_backend_error("inspect");
                    continue;
                }
            };

            if detail.value_at(path) == Some(value) {
                return Some(detail);
            }
        }

        None
    }

    /// IDs of all containers whose inspect document at `path` equals `value`.
    pub async fn ids_matching(&self, path: &[&str], value: &Value) -> Vec<String> {
        let summaries = match self.api.list_containers(true).await {
            Ok(summaries) => summaries,
            Err(err) => {
                warn!(error = %err, "container enumeration failed");
                metrics::record_backend_error("list");
                return Vec::new();
            }
        };

        let mut ids = Vec::new();
        for summary in summaries {
            match self.api.inspect(&summary.id).await {
                Ok(detail) => {
                    if detail.value_at(path) == Some(value) {
                        ids.push(detail.id);
                    }
                }
                Err(ApiError::NotFound) => continue,
                Err(err) => {
                    warn!(id = %summary.id, error = %err, "inspect failed during scan");
                    metrics::record_backend_error("inspect");
                }
            }
        }
        ids
    }
}
