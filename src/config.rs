//! Configuration types for docker-dns.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::DnsError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// DNS server configuration.
    #[serde(default)]
    pub dns: DnsConfig,

    /// Docker daemon connection configuration.
    #[serde(default)]
    pub docker: DockerConfig,

    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Transport protocols the server can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindProtocol {
    /// DNS over UDP datagrams.
    Udp,
    /// DNS over TCP streams.
    Tcp,
}

/// DNS server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Interface address to bind ("" means all interfaces).
    #[serde(default)]
    pub bind_interface: String,

    /// Port to bind (UDP and/or TCP).
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Protocols to serve.
    #[serde(default = "default_bind_protocols")]
    pub bind_protocols: Vec<BindProtocol>,

    /// TTL for answer records in seconds.
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Whether answers carry the authoritative (AA) bit.
    #[serde(default = "default_true")]
    pub authoritative: bool,

    /// On a miss, answer NXDOMAIN when true; SERVFAIL when false.
    ///
    /// SERVFAIL lets a secondary resolver have a chance at the name instead
    /// of asserting it does not exist.
    #[serde(default = "default_true")]
    pub respond_nxdomain_on_miss: bool,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            bind_interface: String::new(),
            bind_port: default_bind_port(),
            bind_protocols: default_bind_protocols(),
            ttl: default_ttl(),
            authoritative: true,
            respond_nxdomain_on_miss: true,
        }
    }
}

impl DnsConfig {
    /// Resolve `bind_interface`/`bind_port` into a socket address.
    /// An empty interface means all IPv4 interfaces.
    pub fn listen_addr(&self) -> Result<SocketAddr, DnsError> {
        let ip: IpAddr = if self.bind_interface.is_empty() {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            self.bind_interface
                .parse()
                .map_err(|_| DnsError::InvalidAddress(self.bind_interface.clone()))?
        };
        Ok(SocketAddr::new(ip, self.bind_port))
    }
}

/// Docker daemon connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Base URL of the Docker Engine API (e.g., "http://localhost:2375").
    #[serde(default = "default_docker_url")]
    pub docker_url: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            docker_url: default_docker_url(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g., "info", "debug", "docker_dns=debug,warn").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus metrics exporter address.
    #[serde(default)]
    pub prometheus_addr: Option<SocketAddr>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            prometheus_addr: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_port() -> u16 {
    53
}

fn default_bind_protocols() -> Vec<BindProtocol> {
    vec![BindProtocol::Udp, BindProtocol::Tcp]
}

fn default_ttl() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_docker_url() -> String {
    "http://localhost:2375".to_string()
}
