//! docker-dns - A custom-TLD DNS server backed by live Docker container state.
//!
//! This crate serves A records for running (and stopped) containers by asking
//! the Docker daemon at query time. There is no zone file and no cache: the
//! answer always reflects the daemon's current view.
//!
//! ## Query forms
//!
//! - `<hostname>` — exact match against a container's configured hostname,
//!   e.g. `sneaky-foxes`
//! - `<id>.docker` — a container ID (or ID prefix) under the `.docker`
//!   pseudo-TLD, e.g. `0949efde23b.docker`
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          docker-dns                            │
//! │                                                                │
//! │  UDP/TCP :53 ──▶ Hickory DNS ──▶ DockerAuthority               │
//! │                  Server              │                         │
//! │                                      ▼                         │
//! │                               NameResolver                     │
//! │                          (A record / NXDOMAIN / SERVFAIL)      │
//! │                                      │                         │
//! │                                      ▼                         │
//! │                            ContainerDirectory                  │
//! │                         (ID-form / hostname scan)              │
//! │                                      │                         │
//! │                                      ▼                         │
//! │                          Docker Engine API (HTTP)              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Miss handling
//!
//! When no container matches (or a matching container has no address yet),
//! the answer is NXDOMAIN by default. With `respond_nxdomain_on_miss = false`
//! the server answers SERVFAIL instead, so a secondary resolver gets a chance
//! at the name. Daemon failures degrade to the same miss handling; the server
//! never stops answering because the backend is flaky.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use docker_dns::{DnsConfig, DnsServer, DockerClient};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = DockerClient::new("http://localhost:2375").unwrap();
//!     let server = DnsServer::new(DnsConfig::default(), Arc::new(client));
//!     server.run(CancellationToken::new()).await.unwrap();
//! }
//! ```

#![warn(missing_docs)]

pub mod authority;
pub mod config;
pub mod directory;
pub mod docker;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod server;
pub mod telemetry;


// Re-export main types
pub use config::{BindProtocol, Config, DnsConfig, DockerConfig, TelemetryConfig};
pub use directory::ContainerDirectory;
pub use docker::{ContainerApi, ContainerDetail, ContainerSummary, DockerClient};
pub use error::DnsError;
pub use resolver::{NameResolver, ResolveFailure};
pub use server::DnsServer;
