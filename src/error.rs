//! Error types for docker-dns.

use thiserror::Error;

/// Errors that can occur while setting up or running the DNS server.
///
/// Query-time lookup failures never surface here: the resolver absorbs them
/// and answers with a DNS response code instead (see [`crate::resolver`]).
#[derive(Debug, Error)]
pub enum DnsError {
    /// IO error (socket bind, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error (from Docker client initialization)
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to parse address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
