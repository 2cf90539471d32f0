//! Name resolution: turns a query name into an A record set or a typed
//! failure.
//!
//! This is the boundary the protocol engine calls. Nothing panics or
//! propagates past [`NameResolver::resolve`]: every lookup outcome, including
//! malformed data from the daemon, collapses into either a single-record
//! answer or a [`ResolveFailure`] chosen by configuration. An escaped error
//! here would stop the server from answering anything at all.

use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordSet, RecordType};
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DnsConfig;
use crate::directory::ContainerDirectory;

/// How a failed resolution is answered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveFailure {
    /// The name conclusively does not exist (NXDOMAIN).
    #[error("no such domain")]
    NameError,

    /// Could not answer; a secondary resolver may still try (SERVFAIL).
    #[error("server failure")]
    ServerFailure,
}

/// Resolves query names against the container directory.
#[derive(Clone)]
pub struct NameResolver {
    directory: ContainerDirectory,
    config: DnsConfig,
}

impl NameResolver {
    /// Create a resolver over the given directory and configuration.
    pub fn new(directory: ContainerDirectory, config: DnsConfig) -> Self {
        Self { directory, config }
    }

    /// The resolver's configuration.
    pub fn config(&self) -> &DnsConfig {
        &self.config
    }

    /// Resolve a query name to an A record set.
    ///
    /// A hit yields exactly one A record with the configured TTL. Every
    /// miss, including a container with an empty address and any backend
    /// failure already absorbed by the directory, is classified per
    /// `respond_nxdomain_on_miss`.
    pub async fn resolve(&self, name: &str) -> Result<RecordSet, ResolveFailure> {
        let Some(address) = self.directory.get_address(name).await else {
            debug!(name, "no address for query name");
            return Err(self.miss());
        };

        let ip: Ipv4Addr = match address.parse() {
            Ok(ip) => ip,
            Err(_) => {
                warn!(name, address, "daemon reported an unparsable IPv4 address");
                return Err(self.miss());
            }
        };

        let dns_name = match Name::from_ascii(name) {
            Ok(dns_name) => dns_name,
            Err(err) => {
                warn!(name, error = %err, "query name is not encodable");
                return Err(self.miss());
            }
        };

        debug!(name, %ip, "resolved query name");
        Ok(self.a_record_set(dns_name, ip))
    }

    fn miss(&self) -> ResolveFailure {
        if self.config.respond_nxdomain_on_miss {
            ResolveFailure::NameError
        } else {
            ResolveFailure::ServerFailure
        }
    }

    /// Build the single-record answer set for a hit.
    fn a_record_set(&self, name: Name, ip: Ipv4Addr) -> RecordSet {
        let mut record_set = RecordSet::new(name.clone(), RecordType::A, 0);
        let mut record = Record::from_rdata(name, self.config.ttl, RData::A(A::from(ip)));
        record.set_dns_class(DNSClass::IN);
        record_set.insert(record, 0);
        record_set
    }
}
