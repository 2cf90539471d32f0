//! Hickory DNS authority backed by the container name resolver.
//!
//! This is the glue between the DNS protocol engine and [`NameResolver`]:
//! it serves A queries for any name (ID-form names and bare hostnames share
//! no common suffix, so the authority claims the root origin) and translates
//! [`ResolveFailure`] into wire response codes.

use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{LowerName, Name, RecordType};
use hickory_server::authority::{
    Authority, LookupControlFlow, LookupError, LookupOptions, LookupRecords, MessageRequest,
    UpdateResult, ZoneType,
};
use hickory_server::server::RequestInfo;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::metrics::{self, QueryResult, Timer};
use crate::resolver::{NameResolver, ResolveFailure};

/// Authority that answers A queries from live container state.
pub struct DockerAuthority {
    origin: LowerName,
    resolver: NameResolver,
}

impl DockerAuthority {
    /// Create an authority over the given resolver.
    pub fn new(resolver: NameResolver) -> Self {
        Self {
            origin: LowerName::new(&Name::root()),
            resolver,
        }
    }
}

#[async_trait]
impl Authority for DockerAuthority {
    type Lookup = LookupRecords;

    fn zone_type(&self) -> ZoneType {
        // The AA header bit follows from the zone type.
        if self.resolver.config().authoritative {
            ZoneType::Primary
        } else {
            ZoneType::External
        }
    }

    fn is_axfr_allowed(&self) -> bool {
        false
    }

    fn origin(&self) -> &LowerName {
        &self.origin
    }

    async fn lookup(
        &self,
        name: &LowerName,
        rtype: RecordType,
        lookup_options: LookupOptions,
    ) -> LookupControlFlow<Self::Lookup> {
        let timer = Timer::start();
        let rtype_str = format!("{:?}", rtype);

        let name_str = name.to_string();
        // Remove the trailing dot for directory matching.
        let lookup_name = name_str.trim_end_matches('.');

        trace!(name = %lookup_name, rtype = ?rtype, "DNS lookup");

        match rtype {
            RecordType::A => match self.resolver.resolve(lookup_name).await {
                Ok(record_set) => {
                    debug!(name = %lookup_name, "A lookup: returning record");
                    metrics::record_query(&rtype_str, QueryResult::Success, timer.elapsed());
                    LookupControlFlow::Break(Ok(LookupRecords::new(
                        lookup_options,
                        Arc::new(record_set),
                    )))
                }
                Err(ResolveFailure::NameError) => {
                    debug!(name = %lookup_name, "A lookup: no such domain");
                    metrics::record_query(&rtype_str, QueryResult::NxDomain, timer.elapsed());
                    LookupControlFlow::Break(Err(LookupError::ResponseCode(ResponseCode::NXDomain)))
                }
                Err(ResolveFailure::ServerFailure) => {
                    debug!(name = %lookup_name, "A lookup: answering SERVFAIL");
                    metrics::record_query(&rtype_str, QueryResult::ServFail, timer.elapsed());
                    LookupControlFlow::Break(Err(LookupError::ResponseCode(ResponseCode::ServFail)))
                }
            },
            RecordType::AAAA => {
                // Container addresses are IPv4 only.
                debug!(name = %lookup_name, "AAAA lookup: IPv6 not supported");
                metrics::record_query(&rtype_str, QueryResult::Unsupported, timer.elapsed());
                LookupControlFlow::Break(Err(LookupError::ResponseCode(ResponseCode::NoError)))
            }
            _ => {
                trace!(name = %lookup_name, rtype = ?rtype, "unsupported record type");
                metrics::record_query(&rtype_str, QueryResult::Unsupported, timer.elapsed());
                LookupControlFlow::Break(Err(LookupError::ResponseCode(ResponseCode::NoError)))
            }
        }
    }

    async fn search(
        &self,
        request_info: RequestInfo<'_>,
        lookup_options: LookupOptions,
    ) -> LookupControlFlow<Self::Lookup> {
        self.lookup(
            request_info.query.name(),
            request_info.query.query_type(),
            lookup_options,
        )
        .await
    }

    async fn get_nsec_records(
        &self,
        _name: &LowerName,
        _lookup_options: LookupOptions,
    ) -> LookupControlFlow<Self::Lookup> {
        // DNSSEC not supported
        LookupControlFlow::Break(Err(LookupError::ResponseCode(ResponseCode::NoError)))
    }

    async fn update(&self, _update: &MessageRequest) -> UpdateResult<bool> {
        // Dynamic updates not supported
        Err(ResponseCode::NotImp)
    }
}
