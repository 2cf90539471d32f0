//! Shared test infrastructure for wire-level resolution tests.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder, BinEncoder};
use hickory_server::authority::{
    Authority, AuthorityObject, Catalog, MessageRequest, MessageResponse,
};
use hickory_server::proto::rr::Record;
use hickory_server::proto::xfer::Protocol;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use serde_json::{json, Value};

use docker_dns::authority::DockerAuthority;
use docker_dns::config::DnsConfig;
use docker_dns::directory::ContainerDirectory;
use docker_dns::docker::{ApiError, ContainerApi, ContainerDetail, ContainerSummary};
use docker_dns::resolver::NameResolver;

// --- Mock Docker API ---

/// In-memory registry client over fixed inspect documents.
///
/// Like the real daemon, `inspect` accepts any unique ID prefix.
pub struct MockDockerApi {
    docs: Vec<Value>,
    fail_list: bool,
    fail_inspect: bool,
}

impl MockDockerApi {
    pub fn new(docs: Vec<Value>) -> Self {
        Self {
            docs,
            fail_list: false,
            fail_inspect: false,
        }
    }

    /// Two addressable containers and one stopped container with an empty
    /// address.
    pub fn with_menagerie() -> Self {
        Self::new(vec![
            json!({
                "Id": "cidpandaslong",
                "Config": { "Hostname": "cuddly-pandas" },
                "NetworkSettings": { "IPAddress": "127.0.0.1" },
            }),
            json!({
                "Id": "cidfoxeslong",
                "Config": { "Hostname": "sneaky-foxes" },
                "NetworkSettings": { "IPAddress": "8.8.8.8" },
            }),
            json!({
                "Id": "cidslothslong",
                "Config": { "Hostname": "stopped-sloths" },
                "NetworkSettings": { "IPAddress": "" },
            }),
        ])
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_inspect(mut self) -> Self {
        self.fail_inspect = true;
        self
    }

    fn backend_error() -> ApiError {
        ApiError::UnexpectedStatus(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[async_trait]
impl ContainerApi for MockDockerApi {
    async fn list_containers(&self, _all: bool) -> Result<Vec<ContainerSummary>, ApiError> {
        if self.fail_list {
            return Err(Self::backend_error());
        }

        Ok(self
            .docs
            .iter()
            .filter_map(|doc| doc.get("Id").and_then(Value::as_str))
            .map(|id| ContainerSummary { id: id.to_string() })
            .collect())
    }

    async fn inspect(&self, id: &str) -> Result<ContainerDetail, ApiError> {
        if self.fail_inspect {
            return Err(Self::backend_error());
        }

        self.docs
            .iter()
            .find(|doc| {
                doc.get("Id")
                    .and_then(Value::as_str)
                    .is_some_and(|full| full.starts_with(id))
            })
            .and_then(|doc| ContainerDetail::from_value(doc.clone()))
            .ok_or(ApiError::NotFound)
    }
}

// --- TestResponseHandler ---

/// Captures the serialized DNS response for inspection in tests.
///
/// Implements `ResponseHandler` so it can be passed to
/// `Catalog::handle_request()`. The response is serialized via
/// `MessageResponse::destructive_emit()` and stored as raw wire-format bytes,
/// which can then be parsed with `Message::from_vec()`.
#[derive(Clone)]
pub struct TestResponseHandler {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl TestResponseHandler {
    pub fn new() -> Self {
        Self {
            buf: Arc::new(Mutex::new(Vec::with_capacity(512))),
        }
    }

    /// Parse the captured wire bytes into a `Message` for assertions.
    pub fn into_message(self) -> Message {
        let buf = self.buf.lock().unwrap();
        assert!(!buf.is_empty(), "no response was captured");
        Message::from_vec(&buf).expect("failed to parse captured DNS response")
    }
}

#[async_trait]
impl ResponseHandler for TestResponseHandler {
    async fn send_response<'a>(
        &mut self,
        response: MessageResponse<
            '_,
            'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
        >,
    ) -> io::Result<ResponseInfo> {
        let mut buf = self.buf.lock().unwrap();
        buf.clear();
        let mut encoder = BinEncoder::new(&mut *buf);
        encoder.set_max_size(u16::MAX);
        let info = response
            .destructive_emit(&mut encoder)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(info)
    }
}

// --- Config builders ---

pub fn test_dns_config() -> DnsConfig {
    DnsConfig {
        bind_interface: "127.0.0.1".to_string(),
        bind_port: 5353,
        ..DnsConfig::default()
    }
}

pub fn servfail_dns_config() -> DnsConfig {
    DnsConfig {
        respond_nxdomain_on_miss: false,
        ..test_dns_config()
    }
}

pub fn non_authoritative_dns_config() -> DnsConfig {
    DnsConfig {
        authoritative: false,
        ..test_dns_config()
    }
}

// --- Query/Request construction ---

/// Build wire-format bytes for a DNS query.
pub fn build_query_bytes(name: &str, record_type: RecordType, id: u16) -> Vec<u8> {
    let mut msg = Message::new();
    msg.set_id(id);
    msg.set_message_type(MessageType::Query);
    msg.set_op_code(OpCode::Query);
    msg.set_recursion_desired(true);
    let mut query = Query::new();
    query.set_name(Name::from_ascii(name).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);
    msg.add_query(query);
    msg.to_vec().unwrap()
}

/// Parse wire bytes into a MessageRequest.
pub fn parse_message_request(bytes: &[u8]) -> MessageRequest {
    let mut decoder = BinDecoder::new(bytes);
    MessageRequest::read(&mut decoder).expect("failed to parse MessageRequest")
}

/// Build a full `Request` for a query name.
pub fn build_request(name: &str, record_type: RecordType, id: u16) -> Request {
    let bytes = build_query_bytes(name, record_type, id);
    let msg = parse_message_request(&bytes);
    let src: SocketAddr = "127.0.0.1:12345".parse().unwrap();
    Request::new(msg, src, Protocol::Udp)
}

/// Build a Catalog with a DockerAuthority over the given mock API.
pub fn build_catalog(config: DnsConfig, api: MockDockerApi) -> Catalog {
    let directory = ContainerDirectory::new(Arc::new(api));
    let authority = DockerAuthority::new(NameResolver::new(directory, config));
    let origin = Authority::origin(&authority).clone();
    let authority: Arc<dyn AuthorityObject> = Arc::new(authority);
    let mut catalog = Catalog::new();
    catalog.upsert(origin, vec![authority]);
    catalog
}

// --- Response helpers ---

/// Execute a query through the catalog and return the parsed response.
pub async fn execute_query(
    catalog: &Catalog,
    name: &str,
    record_type: RecordType,
    id: u16,
) -> Message {
    let request = build_request(name, record_type, id);
    let handler = TestResponseHandler::new();
    catalog.handle_request(&request, handler.clone()).await;
    handler.into_message()
}

/// Extract A record addresses from a response.
pub fn extract_a_ips(msg: &Message) -> Vec<Ipv4Addr> {
    msg.answers()
        .iter()
        .filter_map(|r| match r.data() {
            RData::A(a) => Some(Ipv4Addr::from(*a)),
            _ => None,
        })
        .collect()
}

/// Assert response code.
pub fn assert_response_code(msg: &Message, expected: ResponseCode) {
    assert_eq!(
        msg.response_code(),
        expected,
        "expected {:?}, got {:?}",
        expected,
        msg.response_code()
    );
}

/// Assert response is successful with exactly one A record for `expected_ip`.
pub fn assert_single_a_response(msg: &Message, expected_ip: Ipv4Addr) {
    assert_response_code(msg, ResponseCode::NoError);
    assert_eq!(
        extract_a_ips(msg),
        vec![expected_ip],
        "expected a single A record for {}",
        expected_ip
    );
}
