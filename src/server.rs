//! DNS server setup and lifecycle management.

use hickory_server::authority::{Authority, AuthorityObject, Catalog};
use hickory_server::ServerFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::authority::DockerAuthority;
use crate::config::{BindProtocol, DnsConfig};
use crate::directory::ContainerDirectory;
use crate::docker::ContainerApi;
use crate::error::DnsError;
use crate::resolver::NameResolver;

/// Idle timeout for TCP connections.
const TCP_TIMEOUT: Duration = Duration::from_secs(30);

/// DNS server answering from live container state.
pub struct DnsServer {
    config: DnsConfig,
    api: Arc<dyn ContainerApi>,
}

impl DnsServer {
    /// Create a new DNS server over the given registry client.
    pub fn new(config: DnsConfig, api: Arc<dyn ContainerApi>) -> Self {
        Self { config, api }
    }

    /// Run the DNS server until the shutdown token is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), DnsError> {
        let listen_addr = self.config.listen_addr()?;

        if self.config.bind_protocols.is_empty() {
            return Err(DnsError::Config(
                "bind_protocols must name at least one of udp, tcp".to_string(),
            ));
        }

        info!(
            %listen_addr,
            ttl = self.config.ttl,
            authoritative = self.config.authoritative,
            respond_nxdomain_on_miss = self.config.respond_nxdomain_on_miss,
            "Starting docker-dns server"
        );

        let directory = ContainerDirectory::new(Arc::clone(&self.api));
        let resolver = NameResolver::new(directory, self.config.clone());
        let authority = DockerAuthority::new(resolver);

        let mut catalog = Catalog::new();
        let origin = Authority::origin(&authority).clone();
        let authority: Arc<dyn AuthorityObject> = Arc::new(authority);
        catalog.upsert(origin, vec![authority]);

        let mut server = ServerFuture::new(catalog);

        if self.config.bind_protocols.contains(&BindProtocol::Udp) {
            let udp_socket = UdpSocket::bind(listen_addr).await?;
            info!(addr = %listen_addr, "DNS UDP listening");
            server.register_socket(udp_socket);
        }

        if self.config.bind_protocols.contains(&BindProtocol::Tcp) {
            let tcp_listener = TcpListener::bind(listen_addr).await?;
            info!(addr = %listen_addr, "DNS TCP listening");
            server.register_listener(tcp_listener, TCP_TIMEOUT);
        }

        info!("DNS server ready to serve queries");

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("DNS server shutdown requested");
            }
            result = server.block_until_done() => {
                if let Err(e) = result {
                    error!("DNS server error: {}", e);
                }
            }
        }

        info!("DNS server stopped");
        Ok(())
    }
}
