use clap::Parser;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use sockbridge_proxy::{
    HANDSHAKE_TIMEOUT, ListenConfig, Proxy, ProxyConfig, ProxyEvents, SocksConfig, TunnelEventKind,
};

#[derive(Debug, Parser)]
#[command(
    name = "sockbridge",
    about = "HTTP CONNECT proxy that tunnels through a SOCKS4(a) proxy"
)]
struct Cli {
    /// Port to listen on for HTTP CONNECT requests
    #[arg(long, env = "HTTP_PORT", default_value_t = 8118)]
    http_port: u16,

    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0")]
    listen_host: String,

    /// SOCKS4(a) proxy hostname
    #[arg(long, env = "SOCKS_HOST")]
    socks_host: String,

    /// SOCKS4(a) proxy port
    #[arg(long, env = "SOCKS_PORT", default_value_t = 1080)]
    socks_port: u16,

    /// Seconds to wait for each SOCKS reply read before giving up
    #[arg(long, default_value_t = HANDSHAKE_TIMEOUT.as_secs())]
    socks_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ProxyConfig {
        listen: ListenConfig {
            host: cli.listen_host,
            port: cli.http_port,
        },
        socks: SocksConfig {
            host: cli.socks_host,
            port: cli.socks_port,
            timeout_secs: cli.socks_timeout,
        },
    };

    info!(
        listen = %format!("{}:{}", config.listen.host, config.listen.port),
        socks = %format!("{}:{}", config.socks.host, config.socks.port),
        "starting HTTP-to-SOCKS bridge"
    );

    let (proxy, events) = Proxy::new(config);
    tokio::spawn(log_events(events));

    proxy.run().await.map_err(|err| err.to_string())
}

async fn log_events(mut events: ProxyEvents) {
    while let Some(event) = events.next().await {
        let id = event.id;
        match event.kind {
            TunnelEventKind::Established { target } => {
                info!(%id, %target, "tunnel established");
            }
            TunnelEventKind::HandshakeFailed { target, reason } => {
                warn!(%id, %target, %reason, "SOCKS handshake failed");
            }
            TunnelEventKind::BadRequest { reason } => {
                warn!(%id, %reason, "rejected inbound request");
            }
            TunnelEventKind::RelayError { message } => {
                error!(%id, %message, "relay error");
            }
            TunnelEventKind::Closed {
                target,
                to_socks,
                to_http,
            } => {
                info!(%id, %target, to_socks, to_http, "tunnel closed");
            }
        }
    }
}
