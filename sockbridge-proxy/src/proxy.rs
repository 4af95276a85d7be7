use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use uuid::Uuid;

use sockbridge_net::{ConnectError, ConnectParseStatus, ConnectParser, split_target};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::events::{ProxyEvents, TunnelEvent, TunnelEventKind, event_channel};
use crate::socks::connect_via_socks;
use crate::tunnel::{splice, teardown};

const BAD_REQUEST_RESPONSE: &[u8] = b"HTTP/1.1 400 Bad Request\r\n\r\n";
const METHOD_NOT_ALLOWED_RESPONSE: &[u8] = b"HTTP/1.1 405 Method Not Allowed\r\n\r\n";
const HANDSHAKE_FAILED_RESPONSE: &[u8] = b"HTTP/1.1 500 Internal Server Error\r\n\r\n";

pub struct Proxy {
    state: Arc<ProxyState>,
}

struct ProxyState {
    config: ProxyConfig,
    sender: mpsc::Sender<TunnelEvent>,
}

impl Proxy {
    pub fn new(config: ProxyConfig) -> (Self, ProxyEvents) {
        let (sender, events) = event_channel();
        (
            Self {
                state: Arc::new(ProxyState { config, sender }),
            },
            events,
        )
    }

    pub async fn run(&self) -> Result<(), ProxyError> {
        let addr = format!(
            "{}:{}",
            self.state.config.listen.host, self.state.config.listen.port
        );
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|err| ProxyError::Runtime(err.to_string()))?;
        self.serve(listener).await
    }

    /// Accept loop over an already-bound listener. `run` binds from config;
    /// tests bind an ephemeral port themselves.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ProxyError> {
        loop {
            let (stream, _) = listener
                .accept()
                .await
                .map_err(|err| ProxyError::Runtime(err.to_string()))?;
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                if let Err(err) = handle_connection(state, stream).await {
                    let _ = err;
                }
            });
        }
    }
}

async fn handle_connection(state: Arc<ProxyState>, mut client: TcpStream) -> Result<(), ProxyError> {
    let id = Uuid::new_v4();
    let mut parser = ConnectParser::new();
    let mut temp = vec![0u8; 8192];

    let (target, head) = loop {
        let n = client.read(&mut temp).await?;
        if n == 0 {
            return Ok(());
        }
        match parser.push(&temp[..n]) {
            ConnectParseStatus::NeedMore => continue,
            ConnectParseStatus::Complete { target, head } => break (target, head),
            ConnectParseStatus::Error { error } => {
                let response = match error {
                    ConnectError::MethodNotConnect { .. } => METHOD_NOT_ALLOWED_RESPONSE,
                    _ => BAD_REQUEST_RESPONSE,
                };
                return reject(state, id, client, response, format!("{error:?}")).await;
            }
        }
    };

    let Some((host, port)) = split_target(&target) else {
        let reason = format!("target {target:?} is not host:port");
        return reject(state, id, client, BAD_REQUEST_RESPONSE, reason).await;
    };

    let socks = connect_via_socks(
        &host,
        port,
        &state.config.socks.host,
        state.config.socks.port,
        state.config.socks.timeout(),
    )
    .await;

    match socks {
        Ok((socks, _bound)) => {
            let _ = state
                .sender
                .send(TunnelEvent {
                    id,
                    kind: TunnelEventKind::Established {
                        target: target.clone(),
                    },
                })
                .await;

            let (to_socks, to_http) = match splice(client, socks, &head, id, &state.sender).await {
                Ok(counts) => counts,
                Err(_) => (0, 0),
            };

            let _ = state
                .sender
                .send(TunnelEvent {
                    id,
                    kind: TunnelEventKind::Closed {
                        target,
                        to_socks,
                        to_http,
                    },
                })
                .await;
        }
        Err(err) => {
            // The SOCKS socket, when one existed, was already destroyed on
            // the handshake's error path.
            let _ = client.write_all(HANDSHAKE_FAILED_RESPONSE).await;
            let _ = state
                .sender
                .send(TunnelEvent {
                    id,
                    kind: TunnelEventKind::HandshakeFailed {
                        target,
                        reason: err.to_string(),
                    },
                })
                .await;
            teardown(client, None).await;
        }
    }

    Ok(())
}

async fn reject(
    state: Arc<ProxyState>,
    id: Uuid,
    mut client: TcpStream,
    response: &[u8],
    reason: String,
) -> Result<(), ProxyError> {
    let _ = client.write_all(response).await;
    let _ = client.shutdown().await;
    let _ = state
        .sender
        .send(TunnelEvent {
            id,
            kind: TunnelEventKind::BadRequest { reason },
        })
        .await;
    Ok(())
}
