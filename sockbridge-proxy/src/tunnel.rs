use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::ProxyError;
use crate::events::{TunnelEvent, TunnelEventKind};

pub(crate) const ESTABLISHED_RESPONSE: &[u8] = b"HTTP/1.1 200 Connection Established\r\n\r\n";

const RELAY_BUF_LEN: usize = 8192;

/// Bridges an accepted HTTP tunnel socket and a handshaken SOCKS socket.
/// Announces the tunnel to the HTTP side and forwards the head bytes
/// concurrently, then relays verbatim in both directions until either side
/// ends. Returns the bytes moved toward the SOCKS side and toward the HTTP
/// side.
pub async fn splice(
    mut http: TcpStream,
    mut socks: TcpStream,
    head: &[u8],
    id: Uuid,
    events: &mpsc::Sender<TunnelEvent>,
) -> Result<(u64, u64), ProxyError> {
    let announce = async {
        http.write_all(ESTABLISHED_RESPONSE).await?;
        http.flush().await
    };
    let forward_head = async {
        if !head.is_empty() {
            socks.write_all(head).await?;
        }
        socks.flush().await
    };

    if let Err(err) = tokio::try_join!(announce, forward_head) {
        teardown(http, Some(socks)).await;
        return Err(ProxyError::Io(err));
    }

    Ok(relay(http, socks, id, events).await)
}

/// Failure path for a connection attempt: ends the HTTP socket so the
/// client sees the tunnel terminate, and the SOCKS socket when one was
/// already obtained. Exactly one of splice/teardown runs per attempt.
pub async fn teardown(mut http: TcpStream, socks: Option<TcpStream>) {
    let _ = http.shutdown().await;
    if let Some(mut socks) = socks {
        let _ = socks.shutdown().await;
    }
}

async fn relay(
    http: TcpStream,
    socks: TcpStream,
    id: Uuid,
    events: &mpsc::Sender<TunnelEvent>,
) -> (u64, u64) {
    let (mut http_read, mut http_write) = http.into_split();
    let (mut socks_read, mut socks_write) = socks.into_split();

    let mut to_socks = 0u64;
    let mut to_http = 0u64;

    // The two directions run as independent futures so a backpressured
    // write on one side never stalls the other. Either direction
    // finishing, by end-of-stream or by error, ends the whole tunnel:
    // half-close collapses into a close of the pair, and the losing
    // future is dropped before it can issue any close of its own.
    let halted = {
        let forward = pump(&mut http_read, &mut socks_write, &mut to_socks);
        let backward = pump(&mut socks_read, &mut http_write, &mut to_http);
        tokio::pin!(forward, backward);
        tokio::select! {
            result = &mut forward => result.err(),
            result = &mut backward => result.err(),
        }
    };

    if let Some(err) = halted {
        let _ = events
            .send(TunnelEvent {
                id,
                kind: TunnelEventKind::RelayError {
                    message: err.to_string(),
                },
            })
            .await;
    }

    // The single close site for both sockets; neither is touched again.
    let _ = socks_write.shutdown().await;
    let _ = http_write.shutdown().await;

    (to_socks, to_http)
}

/// One relay direction. The counter is bumped after every completed write
/// so progress survives the future being dropped when the other direction
/// ends the tunnel first.
async fn pump(
    reader: &mut OwnedReadHalf,
    writer: &mut OwnedWriteHalf,
    moved: &mut u64,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; RELAY_BUF_LEN];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        writer.write_all(&buf[..n]).await?;
        *moved += n as u64;
    }
}
