use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelEvent {
    pub id: Uuid,
    pub kind: TunnelEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelEventKind {
    Established {
        target: String,
    },
    HandshakeFailed {
        target: String,
        reason: String,
    },
    BadRequest {
        reason: String,
    },
    /// A socket-level error observed during an established relay. Reported
    /// for observability; teardown still follows the normal close
    /// propagation, nothing extra.
    RelayError {
        message: String,
    },
    Closed {
        target: String,
        to_socks: u64,
        to_http: u64,
    },
}

pub type ProxyEvents = ReceiverStream<TunnelEvent>;

pub fn event_channel() -> (mpsc::Sender<TunnelEvent>, ProxyEvents) {
    let (sender, receiver) = mpsc::channel(1024);
    (sender, ReceiverStream::new(receiver))
}
