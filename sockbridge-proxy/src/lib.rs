mod config;
mod error;
mod events;
mod proxy;
mod socks;
mod tunnel;

pub use config::{ListenConfig, ProxyConfig, SocksConfig};
pub use error::{ProxyError, SocksClientError};
pub use events::{ProxyEvents, TunnelEvent, TunnelEventKind, event_channel};
pub use proxy::Proxy;
pub use socks::{HANDSHAKE_TIMEOUT, connect_via_socks};
pub use tunnel::{splice, teardown};
