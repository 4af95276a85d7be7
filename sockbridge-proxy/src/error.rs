use thiserror::Error;

use sockbridge_net::{SocksError, SocksReply};

/// Everything that can end a SOCKS handshake. None of these are retried;
/// the afflicted connection is torn down and the HTTP side is told via a
/// failure status line.
#[derive(Debug, Error)]
pub enum SocksClientError {
    #[error("cannot reach SOCKS proxy: {0}")]
    Connect(#[source] std::io::Error),
    #[error("expected null byte, got {found}")]
    Framing { found: u8 },
    #[error("request rejected or failed: {reply:?}")]
    Rejected { reply: SocksReply },
    #[error("reply exceeded the fixed 8-byte frame")]
    BufferOverflow,
    #[error("timed out waiting for SOCKS reply")]
    Timeout,
    #[error("SOCKS socket error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SocksError> for SocksClientError {
    fn from(error: SocksError) -> Self {
        match error {
            SocksError::InvalidNull { found } => SocksClientError::Framing { found },
            SocksError::Rejected { reply } => SocksClientError::Rejected { reply },
            SocksError::Overflow => SocksClientError::BufferOverflow,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("proxy configuration error: {0}")]
    Config(String),
    #[error("proxy runtime error: {0}")]
    Runtime(String),
    #[error("proxy IO error: {0}")]
    Io(#[from] std::io::Error),
}
