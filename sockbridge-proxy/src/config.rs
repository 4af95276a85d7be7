use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::socks::HANDSHAKE_TIMEOUT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    pub listen: ListenConfig,
    pub socks: SocksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocksConfig {
    pub host: String,
    pub port: u16,
    /// Inactivity bound on each wait for SOCKS reply bytes.
    pub timeout_secs: u64,
}

impl SocksConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig {
                host: "127.0.0.1".to_string(),
                port: 8118,
            },
            socks: SocksConfig {
                host: "127.0.0.1".to_string(),
                port: 1080,
                timeout_secs: HANDSHAKE_TIMEOUT.as_secs(),
            },
        }
    }
}
