#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocksAddress {
    IpV4([u8; 4]),
    Domain(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksReply {
    Granted,
    Rejected,
    NoIdentd,
    IdentdMismatch,
    Other(u8),
}

impl SocksReply {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x5a => SocksReply::Granted,
            0x5b => SocksReply::Rejected,
            0x5c => SocksReply::NoIdentd,
            0x5d => SocksReply::IdentdMismatch,
            other => SocksReply::Other(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            SocksReply::Granted => 0x5a,
            SocksReply::Rejected => 0x5b,
            SocksReply::NoIdentd => 0x5c,
            SocksReply::IdentdMismatch => 0x5d,
            SocksReply::Other(code) => *code,
        }
    }
}

/// A successfully parsed CONNECT reply: the port and IPv4 address the proxy
/// reports it bound for the tunnel. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocksResponse {
    pub port: u16,
    pub address: [u8; 4],
}

impl SocksResponse {
    pub fn address_string(&self) -> String {
        let [a, b, c, d] = self.address;
        format!("{a}.{b}.{c}.{d}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksError {
    /// The first reply byte was not the mandatory null byte. This is a
    /// framing violation, not an application-level rejection.
    InvalidNull { found: u8 },
    /// The proxy answered with a non-granted status code.
    Rejected { reply: SocksReply },
    /// More bytes arrived than the fixed 8-byte reply allows.
    Overflow,
}
