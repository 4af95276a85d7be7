use std::net::Ipv4Addr;

use super::types::{SocksAddress, SocksError, SocksReply, SocksResponse};

const VERSION: u8 = 0x04;
const CMD_CONNECT: u8 = 0x01;

/// The SOCKS4a sentinel address 0.0.0.1 signalling "hostname follows".
const INVALID_IP: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

pub const REPLY_LEN: usize = 8;

/// Decide between SOCKS4 and SOCKS4a addressing. A host is sent as raw
/// octets only when it is a dotted-decimal IPv4 literal; anything else is
/// passed through verbatim for the proxy to resolve. No DNS happens here.
pub fn parse_dest_address(host: &str) -> SocksAddress {
    match host.parse::<Ipv4Addr>() {
        Ok(ip) => SocksAddress::IpV4(ip.octets()),
        Err(_) => SocksAddress::Domain(host.to_string()),
    }
}

pub fn build_connect_request(address: &SocksAddress, port: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.push(VERSION);
    buf.push(CMD_CONNECT);
    buf.extend_from_slice(&port.to_be_bytes());

    match address {
        SocksAddress::IpV4(octets) => {
            buf.extend_from_slice(octets);
            buf.push(0x00);
        }
        SocksAddress::Domain(domain) => {
            buf.extend_from_slice(&INVALID_IP);
            buf.push(0x00);
            buf.extend_from_slice(domain.as_bytes());
            buf.push(0x00);
        }
    }

    buf
}

pub fn parse_connect_reply(bytes: &[u8; REPLY_LEN]) -> Result<SocksResponse, SocksError> {
    if bytes[0] != 0x00 {
        return Err(SocksError::InvalidNull { found: bytes[0] });
    }
    if bytes[1] != SocksReply::Granted.code() {
        return Err(SocksError::Rejected {
            reply: SocksReply::from_code(bytes[1]),
        });
    }
    let port = u16::from_be_bytes([bytes[2], bytes[3]]);
    let address = [bytes[4], bytes[5], bytes[6], bytes[7]];
    Ok(SocksResponse { port, address })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_dotted_decimal_as_ipv4() {
        assert_eq!(
            parse_dest_address("1.2.3.4"),
            SocksAddress::IpV4([1, 2, 3, 4])
        );
    }

    #[test]
    fn classifies_hostname_as_domain() {
        assert_eq!(
            parse_dest_address("foobar.com"),
            SocksAddress::Domain("foobar.com".to_string())
        );
    }

    #[test]
    fn classifies_partial_dotted_as_domain() {
        assert_eq!(
            parse_dest_address("1.2.3"),
            SocksAddress::Domain("1.2.3".to_string())
        );
        assert_eq!(
            parse_dest_address("999.1.1.1"),
            SocksAddress::Domain("999.1.1.1".to_string())
        );
    }

    #[test]
    fn builds_socks4_connect_ipv4() {
        let bytes = build_connect_request(&SocksAddress::IpV4([1, 2, 3, 4]), 443);
        assert_eq!(
            bytes,
            vec![0x04, 0x01, 0x01, 0xbb, 0x01, 0x02, 0x03, 0x04, 0x00]
        );
    }

    #[test]
    fn builds_socks4a_connect_domain() {
        let bytes = build_connect_request(&SocksAddress::Domain("foobar.com".to_string()), 443);
        assert_eq!(
            bytes,
            vec![
                0x04, 0x01, 0x01, 0xbb, 0x00, 0x00, 0x00, 0x01, 0x00, b'f', b'o', b'o', b'b',
                b'a', b'r', b'.', b'c', b'o', b'm', 0x00,
            ]
        );
    }

    #[test]
    fn parses_granted_reply() {
        let response =
            parse_connect_reply(&[0x00, 0x5a, 0x01, 0xbb, 0x01, 0x02, 0x03, 0x04]).unwrap();
        assert_eq!(response.port, 443);
        assert_eq!(response.address_string(), "1.2.3.4");
    }

    #[test]
    fn nonzero_first_byte_is_framing_error() {
        let error =
            parse_connect_reply(&[0x04, 0x5a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(error, SocksError::InvalidNull { found: 0x04 });
    }

    #[test]
    fn non_granted_status_is_rejection() {
        let error =
            parse_connect_reply(&[0x00, 0x5b, 0x01, 0xbb, 0x01, 0x02, 0x03, 0x04]).unwrap_err();
        assert_eq!(
            error,
            SocksError::Rejected {
                reply: SocksReply::Rejected
            }
        );

        let error =
            parse_connect_reply(&[0x00, 0x5d, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(
            error,
            SocksError::Rejected {
                reply: SocksReply::IdentdMismatch
            }
        );
    }
}
