use super::client::{REPLY_LEN, parse_connect_reply};
use super::types::{SocksError, SocksResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyParseStatus {
    NeedMore,
    Complete { response: SocksResponse },
    Error { error: SocksError },
}

/// Accumulates the fixed 8-byte CONNECT reply. Anything past the eighth
/// cumulative byte is a protocol violation, never pending tunnel data:
/// the relay must not start until the reply is fully consumed.
#[derive(Debug, Default)]
pub struct ReplyParser {
    buf: [u8; REPLY_LEN],
    filled: usize,
}

impl ReplyParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> ReplyParseStatus {
        if self.filled + bytes.len() > REPLY_LEN {
            return ReplyParseStatus::Error {
                error: SocksError::Overflow,
            };
        }

        self.buf[self.filled..self.filled + bytes.len()].copy_from_slice(bytes);
        self.filled += bytes.len();

        if self.filled < REPLY_LEN {
            return ReplyParseStatus::NeedMore;
        }

        match parse_connect_reply(&self.buf) {
            Ok(response) => ReplyParseStatus::Complete { response },
            Err(error) => ReplyParseStatus::Error { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReplyParseStatus, ReplyParser};
    use crate::socks::SocksError;

    #[test]
    fn parses_reply_across_chunks() {
        let mut parser = ReplyParser::new();

        assert!(matches!(
            parser.push(&[0x00, 0x5a, 0x01]),
            ReplyParseStatus::NeedMore
        ));
        match parser.push(&[0xbb, 0x01, 0x02, 0x03, 0x04]) {
            ReplyParseStatus::Complete { response } => {
                assert_eq!(response.port, 443);
                assert_eq!(response.address_string(), "1.2.3.4");
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn single_oversized_chunk_overflows() {
        let mut parser = ReplyParser::new();
        let status = parser.push(&[0x00, 0x5a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff]);
        assert!(matches!(
            status,
            ReplyParseStatus::Error {
                error: SocksError::Overflow
            }
        ));
    }

    #[test]
    fn cumulative_surplus_overflows() {
        let mut parser = ReplyParser::new();
        assert!(matches!(
            parser.push(&[0x00, 0x5a, 0x00, 0x00, 0x00]),
            ReplyParseStatus::NeedMore
        ));
        assert!(matches!(
            parser.push(&[0x00, 0x00, 0x00, 0xff]),
            ReplyParseStatus::Error {
                error: SocksError::Overflow
            }
        ));
    }

    #[test]
    fn surfaces_reply_validation_errors() {
        let mut parser = ReplyParser::new();
        let status = parser.push(&[0x01, 0x5a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(
            status,
            ReplyParseStatus::Error {
                error: SocksError::InvalidNull { found: 0x01 }
            }
        ));
    }
}
