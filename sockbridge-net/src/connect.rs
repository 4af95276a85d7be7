const CRLF: &[u8] = b"\r\n";
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Upper bound on the request head; a client that sends this much without
/// terminating the headers is not speaking CONNECT at us.
const MAX_HEAD_BYTES: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    MethodNotConnect { method: String },
    MalformedRequestLine,
    HeadTooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectParseStatus {
    NeedMore,
    /// `target` is the verbatim request-target of the CONNECT line; `head`
    /// is every byte received past the terminating blank line, to be
    /// forwarded into the tunnel untouched.
    Complete { target: String, head: Vec<u8> },
    Error { error: ConnectError },
}

#[derive(Debug, Default)]
pub struct ConnectParser {
    buffer: Vec<u8>,
}

impl ConnectParser {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn push(&mut self, bytes: &[u8]) -> ConnectParseStatus {
        self.buffer.extend_from_slice(bytes);

        let Some(terminator) = twoway::find_bytes(&self.buffer, HEADER_TERMINATOR) else {
            if self.buffer.len() > MAX_HEAD_BYTES {
                return ConnectParseStatus::Error {
                    error: ConnectError::HeadTooLarge,
                };
            }
            return ConnectParseStatus::NeedMore;
        };

        let line_end = twoway::find_bytes(&self.buffer, CRLF).unwrap_or(terminator);
        let target = match parse_request_line(&self.buffer[..line_end]) {
            Ok(target) => target,
            Err(error) => return ConnectParseStatus::Error { error },
        };

        let head = self.buffer[terminator + HEADER_TERMINATOR.len()..].to_vec();
        ConnectParseStatus::Complete { target, head }
    }
}

fn parse_request_line(line: &[u8]) -> Result<String, ConnectError> {
    let Ok(line) = std::str::from_utf8(line) else {
        return Err(ConnectError::MalformedRequestLine);
    };

    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(_version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ConnectError::MalformedRequestLine);
    };

    if !method.eq_ignore_ascii_case("CONNECT") {
        return Err(ConnectError::MethodNotConnect {
            method: method.to_string(),
        });
    }

    Ok(target.to_string())
}

/// Splits a CONNECT request-target into host and port. CONNECT targets
/// carry an explicit port; a target without one is rejected by the caller.
pub fn split_target(target: &str) -> Option<(String, u16)> {
    let (host, port) = target.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    let port = port.parse::<u16>().ok()?;
    Some((host.to_string(), port))
}
