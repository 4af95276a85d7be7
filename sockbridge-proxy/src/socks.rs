use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use sockbridge_net::{
    ReplyParseStatus, ReplyParser, SocksResponse, build_connect_request, parse_dest_address,
};

use crate::error::SocksClientError;

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(60);

/// Performs the SOCKS4(a) CONNECT handshake and hands back the stream,
/// ready for splicing. The request write and the reply read run
/// concurrently; the handshake is complete only once both have finished.
/// Every error path drops (and thereby destroys) the SOCKS socket, with no
/// reply byte left unconsumed on success.
pub async fn connect_via_socks(
    dest_host: &str,
    dest_port: u16,
    socks_host: &str,
    socks_port: u16,
    wait: Duration,
) -> Result<(TcpStream, SocksResponse), SocksClientError> {
    let mut stream = TcpStream::connect((socks_host, socks_port))
        .await
        .map_err(SocksClientError::Connect)?;

    let request = build_connect_request(&parse_dest_address(dest_host), dest_port);

    let (mut reader, mut writer) = stream.split();

    let send_request = async {
        writer.write_all(&request).await?;
        writer.flush().await?;
        Ok::<_, SocksClientError>(())
    };

    let read_reply = async {
        let mut parser = ReplyParser::new();
        // Larger than the reply on purpose: a remote that delivers more
        // than 8 bytes in one go must be seen doing it.
        let mut chunk = [0u8; 16];
        loop {
            let n = timeout(wait, reader.read(&mut chunk))
                .await
                .map_err(|_| SocksClientError::Timeout)??;
            if n == 0 {
                return Err(SocksClientError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "SOCKS proxy closed before sending a full reply",
                )));
            }
            match parser.push(&chunk[..n]) {
                ReplyParseStatus::NeedMore => continue,
                ReplyParseStatus::Complete { response } => return Ok(response),
                ReplyParseStatus::Error { error } => return Err(error.into()),
            }
        }
    };

    let (response, ()) = tokio::try_join!(read_reply, send_request)?;

    Ok((stream, response))
}
