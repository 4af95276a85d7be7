mod client;
mod parser;
mod types;

pub use client::{REPLY_LEN, build_connect_request, parse_connect_reply, parse_dest_address};
pub use parser::{ReplyParseStatus, ReplyParser};
pub use types::{SocksAddress, SocksError, SocksReply, SocksResponse};
