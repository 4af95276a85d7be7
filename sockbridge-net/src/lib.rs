mod connect;
mod socks;

pub use connect::{
    ConnectError, ConnectParseStatus, ConnectParser, split_target,
};

pub use socks::{
    REPLY_LEN, ReplyParseStatus, ReplyParser, SocksAddress, SocksError, SocksReply, SocksResponse,
    build_connect_request, parse_connect_reply, parse_dest_address,
};
