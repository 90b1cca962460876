pub mod codec;
pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcError, JsonRpcResponse, RequestId};
pub use server::{MCPError, MCPServer};
