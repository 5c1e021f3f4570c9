//! RPC transport implementations.

pub mod http;

pub use http::{HttpRpcTransport, HttpTransportConfig};
