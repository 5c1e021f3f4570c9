//! Infrastructure layer implementations.

pub mod config;
pub mod observability;
pub mod rpc;

pub use config::{
    DEFAULT_RPC_ENDPOINT, FALLBACK_RPC_ENDPOINTS, LookupConfig, RPC_ENDPOINT_ENV,
};
pub use rpc::{HttpRpcTransport, HttpTransportConfig};
