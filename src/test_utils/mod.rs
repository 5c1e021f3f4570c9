//! Test support utilities.
//!
//! Kept unconditionally compiled so integration tests and downstream
//! consumers can drive the pipeline without a live RPC endpoint.

pub mod mocks;

pub use mocks::{MockRpcTransport, RecordedCall, sample_signatures};
