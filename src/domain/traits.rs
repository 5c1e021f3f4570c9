//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::RpcError;
use super::types::{AccountRecord, PublicKey, SignatureRecord};

/// Transport for the four read operations the lookup pipeline consumes.
///
/// Implementations execute one JSON-RPC call against the given endpoint
/// and classify failures into structured [`RpcError`] kinds; the failover
/// policy lives above this seam and never inspects message text.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Account balance in lamports.
    async fn get_balance(&self, endpoint: &str, address: &PublicKey) -> Result<u64, RpcError>;

    /// Recent signatures for the address, most recent first, bounded by `limit`.
    async fn get_signatures_for_address(
        &self,
        endpoint: &str,
        address: &PublicKey,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, RpcError>;

    /// Full transaction detail for a signature. The lookup pipeline builds
    /// its summaries from the signature listing; this call only has to
    /// confirm the transaction is fetchable.
    async fn get_transaction(&self, endpoint: &str, signature: &str) -> Result<(), RpcError>;

    /// Account metadata, or `None` when the account does not exist on-chain.
    async fn get_account_info(
        &self,
        endpoint: &str,
        address: &PublicKey,
    ) -> Result<Option<AccountRecord>, RpcError>;
}
