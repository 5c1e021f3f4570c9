//! Chain query execution with RPC endpoint failover.
//!
//! The client owns the ordered endpoint list and the rotation cursor; the
//! wire protocol lives behind the injected [`RpcTransport`]. Each lookup
//! runs the full query sequence against one endpoint at a time, rotating
//! on retryable failure until the endpoint budget is spent.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;
use metrics::counter;
use tracing::{debug, instrument, warn};

use crate::domain::{
    AccountRecord, ConfigError, LookupError, PublicKey, RpcError, RpcTransport,
    SIGNATURE_LIST_LIMIT, SignatureRecord, TRANSACTION_DETAIL_LIMIT, TransactionSummary,
};

/// Raw result of one successful endpoint pass, before snapshot assembly.
#[derive(Debug, Clone)]
pub struct AccountView {
    pub lamports: u64,
    pub signatures: Vec<SignatureRecord>,
    pub transactions: Vec<TransactionSummary>,
    pub account: Option<AccountRecord>,
}

/// Executes wallet queries against a pool of RPC endpoints.
///
/// The rotation cursor is sticky: once a retryable failure advances it,
/// subsequent requests start from the rotated endpoint rather than the
/// configured primary. Construct one client per endpoint pool and share
/// it; each test can build its own with injected failures.
pub struct ChainQueryClient {
    transport: Arc<dyn RpcTransport>,
    endpoints: Vec<String>,
    cursor: AtomicUsize,
}

impl ChainQueryClient {
    /// Creates a client over an ordered, non-empty endpoint list.
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        endpoints: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if endpoints.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "endpoints".to_string(),
                message: "at least one RPC endpoint is required".to_string(),
            });
        }
        Ok(Self {
            transport,
            endpoints,
            cursor: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Index of the endpoint the next query will start from.
    ///
    /// The cursor is a monotonically increasing counter; the active index
    /// is taken modulo the endpoint count, so it is always in range.
    #[must_use]
    pub fn active_endpoint_index(&self) -> usize {
        self.cursor.load(Ordering::SeqCst) % self.endpoints.len()
    }

    /// URL of the currently active endpoint.
    #[must_use]
    pub fn active_endpoint(&self) -> &str {
        &self.endpoints[self.active_endpoint_index()]
    }

    fn rotate_endpoint(&self) {
        self.cursor.fetch_add(1, Ordering::SeqCst);
        debug!(endpoint = %self.active_endpoint(), "Switched to next RPC endpoint");
    }

    /// Runs the balance/signatures/details/account-info sequence with
    /// failover.
    ///
    /// The sequence is one atomic unit: a retryable failure anywhere in it
    /// discards the partial results, rotates the cursor, and re-runs the
    /// whole unit against the next endpoint. The retry budget equals the
    /// endpoint count, so no endpoint is tried twice within one call.
    /// Non-retryable failures surface immediately.
    #[instrument(skip(self, address), fields(address = %address))]
    pub async fn query_wallet(&self, address: &PublicKey) -> Result<AccountView, LookupError> {
        let budget = self.endpoints.len();
        let mut last_retryable: Option<RpcError> = None;

        for attempt in 1..=budget {
            let endpoint = self.active_endpoint().to_string();
            match self.query_endpoint(&endpoint, address).await {
                Ok(view) => return Ok(view),
                Err(err) if err.is_retryable() => {
                    warn!(
                        endpoint = %endpoint,
                        attempt,
                        budget,
                        kind = err.kind(),
                        error = %err,
                        "Retryable RPC failure, switching to next endpoint"
                    );
                    counter!("wallet_lookup_endpoint_rotations_total", "kind" => err.kind())
                        .increment(1);
                    self.rotate_endpoint();
                    last_retryable = Some(err);
                }
                Err(err) => return Err(LookupError::Query(err)),
            }
        }

        counter!("wallet_lookup_exhausted_total").increment(1);
        Err(match last_retryable {
            Some(RpcError::RateLimited(_)) => LookupError::RateLimitExhausted { attempts: budget },
            _ => LookupError::AllEndpointsUnavailable { attempts: budget },
        })
    }

    async fn query_endpoint(
        &self,
        endpoint: &str,
        address: &PublicKey,
    ) -> Result<AccountView, RpcError> {
        let lamports = self.transport.get_balance(endpoint, address).await?;

        let signatures = self
            .transport
            .get_signatures_for_address(endpoint, address, SIGNATURE_LIST_LIMIT)
            .await?;

        let transactions = self.fetch_summaries(endpoint, &signatures).await;

        let account = self.transport.get_account_info(endpoint, address).await?;

        Ok(AccountView {
            lamports,
            signatures,
            transactions,
            account,
        })
    }

    /// Detail fetches for the leading signatures run concurrently; a
    /// failed fetch is recorded as a placeholder summary and neither
    /// cancels its siblings nor fails the pass.
    async fn fetch_summaries(
        &self,
        endpoint: &str,
        signatures: &[SignatureRecord],
    ) -> Vec<TransactionSummary> {
        let fetches = signatures
            .iter()
            .take(TRANSACTION_DETAIL_LIMIT)
            .map(|record| async move {
                match self.transport.get_transaction(endpoint, &record.signature).await {
                    Ok(()) => TransactionSummary::from_record(record),
                    Err(err) => {
                        debug!(
                            signature = %record.signature,
                            error = %err,
                            "Transaction detail fetch failed"
                        );
                        TransactionSummary::detail_unavailable(record)
                    }
                }
            });

        join_all(fetches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockRpcTransport;

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

    fn endpoints(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("https://rpc-{i}.example")).collect()
    }

    fn client(transport: Arc<MockRpcTransport>, count: usize) -> ChainQueryClient {
        ChainQueryClient::new(transport, endpoints(count)).unwrap()
    }

    fn address() -> PublicKey {
        PublicKey::from_base58(SYSTEM_PROGRAM).unwrap()
    }

    #[test]
    fn test_rejects_empty_endpoint_list() {
        let transport = Arc::new(MockRpcTransport::new());
        let result = ChainQueryClient::new(transport, Vec::new());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_successful_pass_merges_all_queries() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 3);

        let view = client.query_wallet(&address()).await.unwrap();

        assert_eq!(view.lamports, 1_500_000_000);
        assert_eq!(view.signatures.len(), 5);
        // Only the leading signatures get detail summaries.
        assert_eq!(view.transactions.len(), 3);
        assert!(view.account.is_some());
        assert_eq!(client.active_endpoint_index(), 0);
    }

    #[tokio::test]
    async fn test_rotates_on_forbidden_and_succeeds_on_next() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 3);
        transport.fail_endpoint(
            client.endpoints()[0].as_str(),
            RpcError::Forbidden("HTTP 403".to_string()),
        );

        let view = client.query_wallet(&address()).await.unwrap();

        assert_eq!(view.lamports, 1_500_000_000);
        assert_eq!(client.active_endpoint_index(), 1);
    }

    #[tokio::test]
    async fn test_budget_is_exactly_endpoint_count() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 3);
        for endpoint in client.endpoints() {
            transport.fail_endpoint(endpoint, RpcError::Forbidden("HTTP 403".to_string()));
        }

        let err = client.query_wallet(&address()).await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::AllEndpointsUnavailable { attempts: 3 }
        ));

        // Each endpoint was tried exactly once before giving up.
        let balance_calls: Vec<_> = transport
            .calls()
            .into_iter()
            .filter(|call| call.method == "getBalance")
            .collect();
        assert_eq!(balance_calls.len(), 3);
        for (i, call) in balance_calls.iter().enumerate() {
            assert_eq!(call.endpoint, client.endpoints()[i]);
        }
    }

    #[tokio::test]
    async fn test_rate_limit_has_its_own_terminal_error() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 2);
        for endpoint in client.endpoints() {
            transport.fail_endpoint(endpoint, RpcError::RateLimited("HTTP 429".to_string()));
        }

        let err = client.query_wallet(&address()).await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::RateLimitExhausted { attempts: 2 }
        ));
    }

    #[tokio::test]
    async fn test_rotation_is_sticky_across_requests() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 3);
        transport.fail_endpoint(
            client.endpoints()[0].as_str(),
            RpcError::Network("connection refused".to_string()),
        );

        client.query_wallet(&address()).await.unwrap();
        assert_eq!(client.active_endpoint_index(), 1);

        // An unrelated follow-up request starts from the rotated endpoint,
        // not the configured primary.
        transport.clear_calls();
        client.query_wallet(&address()).await.unwrap();
        let calls = transport.calls();
        assert_eq!(calls[0].endpoint, client.endpoints()[1]);
        assert_eq!(client.active_endpoint_index(), 1);
    }

    #[tokio::test]
    async fn test_cursor_position_is_initial_plus_failures_mod_n() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 3);
        transport.fail_endpoint(
            client.endpoints()[0].as_str(),
            RpcError::Timeout("deadline elapsed".to_string()),
        );
        transport.fail_endpoint(
            client.endpoints()[1].as_str(),
            RpcError::Timeout("deadline elapsed".to_string()),
        );

        client.query_wallet(&address()).await.unwrap();
        assert_eq!(client.active_endpoint_index(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_surfaces_immediately() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 3);
        transport.fail_endpoint(
            client.endpoints()[0].as_str(),
            RpcError::Call {
                code: -32602,
                message: "invalid params".to_string(),
            },
        );

        let err = client.query_wallet(&address()).await.unwrap_err();
        assert!(matches!(err, LookupError::Query(RpcError::Call { .. })));

        // No rotation, no second attempt.
        assert_eq!(client.active_endpoint_index(), 0);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_detail_failure_is_isolated() {
        let transport = Arc::new(MockRpcTransport::new());
        let signatures = crate::test_utils::sample_signatures(5);
        transport.fail_detail(&signatures[1].signature);
        transport.set_signatures(signatures);
        let client = client(Arc::clone(&transport), 3);

        let view = client.query_wallet(&address()).await.unwrap();

        assert_eq!(view.transactions.len(), 3);
        assert!(view.transactions[0].success);
        assert!(!view.transactions[1].success);
        assert_eq!(
            view.transactions[1].error.as_deref(),
            Some(crate::domain::DETAIL_FETCH_FAILED)
        );
        assert!(view.transactions[2].success);
        // The failed detail fetch did not trigger failover.
        assert_eq!(client.active_endpoint_index(), 0);
    }

    #[tokio::test]
    async fn test_signature_count_vs_detail_count() {
        let transport = Arc::new(MockRpcTransport::new());
        let client = client(Arc::clone(&transport), 1);

        let view = client.query_wallet(&address()).await.unwrap();
        assert_eq!(view.signatures.len(), 5);
        assert_eq!(view.transactions.len(), 3);
    }
}
