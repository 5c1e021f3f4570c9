//! Wallet lookup service.
//!
//! This is the caller-facing facade: the presentation layer hands it a raw
//! string and renders whatever snapshot or typed error comes back.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;
use tracing::{info, instrument};

use crate::domain::{
    DOMAIN_SUFFIX, LAMPORTS_PER_SOL, LookupError, PublicKey, ResolvedAddress, ValidationResult,
    WalletSnapshot,
};

use super::client::{AccountView, ChainQueryClient};
use super::resolver::AddressResolver;

/// Identifies one lookup for last-request-wins handling.
///
/// A caller that issues a new lookup while another is in flight checks the
/// older ticket with [`WalletService::is_current`] and discards the stale
/// result. There is no in-flight abort; results are simply ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

/// Orchestrates validation, resolution, and the chain query into one
/// normalized snapshot per request.
pub struct WalletService {
    resolver: AddressResolver,
    chain: ChainQueryClient,
    lookup_seq: AtomicU64,
}

impl WalletService {
    #[must_use]
    pub fn new(resolver: AddressResolver, chain: ChainQueryClient) -> Self {
        Self {
            resolver,
            chain,
            lookup_seq: AtomicU64::new(0),
        }
    }

    /// Classifies and validates a raw input string without touching the
    /// network.
    #[must_use]
    pub fn validate_address(&self, input: &str) -> ValidationResult {
        self.resolver.validate(input)
    }

    /// The endpoint pool, exposed for status display.
    #[must_use]
    pub fn chain(&self) -> &ChainQueryClient {
        &self.chain
    }

    /// Marks the start of a lookup and supersedes all earlier tickets.
    pub fn begin_lookup(&self) -> LookupTicket {
        LookupTicket(self.lookup_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the ticket still belongs to the most recent lookup.
    #[must_use]
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        ticket.0 == self.lookup_seq.load(Ordering::SeqCst)
    }

    /// Resolves the input and fetches one immutable wallet snapshot.
    ///
    /// Domain-resolution and address-parse failures surface immediately
    /// and are never retried across endpoints; only the chain query
    /// participates in failover.
    #[instrument(skip(self, input), fields(input = %input))]
    pub async fn fetch_wallet_snapshot(&self, input: &str) -> Result<WalletSnapshot, LookupError> {
        counter!("wallet_lookup_requests_total").increment(1);

        let resolved = self.resolve_input(input.trim())?;
        info!(
            address = %resolved.key,
            original = %resolved.original_input,
            "Fetching wallet snapshot"
        );

        let view = self.chain.query_wallet(&resolved.key).await?;
        let snapshot = assemble_snapshot(resolved, view);

        info!(
            address = %snapshot.address,
            balance_sol = snapshot.balance_sol,
            transactions = snapshot.transactions.len(),
            account_exists = snapshot.account_exists,
            "Wallet snapshot assembled"
        );
        Ok(snapshot)
    }

    fn resolve_input(&self, input: &str) -> Result<ResolvedAddress, LookupError> {
        let key = if input.ends_with(DOMAIN_SUFFIX) {
            self.resolver
                .resolve_domain(input)
                .map_err(|source| LookupError::DomainResolutionFailed {
                    domain: input.to_string(),
                    source,
                })?
        } else {
            PublicKey::from_base58(input)?
        };

        Ok(ResolvedAddress {
            key,
            original_input: input.to_string(),
        })
    }
}

/// Merges the endpoint pass into the normalized record. The snapshot's
/// address is always the canonical encoding; `total_transactions` counts
/// the signature listing, not the detailed prefix.
fn assemble_snapshot(resolved: ResolvedAddress, view: AccountView) -> WalletSnapshot {
    let (account_exists, is_executable, owner) = match view.account {
        Some(account) => (true, account.executable, Some(account.owner)),
        None => (false, false, None),
    };

    WalletSnapshot {
        address: resolved.key.to_base58(),
        original_input: resolved.original_input,
        balance_sol: view.lamports as f64 / LAMPORTS_PER_SOL as f64,
        balance_lamports: view.lamports,
        transactions: view.transactions,
        total_transactions: view.signatures.len(),
        account_exists,
        is_executable,
        owner,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{AccountRecord, AddressError, RpcError};
    use crate::test_utils::MockRpcTransport;

    const TOLY_ADDRESS: &str = "5tzFkiKscXHK5ZXCGbXZxdw7gTjjD1mBwuoFbhUvuAi9";

    fn service_with(transport: Arc<MockRpcTransport>) -> WalletService {
        let endpoints = vec![
            "https://rpc-0.example".to_string(),
            "https://rpc-1.example".to_string(),
        ];
        let chain = ChainQueryClient::new(transport, endpoints).unwrap();
        WalletService::new(AddressResolver::new(), chain)
    }

    #[tokio::test]
    async fn test_domain_lookup_reports_both_forms() {
        let transport = Arc::new(MockRpcTransport::new());
        let service = service_with(Arc::clone(&transport));

        let snapshot = service.fetch_wallet_snapshot("toly.sol").await.unwrap();

        assert_eq!(snapshot.address, TOLY_ADDRESS);
        assert_eq!(snapshot.original_input, "toly.sol");
    }

    #[tokio::test]
    async fn test_raw_address_lookup() {
        let transport = Arc::new(MockRpcTransport::new());
        transport.set_lamports(2_500_000_000);
        let service = service_with(Arc::clone(&transport));

        let snapshot = service.fetch_wallet_snapshot(TOLY_ADDRESS).await.unwrap();

        assert_eq!(snapshot.address, TOLY_ADDRESS);
        assert_eq!(snapshot.original_input, TOLY_ADDRESS);
        assert_eq!(snapshot.balance_lamports, 2_500_000_000);
        assert!((snapshot.balance_sol - 2.5).abs() < f64::EPSILON);
        assert_eq!(snapshot.total_transactions, 5);
        assert_eq!(snapshot.transactions.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_domain_fails_without_network_calls() {
        let transport = Arc::new(MockRpcTransport::new());
        let service = service_with(Arc::clone(&transport));

        let err = service
            .fetch_wallet_snapshot("unknown.sol")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::DomainResolutionFailed { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_address_fails_without_network_calls() {
        let transport = Arc::new(MockRpcTransport::new());
        let service = service_with(Arc::clone(&transport));

        let err = service
            .fetch_wallet_snapshot("definitely-not-a-wallet")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LookupError::Address(AddressError::InvalidFormat)
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_account_keeps_balance() {
        let transport = Arc::new(MockRpcTransport::new());
        transport.set_account(None);
        transport.set_lamports(0);
        let service = service_with(Arc::clone(&transport));

        let snapshot = service.fetch_wallet_snapshot(TOLY_ADDRESS).await.unwrap();

        assert!(!snapshot.account_exists);
        assert!(!snapshot.is_executable);
        assert!(snapshot.owner.is_none());
        assert_eq!(snapshot.balance_lamports, 0);
    }

    #[tokio::test]
    async fn test_executable_account_metadata() {
        let transport = Arc::new(MockRpcTransport::new());
        transport.set_account(Some(AccountRecord {
            lamports: 1,
            owner: "BPFLoaderUpgradeab1e11111111111111111111111".to_string(),
            executable: true,
        }));
        let service = service_with(Arc::clone(&transport));

        let snapshot = service.fetch_wallet_snapshot(TOLY_ADDRESS).await.unwrap();

        assert!(snapshot.account_exists);
        assert!(snapshot.is_executable);
        assert_eq!(
            snapshot.owner.as_deref(),
            Some("BPFLoaderUpgradeab1e11111111111111111111111")
        );
    }

    #[tokio::test]
    async fn test_query_errors_are_wrapped() {
        let transport = Arc::new(MockRpcTransport::new());
        transport.fail_endpoint(
            "https://rpc-0.example",
            RpcError::Call {
                code: -32005,
                message: "node is behind".to_string(),
            },
        );
        let service = service_with(Arc::clone(&transport));

        let err = service.fetch_wallet_snapshot(TOLY_ADDRESS).await.unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to fetch wallet information")
        );
    }

    #[tokio::test]
    async fn test_validate_delegates_to_resolver() {
        let transport = Arc::new(MockRpcTransport::new());
        let service = service_with(transport);

        let result = service.validate_address("");
        assert!(!result.is_valid);
        assert_eq!(result.error, Some(AddressError::EmptyInput));

        assert!(service.validate_address("toly.sol").is_domain);
    }

    #[test]
    fn test_last_lookup_wins() {
        let transport = Arc::new(MockRpcTransport::new());
        let service = service_with(transport);

        let first = service.begin_lookup();
        assert!(service.is_current(first));

        let second = service.begin_lookup();
        assert!(!service.is_current(first));
        assert!(service.is_current(second));
    }
}
