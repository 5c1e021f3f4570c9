//! Mock implementations for testing.
//!
//! [`MockRpcTransport`] is an in-memory transport double with fixtures
//! for every query, per-endpoint and per-signature failure injection,
//! and a call log for asserting rotation order and retry budgets.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{AccountRecord, PublicKey, RpcError, RpcTransport, SignatureRecord};

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub method: &'static str,
}

/// Deterministic signature fixtures, most recent first.
#[must_use]
pub fn sample_signatures(count: usize) -> Vec<SignatureRecord> {
    (0..count)
        .map(|i| SignatureRecord {
            signature: format!("signature-{}", i + 1),
            slot: 250_000_000 - i as u64,
            block_time: Some(1_700_000_000 - i as i64 * 60),
            err: None,
        })
        .collect()
}

/// Mock RPC transport for testing.
///
/// Defaults to a healthy wallet: a 1.5 SOL balance, five recent
/// signatures, and an existing system-program-owned account.
///
/// # Example
///
/// ```
/// use sollens::domain::RpcError;
/// use sollens::test_utils::MockRpcTransport;
///
/// let mock = MockRpcTransport::new();
/// mock.fail_endpoint("https://rpc-0.example", RpcError::Forbidden("HTTP 403".to_string()));
/// ```
pub struct MockRpcTransport {
    lamports: AtomicU64,
    signatures: Mutex<Vec<SignatureRecord>>,
    account: Mutex<Option<AccountRecord>>,
    endpoint_failures: Mutex<HashMap<String, RpcError>>,
    detail_failures: Mutex<HashSet<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRpcTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lamports: AtomicU64::new(1_500_000_000),
            signatures: Mutex::new(sample_signatures(5)),
            account: Mutex::new(Some(AccountRecord {
                lamports: 1_500_000_000,
                owner: "11111111111111111111111111111111".to_string(),
                executable: false,
            })),
            endpoint_failures: Mutex::new(HashMap::new()),
            detail_failures: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_lamports(&self, lamports: u64) {
        self.lamports.store(lamports, Ordering::Relaxed);
    }

    pub fn set_signatures(&self, signatures: Vec<SignatureRecord>) {
        *self.signatures.lock().unwrap() = signatures;
    }

    pub fn set_account(&self, account: Option<AccountRecord>) {
        *self.account.lock().unwrap() = account;
    }

    /// Makes every non-detail call against `endpoint` fail with `error`.
    pub fn fail_endpoint(&self, endpoint: &str, error: RpcError) {
        self.endpoint_failures
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), error);
    }

    pub fn clear_failures(&self) {
        self.endpoint_failures.lock().unwrap().clear();
        self.detail_failures.lock().unwrap().clear();
    }

    /// Makes the detail fetch for `signature` fail on every endpoint.
    pub fn fail_detail(&self, signature: &str) {
        self.detail_failures
            .lock()
            .unwrap()
            .insert(signature.to_string());
    }

    /// All calls recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, endpoint: &str, method: &'static str) {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            method,
        });
    }

    fn failure_for(&self, endpoint: &str) -> Result<(), RpcError> {
        match self.endpoint_failures.lock().unwrap().get(endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockRpcTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcTransport for MockRpcTransport {
    async fn get_balance(&self, endpoint: &str, _address: &PublicKey) -> Result<u64, RpcError> {
        self.record(endpoint, "getBalance");
        self.failure_for(endpoint)?;
        Ok(self.lamports.load(Ordering::Relaxed))
    }

    async fn get_signatures_for_address(
        &self,
        endpoint: &str,
        _address: &PublicKey,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, RpcError> {
        self.record(endpoint, "getSignaturesForAddress");
        self.failure_for(endpoint)?;
        let signatures = self.signatures.lock().unwrap();
        Ok(signatures.iter().take(limit).cloned().collect())
    }

    async fn get_transaction(&self, endpoint: &str, signature: &str) -> Result<(), RpcError> {
        self.record(endpoint, "getTransaction");
        if self.detail_failures.lock().unwrap().contains(signature) {
            return Err(RpcError::Network("mock detail fetch failure".to_string()));
        }
        Ok(())
    }

    async fn get_account_info(
        &self,
        endpoint: &str,
        _address: &PublicKey,
    ) -> Result<Option<AccountRecord>, RpcError> {
        self.record(endpoint, "getAccountInfo");
        self.failure_for(endpoint)?;
        Ok(self.account.lock().unwrap().clone())
    }
}
