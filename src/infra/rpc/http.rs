//! JSON-RPC 2.0 transport over HTTP.
//!
//! Implements [`RpcTransport`] with `reqwest`. Failure classification is
//! structural: HTTP status and transport errors map onto [`RpcError`]
//! kinds here, so nothing above this layer matches on message text.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{AccountRecord, PublicKey, RpcError, RpcTransport, SignatureRecord};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Bounded per-call timeout; expiry is a retryable condition.
    pub timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

/// Solana JSON-RPC transport.
pub struct HttpRpcTransport {
    http_client: Client,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: T,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Context-wrapped result shape used by `getBalance` and `getAccountInfo`.
#[derive(Debug, Deserialize)]
struct RpcValue<T> {
    value: T,
}

impl HttpRpcTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, RpcError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RpcError::Network(e.to_string()))?;
        Ok(Self { http_client })
    }

    pub fn with_defaults() -> Result<Self, RpcError> {
        Self::new(HttpTransportConfig::default())
    }

    /// Executes one JSON-RPC call, tolerating a `null` result.
    #[instrument(skip(self, params))]
    async fn rpc_call_optional<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: &'static str,
        params: P,
    ) -> Result<Option<R>, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| RpcError::Malformed(e.to_string()))?;

        unwrap_response(rpc_response)
    }

    /// Executes one JSON-RPC call that must produce a result.
    async fn rpc_call<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: &'static str,
        params: P,
    ) -> Result<R, RpcError> {
        self.rpc_call_optional(endpoint, method, params)
            .await?
            .ok_or_else(|| RpcError::Malformed("empty response".to_string()))
    }
}

#[async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn get_balance(&self, endpoint: &str, address: &PublicKey) -> Result<u64, RpcError> {
        let result: RpcValue<u64> = self
            .rpc_call(endpoint, "getBalance", json!([address.to_base58()]))
            .await?;
        Ok(result.value)
    }

    async fn get_signatures_for_address(
        &self,
        endpoint: &str,
        address: &PublicKey,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, RpcError> {
        self.rpc_call(
            endpoint,
            "getSignaturesForAddress",
            json!([address.to_base58(), { "limit": limit }]),
        )
        .await
    }

    async fn get_transaction(&self, endpoint: &str, signature: &str) -> Result<(), RpcError> {
        // A null result (transaction pruned or unknown) is not a transport
        // failure; the summary falls back to the signature listing.
        let _detail: Option<serde_json::Value> = self
            .rpc_call_optional(
                endpoint,
                "getTransaction",
                json!([signature, { "maxSupportedTransactionVersion": 0 }]),
            )
            .await?;
        Ok(())
    }

    async fn get_account_info(
        &self,
        endpoint: &str,
        address: &PublicKey,
    ) -> Result<Option<AccountRecord>, RpcError> {
        let result: RpcValue<Option<AccountRecord>> = self
            .rpc_call(
                endpoint,
                "getAccountInfo",
                json!([address.to_base58(), { "encoding": "base64" }]),
            )
            .await?;
        Ok(result.value)
    }
}

fn classify_transport_error(err: reqwest::Error) -> RpcError {
    if err.is_timeout() {
        RpcError::Timeout(err.to_string())
    } else {
        RpcError::Network(err.to_string())
    }
}

fn classify_status(status: StatusCode) -> Option<RpcError> {
    match status {
        StatusCode::FORBIDDEN => Some(RpcError::Forbidden("endpoint returned HTTP 403".to_string())),
        StatusCode::TOO_MANY_REQUESTS => {
            Some(RpcError::RateLimited("endpoint returned HTTP 429".to_string()))
        }
        _ => None,
    }
}

fn unwrap_response<R>(response: JsonRpcResponse<R>) -> Result<Option<R>, RpcError> {
    if let Some(error) = response.error {
        return Err(RpcError::Call {
            code: error.code,
            message: error.message,
        });
    }
    Ok(response.result)
}
