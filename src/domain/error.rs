//! Lookup error types with proper error chaining.

use thiserror::Error;

/// Input validation and address parsing failures. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address cannot be empty")]
    EmptyInput,
    #[error("Invalid address length: expected {min}-{max} characters, got {actual}")]
    BadLength {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("Invalid address encoding: expected base58 decoding to {expected} bytes")]
    BadEncoding { expected: usize },
    #[error("Invalid wallet address format")]
    InvalidFormat,
}

/// Name-service resolution failures. Never retried across endpoints.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Domain '{0}' is not present in the name registry")]
    DomainNotFound(String),
    #[error("Registry entry for '{domain}' is not a valid address")]
    InvalidMapping { domain: String },
}

/// Failures raised by the RPC transport for a single upstream call.
///
/// The retryable variants map one-to-one onto the failover conditions:
/// HTTP 403, HTTP 429, transport-level network failures, and per-call
/// timeouts. Everything else surfaces to the caller without rotation.
#[derive(Error, Debug, Clone)]
pub enum RpcError {
    #[error("Access forbidden by RPC endpoint: {0}")]
    Forbidden(String),
    #[error("Rate limited by RPC endpoint: {0}")]
    RateLimited(String),
    #[error("Network error reaching RPC endpoint: {0}")]
    Network(String),
    #[error("RPC request timed out: {0}")]
    Timeout(String),
    #[error("RPC call failed with code {code}: {message}")]
    Call { code: i64, message: String },
    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

impl RpcError {
    /// Whether endpoint rotation and re-attempt is the right recovery.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RpcError::Forbidden(_)
                | RpcError::RateLimited(_)
                | RpcError::Network(_)
                | RpcError::Timeout(_)
        )
    }

    /// Stable label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Forbidden(_) => "forbidden",
            RpcError::RateLimited(_) => "rate_limited",
            RpcError::Network(_) => "network",
            RpcError::Timeout(_) => "timeout",
            RpcError::Call { .. } => "call",
            RpcError::Malformed(_) => "malformed",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Top-level error surfaced by the lookup pipeline.
///
/// The availability messages keep the "RPC" and "unavailable" wording
/// stable; the presentation layer keys off them to suggest configuring
/// a custom endpoint.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("Failed to resolve {domain}: {source}")]
    DomainResolutionFailed {
        domain: String,
        #[source]
        source: ResolveError,
    },
    #[error("Failed to fetch wallet information: {0}")]
    Query(#[from] RpcError),
    #[error(
        "All RPC endpoints are currently unavailable after {attempts} attempts; try again later or configure a custom RPC endpoint"
    )]
    AllEndpointsUnavailable { attempts: usize },
    #[error("Rate limit exceeded on all {attempts} RPC endpoints; try again in a moment")]
    RateLimitExhausted { attempts: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
