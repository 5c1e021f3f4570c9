//! Environment-driven configuration for the lookup pipeline.

use std::env;
use std::time::Duration;

/// Environment variable that overrides the primary RPC endpoint.
pub const RPC_ENDPOINT_ENV: &str = "SOLANA_RPC_ENDPOINT";

/// Public mainnet endpoint used when no override is configured.
pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

/// Static community fallbacks tried after the primary, in order.
pub const FALLBACK_RPC_ENDPOINTS: [&str; 2] = [
    "https://solana-api.projectserum.com",
    "https://solana-mainnet.g.alchemy.com/v2/demo",
];

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration for the lookup pipeline.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Ordered endpoint pool; the first entry is the primary.
    pub endpoints: Vec<String>,
    /// Per-call HTTP timeout; expiry counts as a retryable network failure.
    pub request_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoints: endpoint_list(None),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Builds configuration from the environment, honoring `.env` files.
    ///
    /// `SOLANA_RPC_ENDPOINT` replaces the primary endpoint; the fallback
    /// list stays fixed.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let primary = env::var(RPC_ENDPOINT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self {
            endpoints: endpoint_list(primary.as_deref()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Builds configuration over an explicit endpoint list.
    #[must_use]
    pub fn with_endpoints(endpoints: Vec<String>) -> Self {
        Self {
            endpoints,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn endpoint_list(primary: Option<&str>) -> Vec<String> {
    let mut endpoints = vec![primary.unwrap_or(DEFAULT_RPC_ENDPOINT).to_string()];
    endpoints.extend(FALLBACK_RPC_ENDPOINTS.iter().map(|url| (*url).to_string()));
    endpoints
}
