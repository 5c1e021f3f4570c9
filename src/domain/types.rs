use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::AddressError;

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Raw byte length of a Solana public key.
pub const PUBLIC_KEY_BYTES: usize = 32;

/// Inclusive base58 character range for a wallet address.
pub const MIN_ADDRESS_CHARS: usize = 32;
pub const MAX_ADDRESS_CHARS: usize = 44;

/// Reserved suffix marking a name-service domain.
pub const DOMAIN_SUFFIX: &str = ".sol";

/// How many recent signatures are listed per lookup.
pub const SIGNATURE_LIST_LIMIT: usize = 5;

/// How many of the listed signatures get a full detail fetch.
pub const TRANSACTION_DETAIL_LIMIT: usize = 3;

/// Marker recorded on a summary whose detail fetch failed.
pub const DETAIL_FETCH_FAILED: &str = "Failed to fetch details";

/// A 32-byte Solana public key in its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTES]);

impl PublicKey {
    /// Parses a base58-encoded key, requiring exactly 32 decoded bytes.
    pub fn from_base58(encoded: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|_| AddressError::InvalidFormat)?;
        let bytes: [u8; PUBLIC_KEY_BYTES] =
            bytes.try_into().map_err(|_| AddressError::InvalidFormat)?;
        Ok(Self(bytes))
    }

    /// Canonical base58 encoding of the key.
    #[must_use]
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_BYTES] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for PublicKey {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

/// Outcome of classifying and validating a raw input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<AddressError>,
    pub is_domain: bool,
}

impl ValidationResult {
    #[must_use]
    pub fn valid_address() -> Self {
        Self {
            is_valid: true,
            error: None,
            is_domain: false,
        }
    }

    /// A domain is classified as valid without a registry lookup;
    /// resolution is deferred to fetch time.
    #[must_use]
    pub fn valid_domain() -> Self {
        Self {
            is_valid: true,
            error: None,
            is_domain: true,
        }
    }

    #[must_use]
    pub fn invalid(error: AddressError) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
            is_domain: false,
        }
    }
}

/// A canonical key together with the input string it came from,
/// so the caller can display a "domain → address" mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub key: PublicKey,
    pub original_input: String,
}

/// One row from the recent-signatures listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub signature: String,
    pub slot: u64,
    #[serde(rename = "blockTime")]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
}

/// On-chain account metadata returned by the account-info query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
}

/// Condensed view of one recent transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionSummary {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub success: bool,
    pub error: Option<String>,
}

impl TransactionSummary {
    /// Builds a summary from the signature listing after a successful
    /// detail fetch. Success reflects the on-chain execution result.
    #[must_use]
    pub fn from_record(record: &SignatureRecord) -> Self {
        Self {
            signature: record.signature.clone(),
            slot: record.slot,
            block_time: record.block_time,
            success: record.err.is_none(),
            error: record.err.as_ref().map(ToString::to_string),
        }
    }

    /// Builds a placeholder summary when the detail fetch itself failed.
    /// This never fails the whole lookup.
    #[must_use]
    pub fn detail_unavailable(record: &SignatureRecord) -> Self {
        Self {
            signature: record.signature.clone(),
            slot: record.slot,
            block_time: record.block_time,
            success: false,
            error: Some(DETAIL_FETCH_FAILED.to_string()),
        }
    }

    /// Truncated signature form for display, eight characters per end.
    #[must_use]
    pub fn short_signature(&self) -> String {
        truncate_middle(&self.signature, 8)
    }

    /// Block time as a UTC timestamp, if the chain reported one.
    #[must_use]
    pub fn block_time_utc(&self) -> Option<DateTime<Utc>> {
        self.block_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Normalized, immutable result record for one lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    /// Canonically-encoded address, regardless of whether the input
    /// was a domain or a raw address.
    pub address: String,
    pub original_input: String,
    pub balance_sol: f64,
    pub balance_lamports: u64,
    /// Most recent first, never longer than the detail-fetch limit.
    pub transactions: Vec<TransactionSummary>,
    /// Size of the signature listing, which may exceed `transactions.len()`.
    pub total_transactions: usize,
    pub account_exists: bool,
    pub is_executable: bool,
    pub owner: Option<String>,
}

impl WalletSnapshot {
    /// Truncated address form for display, six characters per end.
    #[must_use]
    pub fn short_address(&self) -> String {
        truncate_middle(&self.address, 6)
    }
}

fn truncate_middle(value: &str, keep: usize) -> String {
    if value.len() <= keep * 2 {
        return value.to_string();
    }
    format!("{}...{}", &value[..keep], &value[value.len() - keep..])
}
