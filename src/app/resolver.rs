//! Input classification, validation, and name-service resolution.

use std::collections::HashMap;

use crate::domain::{
    AddressError, DOMAIN_SUFFIX, MAX_ADDRESS_CHARS, MIN_ADDRESS_CHARS, PUBLIC_KEY_BYTES,
    PublicKey, ResolveError, ValidationResult,
};

/// Registry entries shipped by default. Real, active mainnet wallets.
const KNOWN_DOMAINS: [(&str, &str); 3] = [
    ("toly.sol", "5tzFkiKscXHK5ZXCGbXZxdw7gTjjD1mBwuoFbhUvuAi9"),
    ("shaq.sol", "GThUX1Atko4tqhN2NaiTazWSeFWMuiUvfFnyJyUghFMJ"),
    ("mccann.sol", "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"),
];

/// Classifies raw input and resolves `.sol` domains.
///
/// Domain resolution is a static registry lookup, not a live name-service
/// protocol call; live resolution is a future extension. The registry is
/// injectable so tests can supply their own mappings.
///
/// Purely functional: no side effects, no network access.
pub struct AddressResolver {
    registry: HashMap<String, String>,
}

impl AddressResolver {
    /// Creates a resolver seeded with the built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(
            KNOWN_DOMAINS
                .iter()
                .map(|(domain, address)| ((*domain).to_string(), (*address).to_string())),
        )
    }

    /// Creates a resolver over a custom domain-to-address registry.
    #[must_use]
    pub fn with_registry(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            registry: entries.into_iter().collect(),
        }
    }

    /// Classifies and validates a raw input string.
    ///
    /// Rules are applied in order: empty input, domain suffix (valid with
    /// resolution deferred), character length range, base58 decode to
    /// exactly 32 bytes. Validation of a domain does not guarantee it
    /// resolves.
    #[must_use]
    pub fn validate(&self, input: &str) -> ValidationResult {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return ValidationResult::invalid(AddressError::EmptyInput);
        }

        if trimmed.ends_with(DOMAIN_SUFFIX) {
            return ValidationResult::valid_domain();
        }

        let actual = trimmed.chars().count();
        if !(MIN_ADDRESS_CHARS..=MAX_ADDRESS_CHARS).contains(&actual) {
            return ValidationResult::invalid(AddressError::BadLength {
                min: MIN_ADDRESS_CHARS,
                max: MAX_ADDRESS_CHARS,
                actual,
            });
        }

        match bs58::decode(trimmed).into_vec() {
            Ok(bytes) if bytes.len() == PUBLIC_KEY_BYTES => ValidationResult::valid_address(),
            _ => ValidationResult::invalid(AddressError::BadEncoding {
                expected: PUBLIC_KEY_BYTES,
            }),
        }
    }

    /// Resolves a domain to its canonical key via the registry.
    ///
    /// The domain is normalized (trimmed, lower-cased) before lookup, so
    /// known domains always map to the same address.
    pub fn resolve_domain(&self, domain: &str) -> Result<PublicKey, ResolveError> {
        let normalized = domain.trim().to_lowercase();

        let address = self
            .registry
            .get(&normalized)
            .ok_or_else(|| ResolveError::DomainNotFound(normalized.clone()))?;

        PublicKey::from_base58(address)
            .map_err(|_| ResolveError::InvalidMapping { domain: normalized })
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new()
    }
}
