//! sollens
//!
//! A read-only Solana wallet lookup pipeline with name resolution and
//! RPC endpoint failover, built for testability through trait-based
//! abstraction and dependency injection.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Application Layer               │
//! │  AddressResolver, ChainQueryClient (failover)│
//! │  WalletService (caller-facing facade)        │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Types, RpcTransport trait, error taxonomy  │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  JSON-RPC HTTP transport, config, telemetry  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Trait-based abstraction**: the wire protocol sits behind
//!   [`domain::RpcTransport`], so the failover policy is tested without
//!   a network
//! - **Sticky endpoint failover**: retryable failures rotate through the
//!   configured endpoint pool, at most one attempt per endpoint, and the
//!   rotation persists across requests
//! - **Typed errors**: validation, resolution, and transport failures are
//!   structured enums; no message-substring matching anywhere
//! - **Logging**: structured logging with `tracing`, counters via `metrics`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sollens::app::{AddressResolver, ChainQueryClient, WalletService};
//! use sollens::infra::{HttpRpcTransport, LookupConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sollens::domain::LookupError> {
//!     let config = LookupConfig::from_env();
//!     let transport = Arc::new(HttpRpcTransport::with_defaults()?);
//!     let chain = ChainQueryClient::new(transport, config.endpoints)?;
//!     let service = WalletService::new(AddressResolver::new(), chain);
//!
//!     let snapshot = service.fetch_wallet_snapshot("toly.sol").await?;
//!     println!("{} holds {} SOL", snapshot.address, snapshot.balance_sol);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;
pub mod test_utils;
