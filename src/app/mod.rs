//! Application layer: resolution, failover querying, and the lookup facade.

pub mod client;
pub mod resolver;
pub mod service;

pub use client::{AccountView, ChainQueryClient};
pub use resolver::AddressResolver;
pub use service::{LookupTicket, WalletService};
