//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint URL
//!     → client.rs (RPC connection with timeouts)
//! Raw key / fresh randomness
//!     → wallet.rs (account, address checks, signing)
//! Recipient + amount
//!     → units.rs (ether ↔ wei, 6-decimal balances)
//!     → transaction.rs (build, sign, broadcast)
//! ```
//!
//! # Security Constraints
//! - Private keys are held in memory only
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::{HttpConnector, LedgerClient, LedgerConnector, RpcClient};
pub use types::{BlockchainError, BlockchainResult};
pub use units::Balance;
pub use wallet::Account;
