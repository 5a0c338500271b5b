//! Sepolia testnet wallet library.
//!
//! One in-memory account at a time: create or import it, watch its balance,
//! and send value to other addresses.

pub mod blockchain;
pub mod config;
pub mod console;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::WalletConfig;
pub use lifecycle::Shutdown;
pub use session::SessionManager;
