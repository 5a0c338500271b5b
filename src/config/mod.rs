//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → handed to SessionManager at startup
//! ```
//!
//! # Design Decisions
//! - Defaults are the wallet's built-in constants; the file only overrides
//! - Config is immutable once loaded; there is no hot reload
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::NetworkConfig;
pub use schema::ObservabilityConfig;
pub use schema::PollingConfig;
pub use schema::TransferConfig;
pub use schema::WalletConfig;
