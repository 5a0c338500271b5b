//! Configuration schema definitions.
//!
//! Every field defaults to the wallet's built-in constants, so an empty file
//! (or no file at all) yields a working Sepolia configuration.

use serde::{Deserialize, Serialize};

/// Sepolia chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Public Sepolia RPC endpoints, tried in order.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://eth-sepolia.public.blastapi.io",
    "https://rpc2.sepolia.org",
    "https://ethereum-sepolia.publicnode.com",
    "https://sepolia.gateway.tenderly.co",
];

/// Gas allowance of a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Root configuration for the wallet.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Ledger network and endpoint list.
    pub network: NetworkConfig,

    /// Balance polling cadence.
    pub polling: PollingConfig,

    /// Transfer construction settings.
    pub transfer: TransferConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote ledger network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Human-readable network name used in notifications.
    pub name: String,

    /// Chain ID for EIP-155 replay protection.
    pub chain_id: u64,

    /// Ordered JSON-RPC endpoint URLs (first reachable wins).
    pub endpoints: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a broadcast transaction's receipt.
    pub receipt_timeout_secs: u64,

    /// Native currency ticker.
    pub currency_symbol: String,

    /// Block explorer prefix for transaction links.
    pub explorer_tx_url: String,

    /// Faucets that hand out test funds.
    pub faucets: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "Sepolia".to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 120,
            currency_symbol: "ETH".to_string(),
            explorer_tx_url: "https://sepolia.etherscan.io/tx/".to_string(),
            faucets: vec![
                "https://www.alchemy.com/faucets/ethereum-sepolia".to_string(),
                "https://sepoliafaucet.com/".to_string(),
                "https://www.infura.io/faucet/sepolia".to_string(),
                "https://faucet.quicknode.com/ethereum/sepolia".to_string(),
            ],
        }
    }
}

/// Balance polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval between balance polls in milliseconds.
    pub interval_ms: u64,

    /// Delay before the one-shot refresh that follows a successful send.
    pub post_send_refresh_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            post_send_refresh_delay_ms: 2_000,
        }
    }
}

/// Transfer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Fixed gas allowance for value transfers.
    pub gas_limit: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            gas_limit: TRANSFER_GAS_LIMIT,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
