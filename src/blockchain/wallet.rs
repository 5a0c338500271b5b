//! Account keys and transaction signing.
//!
//! # Security
//! - Keys live only in memory and are dropped with the [`Account`]
//! - Keys are never logged; `Debug` prints the address only
//! - All cryptography is alloy's local signer

use std::fmt;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// An in-memory account: an address and the key that controls it.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        let signer = PrivateKeySigner::random();
        tracing::info!(address = %signer.address(), "Account generated");
        Self { signer }
    }

    /// Import an account from a hex-encoded private key.
    ///
    /// The key may be given with or without the `0x` prefix.
    pub fn from_private_key(raw_key: &str) -> BlockchainResult<Self> {
        let normalized = normalize_private_key(raw_key);
        let bytes: B256 = normalized
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        let signer = PrivateKeySigner::from_bytes(&bytes)
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key: {}", e)))?;

        tracing::info!(address = %signer.address(), "Account imported");
        Ok(Self { signer })
    }

    /// The account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The private key as `0x`-prefixed hex. Handle with care.
    pub fn private_key_hex(&self) -> String {
        self.signer.to_bytes().to_string()
    }

    /// Sign a legacy transaction and return its raw EIP-2718 encoding.
    pub fn sign_transaction(&self, mut tx: TxLegacy) -> BlockchainResult<Bytes> {
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
        let envelope = TxEnvelope::from(tx.into_signed(signature));
        Ok(envelope.encoded_2718().into())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Prepend `0x` to a key that lacks it.
pub fn normalize_private_key(raw_key: &str) -> String {
    let trimmed = raw_key.trim();
    if trimmed.starts_with("0x") {
        trimmed.to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

/// Check an address string the way wallets usually do.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase hex are
/// accepted as-is; mixed case must carry a valid EIP-55 checksum.
pub fn is_valid_address(candidate: &str) -> bool {
    let hex = candidate.strip_prefix("0x").unwrap_or(candidate);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", hex), None).is_ok()
    } else {
        true
    }
}
