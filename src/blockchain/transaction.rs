//! Transfer building, signing, and broadcast.
//!
//! # Responsibilities
//! - Query gas price and nonce for the sender
//! - Build a legacy value transfer with a fixed gas allowance
//! - Sign it with the sender's account and broadcast it

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::wallet::Account;

/// A fully specified value transfer, ready to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: Address,
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: u64,
}

impl TransferRequest {
    /// Convert into the unsigned legacy transaction.
    pub fn into_legacy(self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: Bytes::new(),
        }
    }
}

/// Builds and sends transfers for one account over one client.
pub struct TxBuilder<'a> {
    client: &'a dyn LedgerClient,
    account: &'a Account,
    chain_id: u64,
    gas_limit: u64,
}

impl<'a> TxBuilder<'a> {
    pub fn new(client: &'a dyn LedgerClient, account: &'a Account, chain_id: u64, gas_limit: u64) -> Self {
        Self {
            client,
            account,
            chain_id,
            gas_limit,
        }
    }

    /// Query the fee rate and nonce, then assemble the transfer.
    pub async fn build(&self, to: Address, value: U256) -> BlockchainResult<TransferRequest> {
        let gas_price = self.client.gas_price().await?;
        let nonce = self.client.nonce(self.account.address()).await?;

        tracing::debug!(
            to = %to,
            value = %value,
            gas_price = gas_price,
            nonce = nonce,
            "Transfer built"
        );

        Ok(TransferRequest {
            from: self.account.address(),
            to,
            value,
            gas_limit: self.gas_limit,
            gas_price,
            nonce,
            chain_id: self.chain_id,
        })
    }

    /// Sign the transfer with the account key.
    pub fn sign(&self, request: TransferRequest) -> BlockchainResult<Bytes> {
        self.account.sign_transaction(request.into_legacy())
    }

    /// Broadcast a signed transfer and wait for its receipt.
    pub async fn broadcast(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let tx_hash = self.client.broadcast(raw).await?;
        tracing::info!(tx_hash = %tx_hash, endpoint = %self.client.endpoint(), "Transfer mined");
        Ok(tx_hash)
    }
}

/// Shorten an address for display: first six and last four characters.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
