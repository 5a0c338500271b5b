//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a single JSON-RPC endpoint
//! - Query chain state (block number, balances, gas price, nonce)
//! - Broadcast signed transactions and wait for their receipt
//! - Handle timeouts and network errors gracefully
//!
//! Failover across endpoints is the session layer's job; a client is bound
//! to exactly one URL.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// The network half of the signing client, bound to one endpoint.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// URL this client talks to.
    fn endpoint(&self) -> &str;

    /// Latest block height. Used as the liveness probe.
    async fn block_number(&self) -> BlockchainResult<u64>;

    /// Balance of `address` in wei.
    async fn balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Next nonce for `address`.
    async fn nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// Broadcast a signed transaction and wait until it is mined.
    async fn broadcast(&self, raw: Bytes) -> BlockchainResult<TxHash>;
}

/// Builds a client handle for an endpoint URL.
pub trait LedgerConnector: Send + Sync {
    fn open(&self, url: &str) -> BlockchainResult<Arc<dyn LedgerClient>>;
}

/// JSON-RPC client over an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    url: String,
    /// Request timeout duration.
    timeout_duration: Duration,
    receipt_timeout: Duration,
}

impl RpcClient {
    /// Create a client for `url`. No request is made until the first call.
    pub fn new(url: &str, timeout_duration: Duration, receipt_timeout: Duration) -> BlockchainResult<Self> {
        let parsed: url::Url = url.parse().map_err(|e: url::ParseError| BlockchainError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let provider = Arc::new(ProviderBuilder::new().connect_http(parsed)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            url: url.to_string(),
            timeout_duration,
            receipt_timeout,
        })
    }

    async fn call<T, E, F>(&self, what: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %self.url, call = what, error = %e, "RPC error");
                Err(BlockchainError::Rpc(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(endpoint = %self.url, call = what, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number()).await
    }

    async fn balance(&self, address: Address) -> BlockchainResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address)).await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.call("eth_getTransactionCount", self.provider.get_transaction_count(address))
            .await
    }

    async fn broadcast(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let pending = self
            .call("eth_sendRawTransaction", self.provider.send_raw_transaction(&raw))
            .await?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, "Transaction broadcast, awaiting receipt");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| BlockchainError::Rpc(e.to_string()))?;

        if !ReceiptResponse::status(&receipt) {
            return Err(BlockchainError::Reverted(tx_hash.to_string()));
        }
        Ok(ReceiptResponse::transaction_hash(&receipt))
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// Opens [`RpcClient`]s over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout_duration: Duration,
    receipt_timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout_duration: Duration, receipt_timeout: Duration) -> Self {
        Self {
            timeout_duration,
            receipt_timeout,
        }
    }
}

impl LedgerConnector for HttpConnector {
    fn open(&self, url: &str) -> BlockchainResult<Arc<dyn LedgerClient>> {
        let client = RpcClient::new(url, self.timeout_duration, self.receipt_timeout)?;
        Ok(Arc::new(client))
    }
}
