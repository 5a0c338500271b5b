//! Value transfers: validate, build, sign, broadcast, classify.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};

use crate::blockchain::transaction::{truncate_address, TxBuilder};
use crate::blockchain::units::{parse_ether_amount, AmountError};
use crate::blockchain::wallet::{is_valid_address, Account};
use crate::observability::metrics;
use crate::session::endpoint::Connection;
use crate::session::error::{classify_failure, SessionError, ValidationError};
use crate::session::monitor::BalanceMonitor;
use crate::session::notify::{Notification, Notifier, Severity, DEFAULT_DURATION_MS};

const PROGRESS_DURATION_MS: u64 = 3_000;
const SENT_DURATION_MS: u64 = 8_000;
const FAILED_DURATION_MS: u64 = 6_000;

/// The send form: what the user typed, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingTransfer {
    pub recipient: String,
    /// Decimal amount in the display unit.
    pub amount: String,
}

impl PendingTransfer {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    pub fn clear(&mut self) {
        self.recipient.clear();
        self.amount.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.recipient.is_empty() && self.amount.is_empty()
    }
}

/// Check the form without touching the network.
///
/// Returns the parsed recipient and the amount in wei.
pub fn validate_transfer(pending: &PendingTransfer) -> Result<(Address, U256), ValidationError> {
    let recipient = pending.recipient.trim();
    let amount = pending.amount.trim();

    if recipient.is_empty() || amount.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_address(recipient) {
        return Err(ValidationError::InvalidAddress);
    }
    let address: Address = recipient.parse().map_err(|_| ValidationError::InvalidAddress)?;
    let value = parse_ether_amount(amount).map_err(|e| match e {
        AmountError::NonPositive => ValidationError::NonPositiveAmount,
        AmountError::Invalid(reason) => ValidationError::InvalidAmount(reason),
    })?;

    Ok((address, value))
}

fn validation_message(error: &ValidationError) -> String {
    match error {
        ValidationError::MissingFields => "Please enter both recipient address and amount".to_string(),
        ValidationError::InvalidAddress => "Invalid recipient address".to_string(),
        ValidationError::InvalidAmount(_) => "Please enter a valid amount".to_string(),
        ValidationError::NonPositiveAmount => "Amount must be greater than 0".to_string(),
    }
}

/// Sends value from the session account.
pub struct TransactionSubmitter {
    notifier: Arc<dyn Notifier>,
    chain_id: u64,
    gas_limit: u64,
    currency: String,
    explorer_tx_url: String,
    post_send_refresh: Duration,
}

impl TransactionSubmitter {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        chain_id: u64,
        gas_limit: u64,
        currency: impl Into<String>,
        explorer_tx_url: impl Into<String>,
        post_send_refresh: Duration,
    ) -> Self {
        Self {
            notifier,
            chain_id,
            gas_limit,
            currency: currency.into(),
            explorer_tx_url: explorer_tx_url.into(),
            post_send_refresh,
        }
    }

    /// Validate and send the pending transfer.
    ///
    /// On success the form is cleared and one balance refresh is scheduled on
    /// `monitor`. On failure the form is left as typed.
    pub async fn send(
        &self,
        connection: &Connection,
        account: &Account,
        pending: &mut PendingTransfer,
        monitor: &BalanceMonitor,
    ) -> Result<TxHash, SessionError> {
        let (recipient, value) = match validate_transfer(pending) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Transfer rejected");
                metrics::record_transfer("invalid");
                self.notifier
                    .notify(Notification::error(validation_message(&e), DEFAULT_DURATION_MS));
                return Err(e.into());
            }
        };

        let builder = TxBuilder::new(connection.client.as_ref(), account, self.chain_id, self.gas_limit);
        match self.submit(&builder, recipient, value).await {
            Ok(tx_hash) => {
                metrics::record_transfer("sent");
                tracing::info!(
                    tx_hash = %tx_hash,
                    to = %recipient,
                    amount = %pending.amount.trim(),
                    "View on explorer: {}{}",
                    self.explorer_tx_url,
                    tx_hash
                );
                self.notifier.notify(Notification::new(
                    "Transaction Successful!",
                    format!(
                        "Sent {} {} to {}",
                        pending.amount.trim(),
                        self.currency,
                        truncate_address(pending.recipient.trim())
                    ),
                    Severity::Success,
                    SENT_DURATION_MS,
                ));
                pending.clear();
                monitor.schedule_refresh(connection.client.clone(), account.address(), self.post_send_refresh);
                Ok(tx_hash)
            }
            Err(message) => {
                let error = classify_failure(&message);
                tracing::error!(error = %message, to = %recipient, "Transfer failed");
                let text = match &error {
                    SessionError::InsufficientFunds => {
                        metrics::record_transfer("insufficient_funds");
                        "Insufficient funds for transaction".to_string()
                    }
                    _ => {
                        metrics::record_transfer("failed");
                        format!("Transaction failed: {}", message)
                    }
                };
                self.notifier.notify(Notification::error(text, FAILED_DURATION_MS));
                Err(error)
            }
        }
    }

    async fn submit(&self, builder: &TxBuilder<'_>, to: Address, value: U256) -> Result<TxHash, String> {
        self.notifier
            .notify(Notification::info("Preparing transaction...", PROGRESS_DURATION_MS));
        let request = builder.build(to, value).await.map_err(|e| e.to_string())?;
        let raw = builder.sign(request).map_err(|e| e.to_string())?;

        self.notifier
            .notify(Notification::info("Sending transaction...", PROGRESS_DURATION_MS));
        builder.broadcast(raw).await.map_err(|e| e.to_string())
    }
}
