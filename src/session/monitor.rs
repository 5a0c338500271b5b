//! Balance polling and deposit detection.
//!
//! # Responsibilities
//! - Poll the account balance immediately and then on a fixed interval
//! - Compare each sample with the previous one and announce increases
//! - Own the one polling task, and cancel it on every exit path
//!
//! # Staleness
//! Every refresh records the monitor generation when it starts. `stop()`
//! bumps the generation, so a query that completes after a stop (or after a
//! new session began) is dropped without touching state or notifying.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::Address;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::units::Balance;
use crate::observability::metrics;
use crate::session::error::SessionError;
use crate::session::notify::{Notification, Notifier, Severity, DEFAULT_DURATION_MS};

const RECEIVED_DURATION_MS: u64 = 7_000;

/// The last balance seen, and whether it is the session's first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSample {
    pub value: Balance,
    /// No baseline exists yet; the next read must not announce a delta.
    pub is_first_sample: bool,
}

impl BalanceSample {
    fn initial() -> Self {
        Self {
            value: Balance::ZERO,
            is_first_sample: true,
        }
    }
}

struct MonitorState {
    generation: u64,
    sample: BalanceSample,
    displayed: Balance,
    poller: Option<JoinHandle<()>>,
    follow_ups: Vec<JoinHandle<()>>,
}

impl MonitorState {
    /// Record a new sample. Returns the increase over the previous one.
    fn apply(&mut self, value: Balance) -> Option<Balance> {
        let received = if self.sample.is_first_sample {
            None
        } else {
            value.increase_since(&self.sample.value)
        };
        self.sample = BalanceSample {
            value,
            is_first_sample: false,
        };
        self.displayed = value;
        received
    }
}

struct Shared {
    state: Mutex<MonitorState>,
    notifier: Arc<dyn Notifier>,
    currency: String,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn refresh(
        &self,
        client: &dyn LedgerClient,
        address: Address,
        generation: u64,
    ) -> Result<Balance, SessionError> {
        let result = client.balance(address).await;

        let outcome = {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::debug!(address = %address, "Discarding balance from a stopped monitor");
                return result
                    .map(Balance::from_wei)
                    .map_err(|e| SessionError::BalanceQuery(e.to_string()));
            }
            result.map(|wei| {
                let value = Balance::from_wei(wei);
                (value, state.apply(value))
            })
        };

        match outcome {
            Ok((value, received)) => {
                metrics::record_balance_poll(true);
                metrics::record_balance(value.as_f64());
                tracing::debug!(address = %address, balance = %value, "Balance refreshed");

                if let Some(delta) = received {
                    metrics::record_funds_received();
                    tracing::info!(address = %address, delta = %delta, balance = %value, "Funds received");
                    self.notifier.notify(Notification::new(
                        format!("{} Received!", self.currency),
                        format!("You received {} {}", delta, self.currency),
                        Severity::Success,
                        RECEIVED_DURATION_MS,
                    ));
                }
                Ok(value)
            }
            Err(e) => {
                metrics::record_balance_poll(false);
                tracing::warn!(address = %address, error = %e, "Balance query failed");
                self.notifier.notify(Notification::error(
                    format!("Failed to fetch balance: {}", e),
                    DEFAULT_DURATION_MS,
                ));
                Err(SessionError::BalanceQuery(e.to_string()))
            }
        }
    }
}

/// Polls one account's balance and reports deposits.
pub struct BalanceMonitor {
    shared: Arc<Shared>,
    poll_interval: Duration,
}

impl BalanceMonitor {
    pub fn new(notifier: Arc<dyn Notifier>, poll_interval: Duration, currency: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(MonitorState {
                    generation: 0,
                    sample: BalanceSample::initial(),
                    displayed: Balance::ZERO,
                    poller: None,
                    follow_ups: Vec::new(),
                }),
                notifier,
                currency: currency.into(),
            }),
            poll_interval,
        }
    }

    /// Begin polling `address`, replacing any previous poller.
    ///
    /// The baseline is re-armed, so the first read after `start` is silent.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, client: Arc<dyn LedgerClient>, address: Address) {
        self.stop();

        let mut state = self.shared.lock();
        state.sample = BalanceSample::initial();
        let generation = state.generation;
        let shared = Arc::clone(&self.shared);
        let period = self.poll_interval;

        state.poller = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = shared.refresh(client.as_ref(), address, generation).await;
            }
        }));

        tracing::info!(
            address = %address,
            interval_ms = period.as_millis() as u64,
            "Balance polling started"
        );
    }

    /// Cancel polling and any scheduled follow-up refresh. Idempotent.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        state.generation = state.generation.wrapping_add(1);
        if let Some(poller) = state.poller.take() {
            poller.abort();
            tracing::debug!("Balance polling stopped");
        }
        for follow_up in state.follow_ups.drain(..) {
            follow_up.abort();
        }
    }

    /// Stop and forget everything about the previous account.
    pub fn clear(&self) {
        self.stop();
        let mut state = self.shared.lock();
        state.sample = BalanceSample::initial();
        state.displayed = Balance::ZERO;
    }

    /// Query the balance once and apply it.
    ///
    /// Does not re-arm first-sample suppression.
    pub async fn refresh_once(&self, client: &dyn LedgerClient, address: Address) -> Result<Balance, SessionError> {
        let generation = self.shared.lock().generation;
        self.shared.refresh(client, address, generation).await
    }

    /// Run exactly one refresh after `delay`, outside the polling cadence.
    pub fn schedule_refresh(&self, client: Arc<dyn LedgerClient>, address: Address, delay: Duration) {
        let mut state = self.shared.lock();
        state.follow_ups.retain(|handle| !handle.is_finished());
        let generation = state.generation;
        let shared = Arc::clone(&self.shared);

        state.follow_ups.push(tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = shared.refresh(client.as_ref(), address, generation).await;
        }));
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock().poller.is_some()
    }

    /// Balance as last shown to the user.
    pub fn displayed_balance(&self) -> Balance {
        self.shared.lock().displayed
    }

    pub fn sample(&self) -> BalanceSample {
        self.shared.lock().sample
    }
}

impl Drop for BalanceMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
