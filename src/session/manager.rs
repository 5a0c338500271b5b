//! The single wallet session.
//!
//! `SessionManager` is the only owner of the active account, the connection
//! state, the pending transfer form and the balance monitor. Every mutation
//! goes through its `&mut self` methods, so there is exactly one session and
//! at most one poller.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use uuid::Uuid;

use crate::blockchain::client::LedgerConnector;
use crate::blockchain::units::Balance;
use crate::blockchain::wallet::Account;
use crate::config::WalletConfig;
use crate::session::endpoint::{Connection, ConnectionState, ConnectionStatus, EndpointSelector};
use crate::session::error::SessionError;
use crate::session::monitor::BalanceMonitor;
use crate::session::notify::{Confirmer, Notification, Notifier, DEFAULT_DURATION_MS};
use crate::session::transfer::{PendingTransfer, TransactionSubmitter};

const PROGRESS_DURATION_MS: u64 = 3_000;
const CONNECT_FAILED_DURATION_MS: u64 = 10_000;

const LOGOUT_PROMPT: &str =
    "Are you sure you want to logout? Make sure you have saved your private key!";

struct ActiveSession {
    id: Uuid,
    account: Account,
    connection: Connection,
}

/// Read-only view of the session for display.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Option<Uuid>,
    pub address: Option<String>,
    pub balance: String,
    pub currency: String,
    pub status: String,
    pub connection: ConnectionStatus,
    pub endpoint: Option<String>,
    pub polling: bool,
}

/// Which flow is activating an account, for messages.
#[derive(Debug, Clone, Copy)]
enum Origin {
    Created,
    Imported,
}

impl Origin {
    fn verb(self) -> &'static str {
        match self {
            Origin::Created => "create",
            Origin::Imported => "import",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Origin::Created => "Wallet created successfully!",
            Origin::Imported => "Wallet imported successfully!",
        }
    }
}

/// Owns and mutates the one wallet session.
pub struct SessionManager {
    selector: EndpointSelector,
    monitor: BalanceMonitor,
    submitter: TransactionSubmitter,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    network: String,
    currency: String,
    session: Option<ActiveSession>,
    connection_state: ConnectionState,
    pending: PendingTransfer,
    import_key: String,
    private_key_revealed: bool,
}

impl SessionManager {
    pub fn new(
        config: &WalletConfig,
        connector: Arc<dyn LedgerConnector>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let network = &config.network;
        let selector = EndpointSelector::new(network.endpoints.clone(), connector, network.name.clone());
        let monitor = BalanceMonitor::new(
            notifier.clone(),
            Duration::from_millis(config.polling.interval_ms),
            network.currency_symbol.clone(),
        );
        let submitter = TransactionSubmitter::new(
            notifier.clone(),
            network.chain_id,
            config.transfer.gas_limit,
            network.currency_symbol.clone(),
            network.explorer_tx_url.clone(),
            Duration::from_millis(config.polling.post_send_refresh_delay_ms),
        );

        Self {
            selector,
            monitor,
            submitter,
            notifier,
            confirmer,
            network: network.name.clone(),
            currency: network.currency_symbol.clone(),
            session: None,
            connection_state: ConnectionState::default(),
            pending: PendingTransfer::default(),
            import_key: String::new(),
            private_key_revealed: false,
        }
    }

    /// Connect and generate a brand-new account.
    pub async fn create_account(&mut self) -> Result<&Account, SessionError> {
        self.ensure_unauthenticated(Origin::Created)?;
        let connection = self.connect(Origin::Created).await?;
        self.activate(connection, Account::generate(), Origin::Created)
    }

    /// Connect and import an account from a hex private key.
    pub async fn import_account(&mut self, raw_key: &str) -> Result<&Account, SessionError> {
        self.ensure_unauthenticated(Origin::Imported)?;
        self.import_key = raw_key.to_string();

        if raw_key.trim().is_empty() {
            self.notifier
                .notify(Notification::error("Please enter a private key", DEFAULT_DURATION_MS));
            return Err(SessionError::InvalidKeyFormat("empty key".to_string()));
        }
        let account = match Account::from_private_key(raw_key) {
            Ok(account) => account,
            Err(e) => {
                let error = SessionError::InvalidKeyFormat(e.to_string());
                tracing::warn!(error = %e, "Private key rejected");
                self.notifier.notify(Notification::error(
                    format!("Failed to import wallet: {}", error),
                    DEFAULT_DURATION_MS,
                ));
                return Err(error);
            }
        };

        let connection = self.connect(Origin::Imported).await?;
        self.activate(connection, account, Origin::Imported)
    }

    /// Ask for confirmation, then end the session.
    ///
    /// Returns `Ok(false)` if the user declined; nothing changes in that case.
    pub async fn logout(&mut self) -> Result<bool, SessionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(self.not_authenticated());
        };
        let session_id = session.id;

        if !self.confirmer.confirm(LOGOUT_PROMPT).await {
            tracing::debug!(session_id = %session_id, "Logout cancelled");
            return Ok(false);
        }

        self.monitor.clear();
        self.session = None;
        self.connection_state = ConnectionState::default();
        self.pending.clear();
        self.import_key.clear();
        self.private_key_revealed = false;

        tracing::info!(session_id = %session_id, "Logged out");
        self.notifier
            .notify(Notification::info("Logged out successfully", DEFAULT_DURATION_MS));
        Ok(true)
    }

    /// Refresh the balance now, outside the polling cadence.
    pub async fn refresh_balance(&self) -> Result<Balance, SessionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(self.not_authenticated());
        };
        self.monitor
            .refresh_once(session.connection.client.as_ref(), session.account.address())
            .await
    }

    /// Send the pending transfer.
    pub async fn send_transfer(&mut self) -> Result<TxHash, SessionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(self.not_authenticated());
        };
        self.submitter
            .send(&session.connection, &session.account, &mut self.pending, &self.monitor)
            .await
    }

    /// Stop background work without asking. Used on process exit.
    pub fn shutdown(&mut self) {
        self.monitor.stop();
        if let Some(session) = self.session.as_ref() {
            tracing::info!(session_id = %session.id, "Session closed on shutdown");
        }
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.pending.recipient = recipient.into();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.pending.amount = amount.into();
    }

    pub fn pending_transfer(&self) -> &PendingTransfer {
        &self.pending
    }

    pub fn import_key(&self) -> &str {
        &self.import_key
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn account(&self) -> Option<&Account> {
        self.session.as_ref().map(|s| &s.account)
    }

    pub fn address(&self) -> Option<Address> {
        self.account().map(Account::address)
    }

    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection_state
    }

    pub fn displayed_balance(&self) -> Balance {
        self.monitor.displayed_balance()
    }

    pub fn monitor(&self) -> &BalanceMonitor {
        &self.monitor
    }

    /// Flip private key visibility and return the new state.
    pub fn toggle_private_key(&mut self) -> bool {
        self.private_key_revealed = !self.private_key_revealed;
        self.private_key_revealed
    }

    /// The private key, if revealed. Masked otherwise.
    pub fn private_key_display(&self) -> Option<String> {
        let account = self.account()?;
        if self.private_key_revealed {
            Some(account.private_key_hex())
        } else {
            Some("*".repeat(66))
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session.as_ref().map(|s| s.id),
            address: self.address().map(|a| a.to_string()),
            balance: self.displayed_balance().to_string(),
            currency: self.currency.clone(),
            status: self.connection_state.describe(&self.network),
            connection: self.connection_state.status,
            endpoint: self
                .connection_state
                .connection
                .as_ref()
                .map(|c| c.endpoint().to_string()),
            polling: self.monitor.is_polling(),
        }
    }

    fn not_authenticated(&self) -> SessionError {
        self.notifier
            .notify(Notification::error("No wallet is active", DEFAULT_DURATION_MS));
        SessionError::NotAuthenticated
    }

    fn ensure_unauthenticated(&self, origin: Origin) -> Result<(), SessionError> {
        if self.session.is_some() {
            let error = SessionError::AlreadyAuthenticated;
            tracing::warn!(flow = origin.verb(), "Account already active");
            self.notifier.notify(Notification::error(
                format!("Failed to {} wallet: {}", origin.verb(), error),
                DEFAULT_DURATION_MS,
            ));
            return Err(error);
        }
        Ok(())
    }

    async fn connect(&mut self, origin: Origin) -> Result<Connection, SessionError> {
        self.notifier.notify(Notification::info(
            format!("Connecting to {} network...", self.network),
            PROGRESS_DURATION_MS,
        ));

        match self.selector.connect(&mut self.connection_state).await {
            Ok(connection) => Ok(connection),
            Err(error) => {
                tracing::error!(flow = origin.verb(), error = %error, "Connection failed");
                self.notifier.notify(Notification::error(
                    format!(
                        "Could not connect to {}. See instructions to run a local server.",
                        self.network
                    ),
                    CONNECT_FAILED_DURATION_MS,
                ));
                Err(error)
            }
        }
    }

    fn activate(&mut self, connection: Connection, account: Account, origin: Origin) -> Result<&Account, SessionError> {
        let id = Uuid::new_v4();
        let address = account.address();

        self.monitor.start(connection.client.clone(), address);
        self.import_key.clear();
        self.private_key_revealed = false;

        tracing::info!(
            session_id = %id,
            address = %address,
            endpoint = %connection.endpoint(),
            flow = origin.verb(),
            "Session started"
        );
        self.notifier
            .notify(Notification::success(origin.done(), DEFAULT_DURATION_MS));

        let session = self.session.insert(ActiveSession {
            id,
            account,
            connection,
        });
        Ok(&session.account)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.monitor.stop();
    }
}
