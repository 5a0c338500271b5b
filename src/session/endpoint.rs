//! Endpoint failover.
//!
//! Endpoints are probed strictly in configured order and the first one that
//! answers a block-height query wins. Nothing is remembered between calls:
//! every `connect` starts over from the first endpoint.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::blockchain::client::{LedgerClient, LedgerConnector};
use crate::observability::metrics;
use crate::session::error::SessionError;

/// Lifecycle of the ledger connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConnectionStatus {
    #[default]
    Uninitialized,
    Connecting,
    Connected,
    Failed,
}

/// A live client bound to the endpoint that answered.
#[derive(Clone)]
pub struct Connection {
    pub endpoint_index: usize,
    pub client: Arc<dyn LedgerClient>,
}

impl Connection {
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint_index", &self.endpoint_index)
            .field("endpoint", &self.endpoint())
            .finish()
    }
}

/// What the session currently knows about its connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub selected_endpoint_index: Option<usize>,
    pub connection: Option<Connection>,
}

impl ConnectionState {
    /// Status line suitable for display.
    pub fn describe(&self, network: &str) -> String {
        match self.status {
            ConnectionStatus::Uninitialized => "Initializing...".to_string(),
            ConnectionStatus::Connecting => "Connecting...".to_string(),
            ConnectionStatus::Connected => format!("Connected to {}", network),
            ConnectionStatus::Failed => "Connection failed".to_string(),
        }
    }
}

/// Picks the first reachable endpoint from a fixed list.
pub struct EndpointSelector {
    endpoints: Vec<String>,
    connector: Arc<dyn LedgerConnector>,
    network: String,
}

impl EndpointSelector {
    pub fn new(endpoints: Vec<String>, connector: Arc<dyn LedgerConnector>, network: impl Into<String>) -> Self {
        Self {
            endpoints,
            connector,
            network: network.into(),
        }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Probe endpoints in order and return the first live one.
    ///
    /// `state` moves to `Connecting`, then to `Connected` or `Failed`.
    pub async fn connect(&self, state: &mut ConnectionState) -> Result<Connection, SessionError> {
        state.status = ConnectionStatus::Connecting;
        state.selected_endpoint_index = None;
        state.connection = None;

        for (index, url) in self.endpoints.iter().enumerate() {
            let client = match self.connector.open(url) {
                Ok(client) => client,
                Err(e) => {
                    tracing::warn!(endpoint = %url, error = %e, "Skipping endpoint");
                    metrics::record_endpoint_attempt(url, false);
                    continue;
                }
            };

            match client.block_number().await {
                Ok(height) => {
                    tracing::info!(endpoint = %url, block = height, "Connected to RPC");
                    metrics::record_endpoint_attempt(url, true);
                    let connection = Connection {
                        endpoint_index: index,
                        client,
                    };
                    state.status = ConnectionStatus::Connected;
                    state.selected_endpoint_index = Some(index);
                    state.connection = Some(connection.clone());
                    return Ok(connection);
                }
                Err(e) => {
                    tracing::warn!(endpoint = %url, error = %e, "Failed to connect, trying next endpoint");
                    metrics::record_endpoint_attempt(url, false);
                }
            }
        }

        state.status = ConnectionStatus::Failed;
        tracing::error!(
            network = %self.network,
            attempted = self.endpoints.len(),
            "No endpoint reachable"
        );
        Err(SessionError::NoEndpointReachable {
            network: self.network.clone(),
        })
    }
}
