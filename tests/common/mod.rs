//! Shared fakes for integration tests: an in-memory ledger, a connector
//! that hands it out per URL, and recording presentation collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use testnet_wallet::blockchain::{BlockchainError, BlockchainResult, LedgerClient, LedgerConnector};
use testnet_wallet::config::WalletConfig;
use testnet_wallet::session::{Confirmer, Notification, Notifier, SessionManager, Severity};

pub const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const RECIPIENT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

pub fn eth(amount: &str) -> U256 {
    parse_ether(amount).unwrap()
}

/// In-memory ledger with scriptable failures.
pub struct MockLedger {
    url: String,
    alive: AtomicBool,
    balance: Mutex<U256>,
    balance_delay: Mutex<Duration>,
    fail_balance: AtomicBool,
    broadcast_error: Mutex<Option<String>>,
    broadcasts: Mutex<Vec<Bytes>>,
    pub block_number_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub gas_price_calls: AtomicUsize,
    pub nonce_calls: AtomicUsize,
}

impl MockLedger {
    pub fn new(url: &str) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_string(),
            alive: AtomicBool::new(true),
            balance: Mutex::new(U256::ZERO),
            balance_delay: Mutex::new(Duration::ZERO),
            fail_balance: AtomicBool::new(false),
            broadcast_error: Mutex::new(None),
            broadcasts: Mutex::new(Vec::new()),
            block_number_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            gas_price_calls: AtomicUsize::new(0),
            nonce_calls: AtomicUsize::new(0),
        })
    }

    pub fn dead(url: &str) -> Arc<Self> {
        let ledger = Self::new(url);
        ledger.set_alive(false);
        ledger
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn set_balance(&self, wei: U256) {
        *self.balance.lock().unwrap() = wei;
    }

    pub fn set_balance_delay(&self, delay: Duration) {
        *self.balance_delay.lock().unwrap() = delay;
    }

    pub fn fail_balance(&self, fail: bool) {
        self.fail_balance.store(fail, Ordering::SeqCst);
    }

    pub fn fail_broadcast(&self, message: &str) {
        *self.broadcast_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn broadcasts(&self) -> Vec<Bytes> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn block_number_calls(&self) -> usize {
        self.block_number_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls_for_send(&self) -> usize {
        self.gas_price_calls.load(Ordering::SeqCst)
            + self.nonce_calls.load(Ordering::SeqCst)
            + self.broadcasts.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.block_number_calls.fetch_add(1, Ordering::SeqCst);
        if self.alive.load(Ordering::SeqCst) {
            Ok(4_200_000)
        } else {
            Err(BlockchainError::Rpc("connection refused".to_string()))
        }
    }

    async fn balance(&self, _address: Address) -> BlockchainResult<U256> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.balance_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("backend unavailable".to_string()));
        }
        Ok(*self.balance.lock().unwrap())
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(1_000_000_000)
    }

    async fn nonce(&self, _address: Address) -> BlockchainResult<u64> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        Ok(7)
    }

    async fn broadcast(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        self.broadcasts.lock().unwrap().push(raw);
        match self.broadcast_error.lock().unwrap().clone() {
            Some(message) => Err(BlockchainError::Rpc(message)),
            None => Ok(TxHash::repeat_byte(0xab)),
        }
    }
}

/// Hands out registered ledgers by URL and records the probe order.
#[derive(Default)]
pub struct MockConnector {
    ledgers: HashMap<String, Arc<MockLedger>>,
    opened: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(ledgers: &[Arc<MockLedger>]) -> Arc<Self> {
        Arc::new(Self {
            ledgers: ledgers
                .iter()
                .map(|l| (l.url().to_string(), l.clone()))
                .collect(),
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl LedgerConnector for MockConnector {
    fn open(&self, url: &str) -> BlockchainResult<Arc<dyn LedgerClient>> {
        self.opened.lock().unwrap().push(url.to_string());
        match self.ledgers.get(url) {
            Some(ledger) => Ok(ledger.clone() as Arc<dyn LedgerClient>),
            None => Err(BlockchainError::InvalidUrl {
                url: url.to_string(),
                reason: "not registered".to_string(),
            }),
        }
    }
}

/// Keeps every notification for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn with_title(&self, title: &str) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.title == title).collect()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.severity == Severity::Error)
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.all().into_iter().map(|n| n.message).collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Answers every prompt the same way and records the prompts.
pub struct ScriptedConfirmer {
    answer: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer: AtomicBool::new(answer),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

/// Default config pointed at the given endpoints.
pub fn test_config(endpoints: &[&str]) -> WalletConfig {
    let mut config = WalletConfig::default();
    config.network.endpoints = endpoints.iter().map(|s| s.to_string()).collect();
    config
}

/// A manager over the given ledgers, with endpoints in ledger order.
pub struct Harness {
    pub manager: SessionManager,
    pub connector: Arc<MockConnector>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirmer: Arc<ScriptedConfirmer>,
}

pub fn harness(ledgers: &[Arc<MockLedger>]) -> Harness {
    let urls: Vec<&str> = ledgers.iter().map(|l| l.url()).collect();
    let config = test_config(&urls);
    let connector = MockConnector::new(ledgers);
    let notifier = RecordingNotifier::new();
    let confirmer = ScriptedConfirmer::answering(true);
    let manager = SessionManager::new(&config, connector.clone(), notifier.clone(), confirmer.clone());
    Harness {
        manager,
        connector,
        notifier,
        confirmer,
    }
}

/// Let spawned tasks run without advancing past the next timer.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
