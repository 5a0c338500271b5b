//! Account lifecycle: create, import, logout and the full wallet walkthrough.

use std::time::Duration;

use testnet_wallet::session::{ConnectionStatus, SessionError, Severity};

mod common;
use common::{eth, harness, settle, MockLedger, ANVIL_ADDRESS, ANVIL_KEY, RECIPIENT};

#[tokio::test(start_paused = true)]
async fn test_import_with_and_without_prefix() {
    let ledger = MockLedger::new("http://e0");

    let mut with_prefix = harness(&[ledger.clone()]);
    let a = with_prefix.manager.import_account(ANVIL_KEY).await.unwrap().address();

    let mut bare = harness(&[ledger.clone()]);
    let b = bare
        .manager
        .import_account(ANVIL_KEY.trim_start_matches("0x"))
        .await
        .unwrap()
        .address();

    assert_eq!(a, b);
    assert_eq!(a.to_string(), ANVIL_ADDRESS);
    assert_eq!(
        with_prefix.notifier.last().unwrap().message,
        "Wallet imported successfully!"
    );
}

#[tokio::test(start_paused = true)]
async fn test_bad_key_is_rejected_before_connecting() {
    let ledger = MockLedger::new("http://e0");
    let mut h = harness(&[ledger.clone()]);

    let err = h.manager.import_account("0xnot-a-key").await.unwrap_err();

    assert!(matches!(err, SessionError::InvalidKeyFormat(_)));
    assert!(h.connector.opened().is_empty());
    assert!(!h.manager.is_authenticated());
    assert_eq!(h.manager.import_key(), "0xnot-a-key");
    assert!(h.notifier.last().unwrap().message.starts_with("Failed to import wallet:"));
}

#[tokio::test(start_paused = true)]
async fn test_empty_key() {
    let ledger = MockLedger::new("http://e0");
    let mut h = harness(&[ledger]);

    let err = h.manager.import_account("   ").await.unwrap_err();

    assert!(matches!(err, SessionError::InvalidKeyFormat(_)));
    assert_eq!(h.notifier.last().unwrap().message, "Please enter a private key");
    assert!(h.connector.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_second_account_requires_logout() {
    let ledger = MockLedger::new("http://e0");
    let mut h = harness(&[ledger.clone()]);

    let first = h.manager.create_account().await.unwrap().address();
    let err = h.manager.create_account().await.unwrap_err();
    assert_eq!(err, SessionError::AlreadyAuthenticated);
    let err = h.manager.import_account(ANVIL_KEY).await.unwrap_err();
    assert_eq!(err, SessionError::AlreadyAuthenticated);

    assert_eq!(h.manager.address(), Some(first));
}

#[tokio::test(start_paused = true)]
async fn test_logout_declined_keeps_session() {
    let ledger = MockLedger::new("http://e0");
    let mut h = harness(&[ledger.clone()]);
    h.manager.create_account().await.unwrap();
    h.confirmer.set_answer(false);

    assert!(!h.manager.logout().await.unwrap());

    assert!(h.manager.is_authenticated());
    assert!(h.manager.monitor().is_polling());
    assert_eq!(
        h.confirmer.prompts(),
        vec!["Are you sure you want to logout? Make sure you have saved your private key!"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_everything() {
    let ledger = MockLedger::new("http://e0");
    ledger.set_balance(eth("2"));
    let mut h = harness(&[ledger.clone()]);
    h.manager.import_account(ANVIL_KEY).await.unwrap();
    settle().await;
    h.manager.set_recipient(RECIPIENT);
    h.manager.toggle_private_key();

    assert!(h.manager.logout().await.unwrap());

    assert!(!h.manager.is_authenticated());
    assert!(!h.manager.monitor().is_polling());
    assert_eq!(h.manager.displayed_balance().to_string(), "0.000000");
    assert!(h.manager.pending_transfer().is_empty());
    assert_eq!(h.manager.connection_state().status, ConnectionStatus::Uninitialized);
    assert_eq!(h.manager.private_key_display(), None);

    let last = h.notifier.last().unwrap();
    assert_eq!(last.message, "Logged out successfully");
    assert_eq!(last.severity, Severity::Info);

    let calls = ledger.balance_calls();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ledger.balance_calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_logout_without_session() {
    let mut h = harness(&[MockLedger::new("http://e0")]);

    assert_eq!(h.manager.logout().await.unwrap_err(), SessionError::NotAuthenticated);
    assert!(h.confirmer.prompts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_private_key_reveal_toggle() {
    let mut h = harness(&[MockLedger::new("http://e0")]);
    h.manager.import_account(ANVIL_KEY).await.unwrap();

    assert_ne!(h.manager.private_key_display().unwrap(), ANVIL_KEY);
    assert!(h.manager.toggle_private_key());
    assert_eq!(h.manager.private_key_display().unwrap(), ANVIL_KEY);
    assert!(!h.manager.toggle_private_key());
}

#[tokio::test(start_paused = true)]
async fn test_new_session_after_logout_suppresses_first_sample() {
    let ledger = MockLedger::new("http://e0");
    ledger.set_balance(eth("1"));
    let mut h = harness(&[ledger.clone()]);
    h.manager.import_account(ANVIL_KEY).await.unwrap();
    settle().await;
    h.manager.logout().await.unwrap();

    ledger.set_balance(eth("9"));
    h.manager.import_account(ANVIL_KEY).await.unwrap();
    settle().await;

    assert!(h.notifier.with_title("ETH Received!").is_empty());
    assert_eq!(h.manager.displayed_balance().to_string(), "9.000000");
}

#[tokio::test(start_paused = true)]
async fn test_wallet_walkthrough() {
    let dead = MockLedger::dead("http://e0");
    let ledger = MockLedger::new("http://e1");
    let mut h = harness(&[dead, ledger.clone()]);

    h.manager.create_account().await.unwrap();
    settle().await;

    let snapshot = h.manager.snapshot();
    assert_eq!(snapshot.status, "Connected to Sepolia");
    assert_eq!(snapshot.endpoint.as_deref(), Some("http://e1"));
    assert_eq!(snapshot.balance, "0.000000");
    assert!(snapshot.polling);
    assert!(h.notifier.with_title("ETH Received!").is_empty());
    assert_eq!(
        h.notifier.last().unwrap().message,
        "Wallet created successfully!"
    );

    ledger.set_balance(eth("0.01"));
    tokio::time::sleep(Duration::from_secs(10)).await;
    let received = h.notifier.with_title("ETH Received!");
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].message, "You received 0.010000 ETH");
    assert_eq!(h.manager.displayed_balance().to_string(), "0.010000");

    h.manager.set_recipient(RECIPIENT);
    h.manager.set_amount("0.005");
    h.manager.send_transfer().await.unwrap();
    assert_eq!(
        h.notifier.last().unwrap().message,
        "Sent 0.005 ETH to 0x7099...79c8"
    );
    ledger.set_balance(eth("0.004979"));

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert_eq!(h.manager.displayed_balance().to_string(), "0.004979");
    assert_eq!(h.notifier.with_title("ETH Received!").len(), 1);
    assert!(h.notifier.errors().is_empty());
}
