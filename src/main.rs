//! Sepolia testnet wallet console.
//!
//! # Architecture Overview
//!
//! ```text
//!     stdin ──▶ console ──▶ session::manager ──▶ session::endpoint ──▶ blockchain::client ──▶ RPC
//!                  ▲              │                                         ▲
//!                  │              ├──▶ session::monitor (polling task) ─────┤
//!                  │              └──▶ session::transfer ──▶ blockchain::transaction
//!                  │                                  │
//!                  └──────── notifications ◀──────────┘
//!
//!     Cross-cutting: config (TOML), observability (tracing, metrics), lifecycle (Ctrl-C)
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use testnet_wallet::blockchain::HttpConnector;
use testnet_wallet::config::loader::load_config;
use testnet_wallet::config::WalletConfig;
use testnet_wallet::console::{Command, ConsoleConfirmer, ConsoleInput, ConsoleNotifier, HELP};
use testnet_wallet::lifecycle::signals::watch_ctrl_c;
use testnet_wallet::lifecycle::Shutdown;
use testnet_wallet::observability::{logging, metrics};
use testnet_wallet::session::SessionManager;

#[derive(Parser)]
#[command(name = "testnet-wallet")]
#[command(about = "Interactive wallet for the Sepolia test network", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in Sepolia defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init_logging(&config.observability);
    tracing::info!(
        network = %config.network.name,
        chain_id = config.network.chain_id,
        endpoints = config.network.endpoints.len(),
        poll_interval_ms = config.polling.interval_ms,
        "testnet-wallet v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let connector = Arc::new(HttpConnector::new(
        Duration::from_secs(config.network.rpc_timeout_secs),
        Duration::from_secs(config.network.receipt_timeout_secs),
    ));
    let input = ConsoleInput::stdin();
    let mut manager = SessionManager::new(
        &config,
        connector,
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleConfirmer::new(input.clone())),
    );

    let shutdown = Shutdown::new();
    let mut shutdown_rx = shutdown.subscribe();
    tokio::spawn(watch_ctrl_c(shutdown.clone()));

    println!("{} wallet. Type 'help' for commands.", config.network.name);
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            _ = shutdown_rx.recv() => break,
            line = input.next_line() => line,
        };
        let Some(line) = line else { break };

        if !run_command(&mut manager, &config, Command::parse(&line)).await {
            break;
        }
    }

    manager.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Execute one command. Returns false when the console should exit.
async fn run_command(manager: &mut SessionManager, config: &WalletConfig, command: Command) -> bool {
    let currency = &config.network.currency_symbol;

    // Failures are already reported through the notifier.
    match command {
        Command::Create => {
            if let Ok(account) = manager.create_account().await {
                println!("Address: {}", account.address());
                println!("Save your private key with 'reveal' before funding this wallet.");
            }
        }
        Command::Import(key) => {
            if let Ok(account) = manager.import_account(&key).await {
                println!("Address: {}", account.address());
            }
        }
        Command::Balance => {
            if manager.is_authenticated() {
                println!("{} {}", manager.displayed_balance(), currency);
            } else {
                println!("No wallet is active");
            }
        }
        Command::Refresh => match manager.refresh_balance().await {
            Ok(balance) => println!("{} {}", balance, currency),
            Err(e) => tracing::debug!(error = %e, "Refresh failed"),
        },
        Command::To(address) => manager.set_recipient(address),
        Command::Amount(amount) => manager.set_amount(amount),
        Command::Send(form) => {
            if let Some((to, amount)) = form {
                manager.set_recipient(to);
                manager.set_amount(amount);
            }
            if let Ok(tx_hash) = manager.send_transfer().await {
                println!("Transaction: {}{}", config.network.explorer_tx_url, tx_hash);
            }
        }
        Command::Address => match manager.address() {
            Some(address) => println!("{}", address),
            None => println!("No wallet is active"),
        },
        Command::Reveal => {
            if manager.is_authenticated() {
                manager.toggle_private_key();
            }
            match manager.private_key_display() {
                Some(key) => println!("Private key: {}", key),
                None => println!("No wallet is active"),
            }
        }
        Command::Faucets => {
            println!("Get test {} from:", currency);
            for faucet in &config.network.faucets {
                println!("  {}", faucet);
            }
        }
        Command::Status => match serde_json::to_string_pretty(&manager.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(error = %e, "Failed to render status"),
        },
        Command::Logout => {
            let _ = manager.logout().await;
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Empty => {}
        Command::Unknown(input) => println!("Unknown command: {} (type 'help')", input),
    }
    true
}
