//! Terminal front end: line input, notification rendering, confirmation
//! prompts and command parsing.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::session::notify::{Confirmer, Notification, Notifier, Severity};

/// Lines typed on stdin, shared by the command loop and prompts.
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl ConsoleInput {
    /// Spawn a blocking reader thread over stdin.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(rx)),
        }
    }

    /// Next line, or `None` once input is closed.
    pub async fn next_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }
}

/// Prints notifications to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let icon = match notification.severity {
            Severity::Success => "✓",
            Severity::Error => "✗",
            Severity::Info => "ℹ",
        };
        println!("{} {}: {}", icon, notification.title, notification.message);
    }
}

/// Asks yes/no questions on the terminal.
pub struct ConsoleConfirmer {
    input: ConsoleInput,
}

impl ConsoleConfirmer {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmer for ConsoleConfirmer {
    async fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = io::stdout().flush();
        match self.input.next_line().await {
            Some(answer) => is_yes(&answer),
            None => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// A console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create,
    Import(String),
    Balance,
    Refresh,
    To(String),
    Amount(String),
    Send(Option<(String, String)>),
    Address,
    Reveal,
    Faucets,
    Status,
    Logout,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Command::Empty;
        };
        let args: Vec<&str> = parts.collect();

        match (head.to_lowercase().as_str(), args.as_slice()) {
            ("create", []) => Command::Create,
            ("import", [key]) => Command::Import(key.to_string()),
            ("import", []) => Command::Import(String::new()),
            ("balance", []) => Command::Balance,
            ("refresh", []) => Command::Refresh,
            ("to", [address]) => Command::To(address.to_string()),
            ("amount", [amount]) => Command::Amount(amount.to_string()),
            ("send", []) => Command::Send(None),
            ("send", [to, amount]) => Command::Send(Some((to.to_string(), amount.to_string()))),
            ("address", []) => Command::Address,
            ("reveal", []) => Command::Reveal,
            ("faucets", []) => Command::Faucets,
            ("status", []) => Command::Status,
            ("logout", []) => Command::Logout,
            ("help", _) | ("?", _) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  create                 create a new wallet
  import <private-key>   import a wallet from a hex private key
  balance                show the last known balance
  refresh                query the balance now
  to <address>           set the recipient
  amount <eth>           set the amount
  send [<address> <eth>] send the pending transfer
  address                show the wallet address
  reveal                 show or hide the private key
  faucets                list faucets for test funds
  status                 print the session as JSON
  logout                 end the session
  quit                   exit";
