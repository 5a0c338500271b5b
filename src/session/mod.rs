//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! create / import
//!     → endpoint.rs (first live endpoint wins)
//!     → manager.rs (one active account, session id)
//!     → monitor.rs (immediate balance read, then fixed-interval polling)
//! send
//!     → transfer.rs (validate, build, sign, broadcast, classify)
//!     → monitor.rs (one follow-up refresh)
//! logout
//!     → notify.rs (confirmation) → monitor.rs (stop, clear)
//! ```
//!
//! # Design Decisions
//! - The core never renders; it emits notifications through `Notifier`
//! - At most one poller exists, and every exit path cancels it
//! - Balance results from a stopped monitor are discarded

pub mod endpoint;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod notify;
pub mod transfer;

pub use endpoint::{Connection, ConnectionState, ConnectionStatus, EndpointSelector};
pub use error::{SessionError, ValidationError};
pub use manager::{SessionManager, SessionSnapshot};
pub use monitor::{BalanceMonitor, BalanceSample};
pub use notify::{Confirmer, Notification, Notifier, Severity};
pub use transfer::{PendingTransfer, TransactionSubmitter};
