//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     Ctrl-C → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → command loop exits → session stops polling → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
