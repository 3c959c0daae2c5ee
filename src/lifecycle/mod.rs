//! Lifecycle of the long-running `listen` mode.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     Ctrl-C → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → stop reading links → wait for in-flight attempts → exit
//! ```
//!
//! # Design Decisions
//! - In-flight attempts are never aborted; each ends on its own deadline
//! - A second Ctrl-C while draining exits immediately
//! - The shutdown flag latches; late waiters still see it

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
