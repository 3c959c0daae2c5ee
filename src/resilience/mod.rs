//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to seedbox or torrent source:
//!     → timeouts.rs (enforce per-step deadline)
//!     → On failure: attempt ends, failure is reported
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No automatic retries: uploads are not idempotent, re-invoking is the caller's call

pub mod timeouts;

pub use timeouts::{guard, TimeoutError};
