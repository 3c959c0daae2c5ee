//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, one span per upload attempt)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, listen mode only)
//! ```
//!
//! # Design Decisions
//! - Attempt ID flows through every log line of an attempt via its span
//! - Credentials are never logged
//! - Metrics are cheap and silently dropped when no exporter is installed

pub mod logging;
pub mod metrics;
