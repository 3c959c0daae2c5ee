//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap every outbound call with the configured deadline
//! - Cancel the call cleanly when the deadline passes
//! - Produce exactly one outcome per call
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; dropping the inner future aborts the request
//! - Timeout errors are distinct from status-based failures
//! - The deadline is per call, never shared across the steps of an attempt

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::observability::metrics;

/// The guarded call did not settle in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no response within {} seconds", .0.as_secs_f64())]
pub struct TimeoutError(pub Duration);

/// Race `call` against `limit`.
///
/// Whichever finishes first decides the outcome. When the deadline wins, the
/// call future is dropped and any later completion of the underlying I/O is
/// never observed.
pub async fn guard<F>(step: &'static str, limit: Duration, call: F) -> Result<F::Output, TimeoutError>
where
    F: Future,
{
    let started = Instant::now();
    let result = tokio::time::timeout(limit, call).await;
    metrics::record_step_duration(step, started.elapsed());

    match result {
        Ok(output) => Ok(output),
        Err(_) => {
            tracing::warn!(step, limit_secs = limit.as_secs_f64(), "Step timed out");
            Err(TimeoutError(limit))
        }
    }
}
