//! Upload attempts.
//!
//! # Data Flow
//! ```text
//! TorrentResource + ServerDescriptor + Chooser
//!     → attempt.rs  Uploader::upload (snapshot, attempt id, span)
//!     → metadata    label/directory (ruTorrent only, degrades on failure)
//!     → backend     fetch when needed, then submit
//!     → UploadReport + one outcome notification + metrics
//! ```
//!
//! # Design Decisions
//! - No retries; every network step has one deadline
//! - Attempts are independent; nothing is shared between them but the client

pub mod attempt;
pub mod types;

pub use attempt::Uploader;
pub use types::{AttemptError, DownloadError, FailureClass, Phase, UploadFailure, UploadReport};
