//! Optional label and download-directory selection.
//!
//! # Data Flow
//! ```text
//! server (ruTorrent only) + capture flags
//!     → resolver.rs  GET {host}plugins/_getdir/info.php?mode=dirlist;labels
//!     → parse.rs     tolerant object-literal parse → Listing
//!     → choice.rs    Chooser::choose(prompt) → Choice
//!     → UploadMetadata { label, directory, start_paused }
//! ```
//!
//! A failed lookup never aborts the upload; it degrades to empty metadata.

pub mod choice;
pub mod parse;
pub mod resolver;

pub use choice::{Choice, ChoicePrompt, Chooser, PresetChooser};
pub use parse::{parse_listing, Listing, ROOT_SENTINEL};
pub use resolver::{MetadataResolver, Modes, Resolution};

use reqwest::StatusCode;
use thiserror::Error;

use crate::resilience::TimeoutError;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("server answered {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Timeout(TimeoutError),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unreadable listing: {0}")]
    Malformed(String),
}
