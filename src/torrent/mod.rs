//! Torrent and seedbox data model.
//!
//! # Data Flow
//! ```text
//! user link
//!     → resource.rs (TorrentResource: direct file or magnet)
//! config [[servers]]
//!     → server.rs (ServerDescriptor, ClientType)
//! both
//!     → endpoint.rs (host-relative URLs for every wire call)
//! ```

pub mod endpoint;
pub mod resource;
pub mod server;

pub use resource::{looks_like_torrent, ResourceKind, TorrentResource};
pub use server::{ClientType, ServerDescriptor};

/// Label, directory and start state applied to one upload.
///
/// Built once per attempt, after metadata resolution, then never changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMetadata {
    pub label: Option<String>,
    pub directory: Option<String>,
    pub start_paused: bool,
}

impl UploadMetadata {
    /// Metadata with no label or directory.
    pub fn empty(start_paused: bool) -> Self {
        Self {
            label: None,
            directory: None,
            start_paused,
        }
    }
}
