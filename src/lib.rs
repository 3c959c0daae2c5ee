//! Seedbox uploader library.
//!
//! Sends torrents (magnet links or `.torrent` URLs) to a remote BitTorrent
//! client's web interface: ruTorrent 2.x/3.x, uTorrent, TorrentFlux-b4rt,
//! Deluge, or a generic endpoint taking the raw file.

// Data model
pub mod config;
pub mod torrent;

// Upload pipeline
pub mod backend;
pub mod deluge;
pub mod metadata;
pub mod upload;

// Cross-cutting concerns
pub mod console;
pub mod lifecycle;
pub mod notification;
pub mod observability;
pub mod resilience;

pub use config::{ConfigStore, SeedboxConfig};
pub use lifecycle::Shutdown;
pub use torrent::{ClientType, ServerDescriptor, TorrentResource};
pub use upload::{UploadReport, Uploader};
