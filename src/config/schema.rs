//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the uploader.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::torrent::ServerDescriptor;

/// Root configuration for the seedbox uploader.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SeedboxConfig {
    /// Upload behaviour (timeouts, metadata capture, start paused).
    pub upload: UploadConfig,

    /// Which lifecycle events are reported to the user.
    pub notifications: NotificationConfig,

    /// Deluge Web UI specifics.
    pub deluge: DelugeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Known seedboxes, in the order they are offered to the user.
    pub servers: Vec<ServerDescriptor>,
}

impl SeedboxConfig {
    /// Look a server up by its configured name, or by its position in the list.
    pub fn find_server(&self, key: &str) -> Option<&ServerDescriptor> {
        self.servers
            .iter()
            .find(|s| s.name.as_deref() == Some(key))
            .or_else(|| key.parse::<usize>().ok().and_then(|i| self.servers.get(i)))
    }
}

/// Upload behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Per network step timeout in seconds.
    pub timeout_secs: u64,

    /// Add torrents without starting them.
    pub start_paused: bool,

    /// Ask for a label before uploading to ruTorrent.
    pub capture_labels: bool,

    /// Ask for a destination directory before uploading to ruTorrent.
    pub capture_directories: bool,

    /// Treat every link as a torrent, not only `.torrent` and `magnet:` ones.
    pub capture_all_links: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            start_paused: false,
            capture_labels: false,
            capture_directories: false,
            capture_all_links: false,
        }
    }
}

/// Per-category notification switches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub download_start: bool,
    pub download_failure: bool,
    pub upload_start: bool,
    pub upload_success: bool,
    pub upload_failure: bool,
    /// Also gates seedbox errors while fetching labels/directories.
    pub auth_failure: bool,
    pub timeout: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            download_start: false,
            download_failure: true,
            upload_start: false,
            upload_success: true,
            upload_failure: true,
            auth_failure: true,
            timeout: true,
        }
    }
}

/// Deluge Web UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DelugeConfig {
    /// Password sent with `auth.login`. Deluge's Web UI ships with "deluge".
    pub web_password: String,

    /// Parent of the per-user download location.
    pub download_root: String,
}

impl Default for DelugeConfig {
    fn default() -> Self {
        Self {
            web_password: "deluge".to_string(),
            download_root: "/torrents".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human readable or JSON log lines.
    pub log_format: LogFormat,

    /// Expose a Prometheus endpoint while listening.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
