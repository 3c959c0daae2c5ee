//! Seedbox descriptors and backend types.

use serde::{Deserialize, Serialize};

/// The torrent client running on a seedbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    #[serde(rename = "rutorrent 2.x")]
    RutorrentV2,
    #[serde(rename = "rutorrent 3.x")]
    RutorrentV3,
    #[serde(rename = "utorrent")]
    UTorrent,
    #[serde(rename = "torrentflux-b4rt")]
    TorrentFluxB4RT,
    #[serde(rename = "deluge")]
    Deluge,
    #[serde(rename = "generic")]
    Generic,
}

impl ClientType {
    pub const ALL: [ClientType; 6] = [
        ClientType::RutorrentV2,
        ClientType::RutorrentV3,
        ClientType::UTorrent,
        ClientType::TorrentFluxB4RT,
        ClientType::Deluge,
        ClientType::Generic,
    ];

    /// Configuration spelling, also used as a metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::RutorrentV2 => "rutorrent 2.x",
            ClientType::RutorrentV3 => "rutorrent 3.x",
            ClientType::UTorrent => "utorrent",
            ClientType::TorrentFluxB4RT => "torrentflux-b4rt",
            ClientType::Deluge => "deluge",
            ClientType::Generic => "generic",
        }
    }

    /// Whether the backend exposes the `_getdir` label/directory plugin.
    pub fn supports_introspection(&self) -> bool {
        matches!(self, ClientType::RutorrentV2 | ClientType::RutorrentV3)
    }

    /// Whether the backend can be handed a magnet locator directly.
    pub fn accepts_magnet(&self) -> bool {
        matches!(self, ClientType::RutorrentV2 | ClientType::RutorrentV3)
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured seedbox. Read-only to the upload core.
#[derive(Clone, Deserialize, Serialize)]
pub struct ServerDescriptor {
    /// Optional short name used to pick the server from the CLI.
    #[serde(default)]
    pub name: Option<String>,

    /// Base URL of the client's web interface.
    pub host: String,

    /// HTTP basic auth user.
    pub user: String,

    /// HTTP basic auth password.
    pub pass: String,

    pub client: ClientType,
}

impl ServerDescriptor {
    /// Host without its scheme, followed by the client type.
    pub fn display_name(&self) -> String {
        let short = self
            .host
            .strip_prefix("http://")
            .or_else(|| self.host.strip_prefix("https://"))
            .unwrap_or(&self.host);
        format!("{} ({})", short, self.client)
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for ServerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDescriptor")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
