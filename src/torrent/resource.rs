//! Torrent resources handed to the uploader.

use url::Url;

/// How a torrent is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A URL serving the `.torrent` file itself.
    DirectFile,
    /// A `magnet:` locator.
    Magnet,
}

/// A torrent to upload. Created per user action and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentResource {
    locator: Url,
    kind: ResourceKind,
}

impl TorrentResource {
    /// Parse any link into a resource, whatever it looks like.
    pub fn parse(link: &str) -> Result<Self, url::ParseError> {
        let link = link.trim();
        let locator = Url::parse(link)?;
        let kind = if locator.scheme() == "magnet" {
            ResourceKind::Magnet
        } else {
            ResourceKind::DirectFile
        };
        Ok(Self { locator, kind })
    }

    /// Parse a link only if it looks like a torrent, or if every link is captured.
    pub fn from_link(link: &str, capture_all: bool) -> Option<Self> {
        if !capture_all && !looks_like_torrent(link) {
            return None;
        }
        Self::parse(link).ok()
    }

    pub fn locator(&self) -> &Url {
        &self.locator
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_magnet(&self) -> bool {
        self.kind == ResourceKind::Magnet
    }

    /// File name for multipart uploads: the last path segment when it names a
    /// `.torrent` file, otherwise a fixed fallback.
    pub fn file_name(&self) -> String {
        self.locator
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| s.ends_with(".torrent"))
            .map(str::to_string)
            .unwrap_or_else(|| "upload.torrent".to_string())
    }
}

impl std::fmt::Display for TorrentResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.locator.as_str())
    }
}

/// A link is treated as a torrent when it mentions `.torrent` or is a magnet.
pub fn looks_like_torrent(link: &str) -> bool {
    let link = link.trim();
    link.starts_with("magnet:") || link.contains(".torrent")
}
