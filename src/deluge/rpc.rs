//! Deluge Web UI JSON-RPC bodies.

use serde::Deserialize;
use serde_json::{json, Value};

pub const LOGIN_ID: u64 = 2;
pub const ADD_TORRENTS_ID: u64 = 155;

/// Options applied to every torrent added through the Web UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOptions {
    pub add_paused: bool,
    pub download_location: String,
}

pub fn login(password: &str) -> Value {
    json!({
        "method": "auth.login",
        "params": [password],
        "id": LOGIN_ID,
    })
}

pub fn add_torrents(staged_path: &str, options: &AddOptions) -> Value {
    json!({
        "method": "web.add_torrents",
        "params": [[{
            "path": staged_path,
            "options": {
                "file_priorities": [1, 1],
                "add_paused": options.add_paused,
                "compact_allocation": false,
                "download_location": options.download_location,
                "max_connections": -1,
                "max_download_speed": -1,
                "max_upload_slots": -1,
                "max_upload_speed": -1,
                "prioritize_first_last_pieces": false,
            },
        }]],
        "id": ADD_TORRENTS_ID,
    })
}

/// `auth.login` answer; only `result` matters.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub result: Option<bool>,
}

/// `/upload` answer listing the server-side staged paths.
#[derive(Debug, Deserialize)]
pub struct StageResponse {
    #[serde(default)]
    pub files: Vec<String>,
}
