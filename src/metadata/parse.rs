//! Tolerant parsing of the `_getdir` plugin's answer.
//!
//! The plugin prints a JavaScript object literal rather than JSON, e.g.
//! `{ basedir: '/home/u/', dirlist: ['.', '..', 'movies'], labels: ['tv'] }`.
//! A pre-pass quotes the known keys and rewrites single-quoted strings as
//! JSON strings; the result goes through `serde_json`. Text that is already
//! JSON passes through unchanged.

use serde::Deserialize;

use crate::metadata::MetadataError;
use crate::torrent::endpoint;

/// Shown in place of the `.` entry of a directory listing.
pub const ROOT_SENTINEL: &str = "(root)";

const KNOWN_KEYS: [&str; 3] = ["labels", "basedir", "dirlist"];

/// Labels and directories offered by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, rename = "basedir")]
    pub base_dir: String,
    #[serde(default, rename = "dirlist")]
    pub dir_list: Vec<String>,
}

impl Listing {
    /// Directory entries as offered to the user: `..` dropped, `.` shown as
    /// the root sentinel.
    pub fn directory_choices(&self) -> Vec<String> {
        self.dir_list
            .iter()
            .filter(|d| d.as_str() != "..")
            .map(|d| {
                if d == "." {
                    ROOT_SENTINEL.to_string()
                } else {
                    d.clone()
                }
            })
            .collect()
    }

    /// Absolute path for a chosen entry, relative to `basedir`.
    ///
    /// Without a `basedir` the entry is returned as listed, and the root
    /// entry has no path at all.
    pub fn absolute_dir(&self, choice: &str) -> Option<String> {
        let root = choice == ROOT_SENTINEL || choice == ".";
        if self.base_dir.is_empty() {
            return (!root).then(|| choice.to_string());
        }
        if root {
            return Some(self.base_dir.clone());
        }
        Some(endpoint::join_dir(&self.base_dir, choice))
    }
}

/// Parse a response body into a [`Listing`].
pub fn parse_listing(body: &str) -> Result<Listing, MetadataError> {
    let normalized = normalize(body);
    serde_json::from_str(&normalized).map_err(|e| MetadataError::Malformed(e.to_string()))
}

/// Rewrite the object literal into JSON.
pub fn normalize(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 16);
    let mut rest = body;
    let mut quote: Option<char> = None;

    'scan: loop {
        if quote.is_none() {
            for key in KNOWN_KEYS {
                if let Some(after) = rest.strip_prefix(key) {
                    if after.trim_start().starts_with(':') && at_key_position(&out) {
                        out.push('"');
                        out.push_str(key);
                        out.push('"');
                        rest = after;
                        continue 'scan;
                    }
                }
            }
        }

        let mut chars = rest.chars();
        let ch = match chars.next() {
            Some(ch) => ch,
            None => break,
        };

        match (quote, ch) {
            (None, '\'') => {
                out.push('"');
                quote = Some('\'');
            }
            (None, '"') => {
                out.push('"');
                quote = Some('"');
            }
            (Some(_), '\\') => match chars.next() {
                // `\'` is not a JSON escape.
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            (Some('\''), '"') => out.push_str("\\\""),
            (Some(open), close) if open == close => {
                out.push('"');
                quote = None;
            }
            (_, ch) => out.push(ch),
        }
        rest = chars.as_str();
    }

    out
}

/// Keys only start right after `{` or `,`.
fn at_key_position(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{') | Some(','))
}
