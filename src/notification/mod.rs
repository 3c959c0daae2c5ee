//! Lifecycle notifications for the user.
//!
//! # Data Flow
//! ```text
//! upload driver / metadata resolver
//!     → Notifier (gates each category on NotificationConfig)
//!     → Reporter (collaborator: desktop popup, stdout, log, channel...)
//! ```

pub mod reporter;

pub use reporter::{ChannelReporter, Notifier, Reporter, TracingReporter};

use serde::Serialize;

/// Visual theme of a notification, as shown in its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Theme {
    Downloading,
    Uploading,
    Uploaded,
    Failure,
    Timeout,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Downloading => "Downloading",
            Theme::Uploading => "Uploading",
            Theme::Uploaded => "Uploaded",
            Theme::Failure => "Failure",
            Theme::Timeout => "Timeout",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(theme, message)` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub theme: Theme,
    pub message: String,
}

impl Notification {
    pub fn new(theme: Theme, message: impl Into<String>) -> Self {
        Self {
            theme,
            message: message.into(),
        }
    }
}
