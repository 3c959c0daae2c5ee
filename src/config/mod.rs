//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SeedboxConfig (validated, immutable)
//!     → store.rs (ArcSwap snapshot shared by all attempts)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap in store.rs
//!     → attempts started afterwards observe new config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::SeedboxConfig;
pub use schema::{DelugeConfig, LogFormat, NotificationConfig, ObservabilityConfig, UploadConfig};
pub use store::ConfigStore;
pub use watcher::ConfigWatcher;
