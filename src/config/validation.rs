//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, metrics address parses)
//! - Check server hosts are usable base URLs and names are unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SeedboxConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Reachability of servers is never checked here

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::SeedboxConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upload.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("server #{index}: host '{host}' is not an http(s) URL")]
    InvalidHost { index: usize, host: String },

    #[error("server #{index}: duplicate name '{name}'")]
    DuplicateName { index: usize, name: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &SeedboxConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upload.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut names = HashSet::new();
    for (index, server) in config.servers.iter().enumerate() {
        let valid_host = url::Url::parse(&server.host)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !valid_host {
            errors.push(ValidationError::InvalidHost {
                index,
                host: server.host.clone(),
            });
        }

        if let Some(name) = &server.name {
            if !names.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateName {
                    index,
                    name: name.clone(),
                });
            }
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
