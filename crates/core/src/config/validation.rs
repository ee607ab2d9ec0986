//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `version` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `app_name` or `version` contain whitespace, or `version` contains `?`, `&` or `#`
    /// - `scope` is not an absolute http(s) URL
    /// - `cdn_host_suffix` or `user_agent` is empty
    /// - `shell` is empty
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.is_empty() || self.app_name.chars().any(char::is_whitespace) {
            return Err(invalid("app_name", "must be non-empty and contain no whitespace"));
        }

        if self.version.is_empty() {
            return Err(ConfigError::Missing {
                field: "version".into(),
                hint: "Set SHELLCACHE_VERSION to the deployment version tag".into(),
            });
        }
        if self.version.chars().any(|c| c.is_whitespace() || matches!(c, '?' | '&' | '#')) {
            return Err(invalid("version", "must not contain whitespace, '?', '&' or '#'"));
        }

        let scope = Url::parse(&self.scope).map_err(|e| invalid("scope", &e.to_string()))?;
        if !matches!(scope.scheme(), "http" | "https") || scope.cannot_be_a_base() {
            return Err(invalid("scope", "must be an absolute http(s) URL"));
        }
        if !scope.path().ends_with('/') {
            tracing::warn!(
                scope = %self.scope,
                "scope does not end with '/'; relative shell URLs resolve against its parent directory"
            );
        }

        if self.cdn_host_suffix.is_empty() {
            return Err(invalid("cdn_host_suffix", "must not be empty"));
        }

        if self.shell.is_empty() {
            return Err(invalid("shell", "must list at least one resource"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        Ok(())
    }
}
