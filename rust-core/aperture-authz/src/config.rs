// SPDX-License-Identifier: PMPL-1.0-or-later
//! Access control configuration.
//!
//! The permission tables themselves are compiled in and never configured.
//! What can be tuned is the audit trail that sessions write to.
//!
//! Sources, later ones winning:
//! - built-in defaults
//! - a JSON file (`AccessConfig::load`)
//! - `APERTURE_AUDIT_ENABLED` / `APERTURE_AUDIT_CAPACITY` /
//!   `APERTURE_AUDIT_RECORD_GRANTS` environment variables

use std::env::VarError;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audit::AuditLog;
use crate::error::ConfigError;

pub const ENV_AUDIT_ENABLED: &str = "APERTURE_AUDIT_ENABLED";
pub const ENV_AUDIT_CAPACITY: &str = "APERTURE_AUDIT_CAPACITY";
pub const ENV_AUDIT_RECORD_GRANTS: &str = "APERTURE_AUDIT_RECORD_GRANTS";

/// Audit trail settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether sessions record decisions at all.
    pub enabled: bool,
    /// Maximum retained entries; the oldest are dropped first.
    pub max_entries: usize,
    /// Record granted decisions too. Denials are always recorded.
    pub record_grants: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
            record_grants: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub audit: AuditConfig,
}

impl AccessConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "loaded access config");
        Ok(config)
    }

    /// Apply overrides from the process environment. Only the
    /// `APERTURE_AUDIT_*` keys are read.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_lookup(|key| std::env::var(key))
    }

    fn with_lookup<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mut vars = Vec::new();
        for key in [ENV_AUDIT_ENABLED, ENV_AUDIT_CAPACITY, ENV_AUDIT_RECORD_GRANTS] {
            match lookup(key) {
                Ok(value) => vars.push((key, value)),
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(raw)) => {
                    return Err(invalid(key, &raw.to_string_lossy()));
                }
            }
        }
        self.with_overrides(vars)
    }

    /// Apply `(key, value)` overrides. Unrelated keys are ignored.
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_AUDIT_ENABLED => self.audit.enabled = parse_flag(key, value)?,
                ENV_AUDIT_RECORD_GRANTS => self.audit.record_grants = parse_flag(key, value)?,
                ENV_AUDIT_CAPACITY => {
                    self.audit.max_entries =
                        value.trim().parse().map_err(|_| invalid(key, value))?;
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// A fresh audit log sized from this configuration, or `None` when
    /// auditing is disabled.
    pub fn audit_log(&self) -> Option<AuditLog> {
        self.audit
            .enabled
            .then(|| AuditLog::new(self.audit.max_entries))
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
