// Copyright 2026 Recycle Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration management for the recycle server.
//!
//! Every setting comes from a `RECYCLE_*` environment variable with a
//! default. Grace periods accept plain seconds or a duration with an
//! `s`, `m`, `h`, `d` or `w` suffix.

use anyhow::{Context, Result};
use recycle_api::DEFAULT_MAX_BODY_SIZE;
use recycle_policy::{
    GracePeriods, DEFAULT_ACCOUNT_RECYCLED_SECONDS, DEFAULT_OBJECT_RECYCLED_SECONDS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings (bind address, TLS, etc.)
    pub server: ServerConfig,
    /// Grace periods of the recycle policies
    pub recycle: GracePeriods,
    /// Storage backend selection
    pub backend: BackendConfig,
    /// Metrics and monitoring configuration
    pub metrics: MetricsConfig,
    /// Expirer worker configuration
    pub expirer: ExpirerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080")
    pub bind: String,
    /// Maximum request body size in bytes.
    /// Can be set via RECYCLE_MAX_BODY_SIZE environment variable (e.g., "5GB", "100MB").
    pub max_body_size: usize,
    /// TLS configuration for HTTPS support.
    pub tls: TlsConfig,
}

/// TLS/HTTPS configuration.
///
/// TLS is disabled by default. To enable TLS, set the `RECYCLE_TLS_CERT` and
/// `RECYCLE_TLS_KEY` environment variables to point to PEM-encoded
/// certificate and private key files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    /// Automatically set to true when both cert_path and key_path are provided.
    pub enabled: bool,
    /// Path to PEM-encoded certificate file.
    pub cert_path: Option<PathBuf>,
    /// Path to PEM-encoded private key file.
    pub key_path: Option<PathBuf>,
}

impl TlsConfig {
    fn from_lookup(var: &impl Fn(&str) -> Option<String>) -> Self {
        let cert_path = var("RECYCLE_TLS_CERT").map(PathBuf::from);
        let key_path = var("RECYCLE_TLS_KEY").map(PathBuf::from);

        // Enable TLS only if both cert and key are provided
        let enabled = cert_path.is_some() && key_path.is_some();

        Self {
            enabled,
            cert_path,
            key_path,
        }
    }

    /// Validates TLS configuration.
    ///
    /// Returns an error if TLS is enabled but certificate or key paths are missing.
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled {
            if self.cert_path.is_none() {
                return Err("TLS enabled but RECYCLE_TLS_CERT is not set".to_string());
            }
            if self.key_path.is_none() {
                return Err("TLS enabled but RECYCLE_TLS_KEY is not set".to_string());
            }
        }
        Ok(())
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the storage proxy requests are forwarded to.
    /// When unset the server runs its own in-memory store.
    pub upstream: Option<String>,
    /// Timeout for upstream requests, in seconds.
    pub upstream_timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics on `/metrics`
    pub prometheus_enabled: bool,
}

/// Expirer worker configuration.
///
/// The expirer only runs with the in-memory backend and removes objects
/// whose scheduled expiry has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirerConfig {
    /// Enable the expirer worker.
    pub enabled: bool,
    /// Sweep interval in seconds (default: 60).
    pub interval_secs: u64,
}

/// Parses a size string like "10GB", "100MB", "1024KB", "5000" into bytes.
///
/// Supported suffixes (case-insensitive):
/// - GB, G: Gigabytes
/// - MB, M: Megabytes
/// - KB, K: Kilobytes
/// - B or no suffix: Bytes
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    // Find where the numeric part ends
    let num_end = s.chars().position(|c| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());

    let (num_str, suffix) = s.split_at(num_end);
    let suffix = suffix.trim();

    let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: usize = match suffix {
        "GB" | "G" => 1024 * 1024 * 1024,
        "MB" | "M" => 1024 * 1024,
        "KB" | "K" => 1024,
        "B" | "" => 1,
        _ => return Err(format!("Unknown size suffix: {}", suffix)),
    };

    Ok((num * multiplier as f64) as usize)
}

/// Parses a duration like "30d", "7d", "12h", "90m", "45s" or "3600" into seconds.
///
/// Supported suffixes (case-insensitive):
/// - w: weeks
/// - d: days
/// - h: hours
/// - m: minutes
/// - s or no suffix: seconds
pub fn parse_duration(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    if s.is_empty() {
        return Err("Empty duration string".to_string());
    }

    let num_end = s.chars().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(num_end);

    let num: u64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: u64 = match suffix.trim() {
        "w" => 7 * 24 * 3600,
        "d" => 24 * 3600,
        "h" => 3600,
        "m" => 60,
        "s" | "" => 1,
        other => return Err(format!("Unknown duration suffix: {}", other)),
    };

    num.checked_mul(multiplier).ok_or_else(|| format!("Duration too large: {}", s))
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    value.map(|s| s.to_lowercase() == "true" || s == "1").unwrap_or(default)
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from a variable lookup.
    ///
    /// Unset variables fall back to defaults; malformed grace periods or
    /// sizes are errors.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let account_recycled_seconds = match var("RECYCLE_ACCOUNT_RECYCLED_SECONDS") {
            Some(s) => parse_duration(&s)
                .map_err(|e| anyhow::anyhow!("Invalid RECYCLE_ACCOUNT_RECYCLED_SECONDS: {}", e))?,
            None => defaults.recycle.account_recycled_seconds,
        };
        let object_recycled_seconds = match var("RECYCLE_OBJECT_RECYCLED_SECONDS") {
            Some(s) => parse_duration(&s)
                .map_err(|e| anyhow::anyhow!("Invalid RECYCLE_OBJECT_RECYCLED_SECONDS: {}", e))?,
            None => defaults.recycle.object_recycled_seconds,
        };
        let recycle = GracePeriods::new(account_recycled_seconds, object_recycled_seconds);
        recycle.validate().context("Invalid grace period")?;

        let max_body_size = match var("RECYCLE_MAX_BODY_SIZE") {
            Some(s) => parse_size(&s)
                .map_err(|e| anyhow::anyhow!("Invalid RECYCLE_MAX_BODY_SIZE: {}", e))?,
            None => defaults.server.max_body_size,
        };

        Ok(Self {
            server: ServerConfig {
                bind: var("RECYCLE_BIND").unwrap_or(defaults.server.bind),
                max_body_size,
                tls: TlsConfig::from_lookup(&var),
            },
            recycle,
            backend: BackendConfig {
                upstream: var("RECYCLE_UPSTREAM")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty()),
                upstream_timeout_secs: var("RECYCLE_UPSTREAM_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.backend.upstream_timeout_secs),
            },
            metrics: MetricsConfig {
                prometheus_enabled: parse_flag(
                    var("RECYCLE_METRICS_ENABLED"),
                    defaults.metrics.prometheus_enabled,
                ),
            },
            expirer: ExpirerConfig {
                enabled: parse_flag(var("RECYCLE_EXPIRER_ENABLED"), defaults.expirer.enabled),
                interval_secs: var("RECYCLE_EXPIRER_INTERVAL_SECS")
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(defaults.expirer.interval_secs),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:8080".to_string(),
                max_body_size: DEFAULT_MAX_BODY_SIZE,
                tls: TlsConfig::default(),
            },
            recycle: GracePeriods::new(
                DEFAULT_ACCOUNT_RECYCLED_SECONDS,
                DEFAULT_OBJECT_RECYCLED_SECONDS,
            ),
            backend: BackendConfig {
                upstream: None,
                upstream_timeout_secs: 30,
            },
            metrics: MetricsConfig {
                prometheus_enabled: true,
            },
            expirer: ExpirerConfig {
                enabled: true,
                interval_secs: 60,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.max_body_size, 5 * 1024 * 1024 * 1024);
        assert_eq!(config.recycle.account_recycled_seconds, 2_592_000);
        assert_eq!(config.recycle.object_recycled_seconds, 604_800);
        assert!(config.backend.upstream.is_none());
        assert!(config.metrics.prometheus_enabled);
        assert!(config.expirer.enabled);
        assert_eq!(config.expirer.interval_secs, 60);
        assert!(!config.server.tls.enabled);
    }

    #[test]
    fn test_grace_periods_from_env() {
        let config = config_from(&[
            ("RECYCLE_ACCOUNT_RECYCLED_SECONDS", "30d"),
            ("RECYCLE_OBJECT_RECYCLED_SECONDS", "3600"),
        ])
        .unwrap();
        assert_eq!(config.recycle.account_recycled_seconds, 30 * 24 * 3600);
        assert_eq!(config.recycle.object_recycled_seconds, 3600);
    }

    #[test]
    fn test_zero_grace_period_rejected() {
        assert!(config_from(&[("RECYCLE_OBJECT_RECYCLED_SECONDS", "0")]).is_err());
    }

    #[test]
    fn test_malformed_grace_period_rejected() {
        assert!(config_from(&[("RECYCLE_ACCOUNT_RECYCLED_SECONDS", "soon")]).is_err());
    }

    #[test]
    fn test_upstream_trailing_slash_trimmed() {
        let config = config_from(&[("RECYCLE_UPSTREAM", "http://proxy:8080/")]).unwrap();
        assert_eq!(config.backend.upstream.as_deref(), Some("http://proxy:8080"));

        let config = config_from(&[("RECYCLE_UPSTREAM", "")]).unwrap();
        assert!(config.backend.upstream.is_none());
    }

    #[test]
    fn test_flags() {
        let config = config_from(&[
            ("RECYCLE_METRICS_ENABLED", "false"),
            ("RECYCLE_EXPIRER_ENABLED", "0"),
            ("RECYCLE_EXPIRER_INTERVAL_SECS", "5"),
        ])
        .unwrap();
        assert!(!config.metrics.prometheus_enabled);
        assert!(!config.expirer.enabled);
        assert_eq!(config.expirer.interval_secs, 5);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("45").unwrap(), 45);
        assert_eq!(parse_duration("45s").unwrap(), 45);
        assert_eq!(parse_duration("90m").unwrap(), 5400);
        assert_eq!(parse_duration("12h").unwrap(), 43_200);
        assert_eq!(parse_duration("7D").unwrap(), 604_800);
        assert_eq!(parse_duration("2w").unwrap(), 1_209_600);
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("1y").is_err());
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("99999999999999999999w").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("100mb").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("5G").unwrap(), 5 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1TB").is_err()); // TB not supported
    }

    #[test]
    fn test_tls_config_enabled_when_both_paths_set() {
        let config = config_from(&[
            ("RECYCLE_TLS_CERT", "/path/to/cert.pem"),
            ("RECYCLE_TLS_KEY", "/path/to/key.pem"),
        ])
        .unwrap();
        assert!(config.server.tls.enabled);
        assert!(config.server.tls.validate().is_ok());

        let config = config_from(&[("RECYCLE_TLS_CERT", "/path/to/cert.pem")]).unwrap();
        assert!(!config.server.tls.enabled);
    }

    #[test]
    fn test_tls_config_validation_missing_key() {
        let tls = TlsConfig {
            enabled: true,
            cert_path: Some(PathBuf::from("/path/to/cert.pem")),
            key_path: None,
        };
        assert!(tls.validate().is_err());
    }
}
