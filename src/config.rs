// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Client-side console configuration.
///
/// Loaded from `~/.config/fortress/console.toml` when present, then
/// overridden by `FORTRESS_*` environment variables, then by CLI flags.
/// The backend itself owns the scanner configuration; this struct only
/// describes how the console reaches and renders it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConsoleConfig {
    /// Root URL of the Fortress backend, e.g. `http://localhost:8000`
    #[validate(url)]
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Scan status poll cadence
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Refresh cadence for `--watch` table views
    #[validate(range(min = 5, max = 3600))]
    #[serde(default = "default_watch_refresh")]
    pub watch_refresh_secs: u64,

    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    2
}

fn default_page_size() -> usize {
    10
}

fn default_watch_refresh() -> u64 {
    60
}

fn default_cache_ttl() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
            poll_interval_secs: default_poll_interval(),
            page_size: default_page_size(),
            watch_refresh_secs: default_watch_refresh(),
            cache_enabled: true,
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl ConsoleConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fortress")
            .join("console.toml")
    }

    /// Load configuration: file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env();
        config
            .validate()
            .with_context(|| "Invalid console configuration")?;
        Ok(config)
    }

    /// Apply `FORTRESS_*` environment variable overrides
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FORTRESS_BACKEND_URL") {
            if !url.is_empty() {
                self.backend_url = url;
            }
        }
        if let Ok(timeout) = std::env::var("FORTRESS_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.request_timeout_secs = secs;
            }
        }
        if let Ok(interval) = std::env::var("FORTRESS_POLL_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.poll_interval_secs = secs;
            }
        }
        if let Ok(size) = std::env::var("FORTRESS_PAGE_SIZE") {
            if let Ok(n) = size.parse() {
                self.page_size = n;
            }
        }
    }

    fn root(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    /// Base of the XSS scanning API
    pub fn api_base(&self) -> String {
        format!("{}/api/xss", self.root())
    }

    /// Base of the auth API
    pub fn auth_base(&self) -> String {
        format!("{}/api/fortress_auth", self.root())
    }

    /// Base of the threats API (threat logs and SQL injection scans)
    pub fn threats_base(&self) -> String {
        format!("{}/api/threats", self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_base_urls_strip_trailing_slash() {
        let config = ConsoleConfig {
            backend_url: "http://scanner.local:8000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_base(), "http://scanner.local:8000/api/xss");
        assert_eq!(
            config.auth_base(),
            "http://scanner.local:8000/api/fortress_auth"
        );
        assert_eq!(
            config.threats_base(),
            "http://scanner.local:8000/api/threats"
        );
    }

    #[test]
    fn test_rejects_non_url_backend() {
        let config = ConsoleConfig {
            backend_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");
        std::fs::write(
            &path,
            "backend_url = \"http://10.0.0.5:8000\"\npage_size = 25\n",
        )
        .unwrap();

        let config = ConsoleConfig::load(Some(&path)).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.5:8000");
        assert_eq!(config.page_size, 25);
        // untouched fields keep their defaults
        assert_eq!(config.poll_interval_secs, 2);
    }
}
