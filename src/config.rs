//! Configuration
//!
//! Loaded from a TOML file and overlaid with `JOURNAL__SECTION__KEY`
//! environment variables (a `.env` file is honoured).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Managed backend (REST data API + auth API)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public API key sent with every request
    pub api_key: String,
    /// User session token; requests fall back to the API key without it
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Which variant tile the dashboard shows next to the rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    #[default]
    Score,
    Emotion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub highlight: HighlightKind,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Freshness window for cached snapshots; 0 disables reuse
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_table() -> String {
    "trades".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_recent_limit() -> usize {
    10
}

fn default_port() -> u16 {
    8080
}

fn default_ttl_secs() -> u64 {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            highlight: HighlightKind::default(),
            recent_limit: default_recent_limit(),
            port: default_port(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from `path` plus environment overrides
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = shellexpand::tilde(path).into_owned();
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("JOURNAL")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
