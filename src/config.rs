use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const CONFIG_PATH_ENV: &str = "SURGE_WATCH_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub binance: BinanceConfig,
    pub surge: SurgeConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub ws_base_url: String,
    pub stream: String,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            ws_base_url: "wss://stream.binance.com:9443/ws".to_string(),
            stream: "!ticker@arr".to_string(),
        }
    }
}

/// Detector tuning. Defaults reproduce the dashboard's fixed constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurgeConfig {
    pub quote_suffixes: Vec<String>,
    pub throttle_ms: u64,
    pub history_len: usize,
    pub threshold_pct: f64,
    pub cooldown_secs: u64,
    pub reconnect_secs: u64,
    pub alarm_repeat_secs: u64,
}

impl Default for SurgeConfig {
    fn default() -> Self {
        Self {
            quote_suffixes: vec!["USDT".to_string(), "USDC".to_string()],
            throttle_ms: 500,
            history_len: 60,
            threshold_pct: 2.0,
            cooldown_secs: 24 * 60 * 60,
            reconnect_secs: 5,
            alarm_repeat_secs: 3,
        }
    }
}

impl SurgeConfig {
    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_secs.saturating_mul(1_000)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_secs)
    }

    pub fn alarm_interval(&self) -> Duration {
        Duration::from_secs(self.alarm_repeat_secs)
    }

    /// Upper-cased, trimmed, de-duplicated suffix list.
    pub fn normalized_suffixes(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for suffix in &self.quote_suffixes {
            let s = suffix.trim().to_ascii_uppercase();
            if !s.is_empty() && !out.iter().any(|v| v == &s) {
                out.push(s);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub max_rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            max_rows: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BinanceConfig {
    pub fn stream_url(&self) -> String {
        format!(
            "{}/{}",
            self.ws_base_url.trim_end_matches('/'),
            self.stream.trim_start_matches('/')
        )
    }
}

impl Config {
    /// Load `.env`, then the TOML file named by `SURGE_WATCH_CONFIG`
    /// (default `config/default.toml`). A missing file yields defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        config.validate().context("configuration is invalid")?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&config_str).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> std::result::Result<(), AppError> {
        let url = url::Url::parse(&self.binance.stream_url())
            .map_err(|e| AppError::Config(format!("binance stream url: {}", e)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(AppError::Config(format!(
                "binance stream url must use ws or wss, got '{}'",
                url.scheme()
            )));
        }

        let surge = &self.surge;
        if surge.normalized_suffixes().is_empty() {
            return Err(AppError::Config(
                "surge.quote_suffixes must contain at least one suffix".to_string(),
            ));
        }
        if surge.history_len < 2 {
            return Err(AppError::Config(format!(
                "surge.history_len must be >= 2, got {}",
                surge.history_len
            )));
        }
        if !surge.threshold_pct.is_finite() {
            return Err(AppError::Config(
                "surge.threshold_pct must be finite".to_string(),
            ));
        }
        for (name, value) in [
            ("surge.reconnect_secs", surge.reconnect_secs),
            ("surge.alarm_repeat_secs", surge.alarm_repeat_secs),
            ("ui.refresh_rate_ms", self.ui.refresh_rate_ms),
        ] {
            if value == 0 {
                return Err(AppError::Config(format!("{} must be > 0", name)));
            }
        }
        Ok(())
    }
}
