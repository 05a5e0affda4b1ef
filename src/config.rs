use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::aggregate::AggregatorConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub aggregate: AggregatorConfig,
    pub pacing: PacingConfig,
    pub checkpoint: CheckpointConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
    /// Ask upstream to leave out chain businesses
    pub exclude_all_chains: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://places-api.foursquare.com/places/search".to_string(),
            api_version: "2025-06-17".to_string(),
            timeout_secs: 10,
            exclude_all_chains: true,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Write a checkpoint after this many input lines (0 disables)
    pub every: usize,
    pub prefix: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            every: 50,
            prefix: "foursquare_data_progress".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid api.base_url '{}'", self.api.base_url))?;
        if self.pacing.min_delay_ms > self.pacing.max_delay_ms {
            anyhow::bail!(
                "pacing.min_delay_ms ({}) exceeds pacing.max_delay_ms ({})",
                self.pacing.min_delay_ms,
                self.pacing.max_delay_ms
            );
        }
        if self.aggregate.budget == 0 {
            anyhow::bail!("aggregate.budget must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.aggregate.budget, 6);
        assert_eq!(config.aggregate.per_category, 2);
        assert_eq!(config.aggregate.upstream_limit, 10);
        assert_eq!(config.checkpoint.every, 50);
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pacing]\nmin_delay_ms = 0\nmax_delay_ms = 0\n").unwrap();
        writeln!(file, "[aggregate]\nbudget = 8").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.pacing.max_delay_ms, 0);
        assert_eq!(config.aggregate.budget, 8);
        assert_eq!(config.aggregate.per_category, 2);
        assert_eq!(config.api.api_version, "2025-06-17");
    }

    #[test]
    fn test_rejects_bad_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"not a url\"").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_rejects_inverted_delay() {
        let mut config = Config::default();
        config.pacing.min_delay_ms = 2000;
        assert!(config.validate().is_err());
    }
}
