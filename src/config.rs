use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub benchmark: BenchmarkConfig,
    pub playout: PlayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            benchmark: BenchmarkConfig::default(),
            playout: PlayoutConfig::default(),
        }
    }
}

/// Perft depths run by `chic benchmark`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub max_depth: u8,
    /// Stop going deeper once a single depth took longer than this.
    pub time_limit_secs: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            time_limit_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayoutConfig {
    pub seed: u64,
    pub games: u32,
    pub max_plies: u32,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            games: 10,
            max_plies: 200,
        }
    }
}

impl Config {
    /// Reads the YAML file at `path`. A missing path or file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(p)?;
                Ok(serde_yaml::from_str(&content)?)
            }
            _ => Ok(Self::default()),
        }
    }
}
