//! Configuration types for zstd-pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::CompressionLevel;

/// Codec settings applied when a caller does not choose explicitly
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Level used by [`CompressionConfig::level`] (default: 3)
    #[serde(default = "default_level")]
    pub default_level: i32,

    /// Extension appended to the source file name for the default target (default: "zst")
    #[serde(default = "default_target_extension")]
    pub target_extension: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            target_extension: default_target_extension(),
        }
    }
}

impl CompressionConfig {
    /// The configured default level, validated
    pub fn level(&self) -> Result<CompressionLevel> {
        CompressionLevel::new(self.default_level)
    }
}

/// Sizing of the production execution contexts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Number of compute worker threads (default: number of logical CPUs)
    #[serde(default = "default_compute_workers")]
    pub compute_workers: usize,

    /// Name prefix of compute worker threads (default: "zstd-compute")
    #[serde(default = "default_compute_thread_name")]
    pub compute_thread_name: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            compute_workers: default_compute_workers(),
            compute_thread_name: default_compute_thread_name(),
        }
    }
}

/// Event broadcast settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventConfig {
    /// Capacity of the broadcast channel; slow subscribers lag past this (default: 1000)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Main configuration for [`CompressionPipeline`](crate::CompressionPipeline)
/// and [`TokioContextProvider`](crate::TokioContextProvider)
///
/// Every section and field has a default, so `{}` is a valid JSON config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Codec defaults
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Execution context sizing
    #[serde(default)]
    pub contexts: ContextConfig,

    /// Event channel settings
    #[serde(default)]
    pub events: EventConfig,
}

impl Config {
    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file and validate it
    ///
    /// A missing or unreadable file is an [`Error::Io`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.compression.level() {
            return Err(Error::Config {
                message: e.to_string(),
                key: Some("compression.default_level".to_string()),
            });
        }

        let extension = self.compression.target_extension.as_str();
        if extension.is_empty() || extension.contains(['/', '\\', '.']) {
            return Err(Error::Config {
                message: format!(
                    "target extension must be a non-empty bare extension, got '{}'",
                    extension
                ),
                key: Some("compression.target_extension".to_string()),
            });
        }

        if self.contexts.compute_workers == 0 {
            return Err(Error::Config {
                message: "at least one compute worker is required".to_string(),
                key: Some("contexts.compute_workers".to_string()),
            });
        }

        if self.events.channel_capacity == 0 {
            return Err(Error::Config {
                message: "event channel capacity must be greater than zero".to_string(),
                key: Some("events.channel_capacity".to_string()),
            });
        }

        Ok(())
    }
}

// Default value functions
fn default_level() -> i32 {
    3
}

fn default_target_extension() -> String {
    "zst".to_string()
}

fn default_compute_workers() -> usize {
    num_cpus::get().max(1)
}

fn default_compute_thread_name() -> String {
    "zstd-compute".to_string()
}

fn default_channel_capacity() -> usize {
    1000
}
