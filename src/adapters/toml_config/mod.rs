// TOML config adapter - Configuration management using TOML files

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SplitterError, SplitterResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "splitter.toml";

/// Splitter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// ffmpeg executable used for extraction
    pub ffmpeg_path: String,
    /// ffprobe executable used to read durations
    pub ffprobe_path: String,
    /// Extension of output files, without the dot
    pub output_extension: String,
    /// Overwrite existing outputs (`-y`) instead of failing (`-n`)
    pub overwrite: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            output_extension: "mp4".to_string(),
            overwrite: true,
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl SplitterConfig {
    /// Validate configuration
    pub fn validate(&self) -> SplitterResult<()> {
        if self.ffmpeg_path.trim().is_empty() {
            return Err(SplitterError::config("ffmpeg_path cannot be empty"));
        }
        if self.ffprobe_path.trim().is_empty() {
            return Err(SplitterError::config("ffprobe_path cannot be empty"));
        }

        let ext = self.output_extension.trim();
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(SplitterError::config(format!(
                "Invalid output_extension: '{}'. Use a bare extension such as mp4",
                self.output_extension
            )));
        }

        LogLevel::parse(&self.log_level)?;
        Ok(())
    }

    /// Logging settings derived from this configuration
    pub fn logging(&self) -> SplitterResult<LoggingConfig> {
        Ok(LoggingConfig {
            level: LogLevel::parse(&self.log_level)?,
            format: self.log_format,
        })
    }
}

/// Layout of the TOML file: every key lives under `[splitter]`
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    splitter: SplitterConfig,
}

/// TOML configuration adapter
#[derive(Debug, Default, Clone)]
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Create new TOML config adapter
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from file
    pub fn load_config(&self, file_path: &Path) -> SplitterResult<SplitterConfig> {
        let content = fs::read_to_string(file_path).map_err(|e| {
            SplitterError::config(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let config = Self::deserialize_config(&content)?;
        info!("Loaded configuration from {}", file_path.display());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_config(&self, config: &SplitterConfig, file_path: &Path) -> SplitterResult<()> {
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SplitterError::config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(file_path, Self::serialize_config(config)?).map_err(|e| {
            SplitterError::config(format!("Failed to write config file: {}", e))
        })
    }

    /// Config file to use: the explicit path, else `splitter.toml` if present
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    /// Serialize config to TOML string
    fn serialize_config(config: &SplitterConfig) -> SplitterResult<String> {
        let file = ConfigFile {
            splitter: config.clone(),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| SplitterError::config(format!("Failed to encode TOML config: {}", e)))
    }

    /// Deserialize config from TOML string
    fn deserialize_config(toml_content: &str) -> SplitterResult<SplitterConfig> {
        let parsed: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| SplitterError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(parsed.splitter)
    }
}
