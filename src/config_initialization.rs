//! Configuration initialization and hierarchy management

use std::path::Path;

use tracing::{debug, info};

use crate::adapters::toml_config::{SplitterConfig, TomlConfigAdapter};
use crate::error::{SplitterError, SplitterResult};
use crate::utils::logging::LogFormat;

/// Environment variables and the config keys they override
pub const ENV_FFMPEG: &str = "SPLITTER_FFMPEG";
pub const ENV_FFPROBE: &str = "SPLITTER_FFPROBE";
pub const ENV_OUTPUT_EXT: &str = "SPLITTER_OUTPUT_EXT";
pub const ENV_OVERWRITE: &str = "SPLITTER_OVERWRITE";
pub const ENV_LOG_LEVEL: &str = "SPLITTER_LOG_LEVEL";

/// Values given on the command line, each overriding everything below it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub ffmpeg_path: Option<String>,
    pub ffprobe_path: Option<String>,
    pub output_extension: Option<String>,
    pub overwrite: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> SplitterResult<SplitterConfig> {
    let env = |key: &str| std::env::var(key).ok();
    resolve_configuration(config_path, overrides, env)
}

/// Same as [`initialize_configuration`] with an injectable environment lookup
pub fn resolve_configuration<F>(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    env: F,
) -> SplitterResult<SplitterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1: defaults, replaced wholesale by the file when one is found
    let mut config = match TomlConfigAdapter::locate(config_path) {
        Some(path) => TomlConfigAdapter::new().load_config(&path)?,
        None => {
            debug!("No config file found, using defaults");
            SplitterConfig::default()
        }
    };

    // Step 2: environment
    let env_overrides = apply_environment(&mut config, env)?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 3: command line
    let cli_overrides = apply_cli_overrides(&mut config, overrides);
    if cli_overrides > 0 {
        debug!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate()?;
    Ok(config)
}

fn apply_environment<F>(config: &mut SplitterConfig, env: F) -> SplitterResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    if let Some(value) = env(ENV_FFMPEG) {
        config.ffmpeg_path = value;
        applied += 1;
    }
    if let Some(value) = env(ENV_FFPROBE) {
        config.ffprobe_path = value;
        applied += 1;
    }
    if let Some(value) = env(ENV_OUTPUT_EXT) {
        config.output_extension = value;
        applied += 1;
    }
    if let Some(value) = env(ENV_OVERWRITE) {
        config.overwrite = parse_bool(ENV_OVERWRITE, &value)?;
        applied += 1;
    }
    if let Some(value) = env(ENV_LOG_LEVEL) {
        config.log_level = value;
        applied += 1;
    }

    Ok(applied)
}

fn apply_cli_overrides(config: &mut SplitterConfig, overrides: &ConfigOverrides) -> usize {
    let mut applied = 0;

    if let Some(path) = &overrides.ffmpeg_path {
        config.ffmpeg_path = path.clone();
        applied += 1;
    }
    if let Some(path) = &overrides.ffprobe_path {
        config.ffprobe_path = path.clone();
        applied += 1;
    }
    if let Some(ext) = &overrides.output_extension {
        config.output_extension = ext.clone();
        applied += 1;
    }
    if let Some(overwrite) = overrides.overwrite {
        config.overwrite = overwrite;
        applied += 1;
    }
    if let Some(level) = &overrides.log_level {
        config.log_level = level.clone();
        applied += 1;
    }
    if let Some(format) = overrides.log_format {
        config.log_format = format;
        applied += 1;
    }

    applied
}

fn parse_bool(key: &str, value: &str) -> SplitterResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SplitterError::config(format!(
            "Invalid boolean for {}: '{}'",
            key, value
        ))),
    }
}
