//! CLI module for the splitter
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;
use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// Lossless Splitter
///
/// Mark cut points on a media file, tag the segments between them as keep or
/// discard, and extract every segment with a stream copy.
#[derive(Parser, Debug)]
#[command(name = "splitter")]
#[command(about = "Lossless Splitter - Cut media files into segments without re-encoding")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file (default: splitter.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty project for a media file
    New(args::NewArgs),
    /// Add a cut point
    Cut(args::CutArgs),
    /// Remove a cut point by its position in the list
    Remove(args::RemoveArgs),
    /// Flip a cut's tag between keep and discard
    Toggle(args::ToggleArgs),
    /// Add a cut a number of seconds after the start
    First(args::EdgeArgs),
    /// Add a cut a number of seconds before the end
    Last(args::EdgeArgs),
    /// Replace all cuts with cuts at a fixed interval
    SplitEvery(args::SplitArgs),
    /// Show cuts and the segments derived from them
    List(args::ListArgs),
    /// Extract the segments to an output directory
    Run(args::RunArgs),
}

impl Cli {
    /// Configuration values given on the command line
    pub fn config_overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            ..ConfigOverrides::default()
        };

        match &self.command {
            Commands::Run(args) => {
                overrides.output_extension = args.ext.clone();
                if args.no_overwrite {
                    overrides.overwrite = Some(false);
                }
                overrides.ffmpeg_path = args.ffmpeg.clone();
                overrides.ffprobe_path = args.project.ffprobe.clone();
            }
            Commands::Cut(args) => overrides.ffprobe_path = args.project.ffprobe.clone(),
            Commands::First(args) | Commands::Last(args) => {
                overrides.ffprobe_path = args.project.ffprobe.clone()
            }
            Commands::SplitEvery(args) => overrides.ffprobe_path = args.project.ffprobe.clone(),
            Commands::List(args) => overrides.ffprobe_path = args.project.ffprobe.clone(),
            Commands::New(_) | Commands::Remove(_) | Commands::Toggle(_) => {}
        }

        overrides
    }
}
