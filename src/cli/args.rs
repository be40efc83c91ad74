//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::Tag;

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Source media file
    #[arg(short, long)]
    pub source: PathBuf,

    /// Project file to create (default: the source path with a .mp4proj extension)
    #[arg(short, long)]
    pub project: Option<PathBuf>,
}

/// Project file and media duration, shared by editing commands
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project file
    #[arg(short, long)]
    pub project: PathBuf,

    /// Media duration (HH:MM:SS.ms, MM:SS.ms, or seconds); probed with ffprobe when absent
    #[arg(short, long)]
    pub duration: Option<String>,

    /// ffprobe executable
    #[arg(long)]
    pub ffprobe: Option<String>,
}

/// Arguments for the cut command
#[derive(Args, Debug)]
pub struct CutArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Playhead position of the cut (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub at: String,
}

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Project file
    #[arg(short, long)]
    pub project: PathBuf,

    /// 1-based position of the cut, as shown by `list`
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub index: u64,
}

/// Arguments for the toggle command
#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Project file
    #[arg(short, long)]
    pub project: PathBuf,

    /// Timestamp of the cut to toggle (default: most recently added cut)
    #[arg(short, long)]
    pub at: Option<String>,
}

/// Arguments for the first and last commands
#[derive(Args, Debug)]
pub struct EdgeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Distance from the start (first) or end (last)
    #[arg(short, long)]
    pub seconds: String,
}

/// Arguments for the split-every command
#[derive(Args, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Interval between cuts
    #[arg(short, long)]
    pub interval: String,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output directory, which must already exist
    #[arg(short, long)]
    pub out: PathBuf,

    /// Rename segment N (1-based), e.g. `--rename 2=intro`
    #[arg(long, value_name = "N=NAME", value_parser = parse_rename)]
    pub rename: Vec<(usize, String)>,

    /// Override the status of segment N (1-based), e.g. `--status 3=discard`
    #[arg(long, value_name = "N=keep|discard", value_parser = parse_status)]
    pub status: Vec<(usize, Tag)>,

    /// Extract only segments tagged keep
    #[arg(long)]
    pub only_kept: bool,

    /// Output extension (default from configuration)
    #[arg(long)]
    pub ext: Option<String>,

    /// Fail instead of overwriting existing output files
    #[arg(long)]
    pub no_overwrite: bool,

    /// ffmpeg executable
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// Emit progress as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Print every output path as it starts
    #[arg(short, long)]
    pub verbose: bool,
}

fn split_assignment(raw: &str) -> Result<(usize, &str), String> {
    let (number, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got '{}'", raw))?;
    let number: usize = number
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a segment number", number))?;
    if number == 0 {
        return Err("segment numbers start at 1".to_string());
    }
    if value.is_empty() {
        return Err(format!("missing value in '{}'", raw));
    }
    Ok((number, value))
}

fn parse_rename(raw: &str) -> Result<(usize, String), String> {
    split_assignment(raw).map(|(number, name)| (number, name.to_string()))
}

fn parse_status(raw: &str) -> Result<(usize, Tag), String> {
    let (number, status) = split_assignment(raw)?;
    let tag = Tag::parse(status).map_err(|e| e.to_string())?;
    Ok((number, tag))
}
