//! FFmpeg execution adapter
//!
//! Runs the system `ffmpeg` binary to stream-copy a time range. The command
//! is built as an argument vector and launched directly, never through a shell,
//! so paths containing quotes or spaces reach ffmpeg untouched.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::model::ExtractionJob;
use crate::error::{SplitterError, SplitterResult};
use crate::ports::ExtractPort;

/// Number of trailing stderr lines kept as diagnostics on failure
const DIAGNOSTIC_LINES: usize = 20;

/// FFmpeg-based extraction adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    ffmpeg_path: PathBuf,
    overwrite: bool,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg_path: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            overwrite,
        }
    }

    /// Argument vector for one lossless extraction
    pub fn extraction_args(&self, job: &ExtractionJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(job.source_path.clone().into_os_string());
        args.push("-ss".into());
        args.push(format_seconds(job.start_seconds).into());
        args.push("-to".into());
        args.push(format_seconds(job.end_seconds).into());
        // All streams, no re-encode
        for arg in ["-map", "0", "-c", "copy"] {
            args.push(arg.into());
        }
        let overwrite_flag = if self.overwrite { "-y" } else { "-n" };
        args.push(overwrite_flag.into());
        args.push(job.output_path.clone().into_os_string());
        args
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg", true)
    }
}

#[async_trait]
impl ExtractPort for FFmpegAdapter {
    async fn extract(&self, job: &ExtractionJob) -> SplitterResult<()> {
        let args = self.extraction_args(job);
        debug!("Running {} {:?}", self.ffmpeg_path.display(), args);

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                SplitterError::execution(format!(
                    "Failed to launch {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(SplitterError::execution(format!(
            "ffmpeg exited with {}: {}",
            output
                .status
                .code()
                .map_or_else(|| "a signal".to_string(), |code| format!("code {}", code)),
            tail_lines(&stderr, DIAGNOSTIC_LINES)
        )))
    }
}

/// Seconds with microsecond precision, the finest ffmpeg time unit
fn format_seconds(seconds: f64) -> String {
    format!("{:.6}", seconds)
}

fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
