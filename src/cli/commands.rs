//! Command implementations

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::json_project::PROJECT_EXTENSION;
use crate::app::{AppContainer, EditorSession};
use crate::cli::args::{
    CutArgs, EdgeArgs, ListArgs, NewArgs, ProjectArgs, RemoveArgs, RunArgs, SplitArgs, ToggleArgs,
};
use crate::cli::Commands;
use crate::domain::model::{ProjectState, Segment, Tag};
use crate::domain::segments;
use crate::engine::{ConsoleReporter, JsonReporter, ProgressReporter, RunOutcome};
use crate::ports::LoadedProject;
use crate::utils::path::file_stem;
use crate::utils::time::{format_clock, parse_time};

/// Dispatch a parsed command
pub async fn execute(container: &dyn AppContainer, command: Commands) -> Result<()> {
    match command {
        Commands::New(args) => new_project(container, args),
        Commands::Cut(args) => cut(container, args).await,
        Commands::Remove(args) => remove(container, args),
        Commands::Toggle(args) => toggle(container, args),
        Commands::First(args) => first(container, args).await,
        Commands::Last(args) => last(container, args).await,
        Commands::SplitEvery(args) => split_every(container, args).await,
        Commands::List(args) => list(container, args).await,
        Commands::Run(args) => run(container, args).await,
    }
}

/// Execute the new command
pub fn new_project(container: &dyn AppContainer, args: NewArgs) -> Result<()> {
    let source = std::fs::canonicalize(&args.source)
        .with_context(|| format!("Source file does not exist: {}", args.source.display()))?;
    let state = ProjectState::new(&source, file_stem(&source)?);
    let project = args
        .project
        .unwrap_or_else(|| args.source.with_extension(PROJECT_EXTENSION));

    container
        .project_port()
        .save(&state, &project)
        .context("Failed to create project")?;
    println!("Created project {}", project.display());
    Ok(())
}

/// Execute the cut command
pub async fn cut(container: &dyn AppContainer, args: CutArgs) -> Result<()> {
    let at = parse_time(&args.at).context("Invalid cut position")?;
    let mut session = open_session(container, &args.project).await?;

    let position = session
        .add_cut(at)
        .with_context(|| format!("Cannot cut at {}", format_clock(at)))?;
    save_session(container, &session, &args.project.project)?;
    println!("Added cut {} at {}", position + 1, format_clock(at));
    Ok(())
}

/// Execute the remove command
pub fn remove(container: &dyn AppContainer, args: RemoveArgs) -> Result<()> {
    let loaded = load_project(container, &args.project)?;
    let mut timeline = loaded.timeline();

    let removed = usize::try_from(args.index - 1)
        .map_err(|e| anyhow!(e))
        .and_then(|index| timeline.remove(index).map_err(anyhow::Error::from))
        .context("Cannot remove cut")?;

    let state = ProjectState {
        cuts: timeline.points().to_vec(),
        ..loaded.state
    };
    container
        .project_port()
        .save(&state, &args.project)
        .context("Failed to save project")?;
    println!("Removed cut at {}", format_clock(removed.seconds()));
    Ok(())
}

/// Execute the toggle command
pub fn toggle(container: &dyn AppContainer, args: ToggleArgs) -> Result<()> {
    let at = args
        .at
        .as_deref()
        .map(parse_time)
        .transpose()
        .context("Invalid cut position")?;
    let loaded = load_project(container, &args.project)?;
    let mut timeline = loaded.timeline();

    let tag = timeline.toggle_tag(at).context("Cannot toggle cut")?;
    let state = ProjectState {
        cuts: timeline.points().to_vec(),
        ..loaded.state
    };
    container
        .project_port()
        .save(&state, &args.project)
        .context("Failed to save project")?;
    println!("Cut is now {}", tag);
    Ok(())
}

/// Execute the first command
pub async fn first(container: &dyn AppContainer, args: EdgeArgs) -> Result<()> {
    let seconds = parse_time(&args.seconds).context("Invalid distance")?;
    let mut session = open_session(container, &args.project).await?;

    let position = session
        .cut_first(seconds)
        .context("Cannot cut from the start")?;
    save_session(container, &session, &args.project.project)?;
    println!("Added cut {} at {}", position + 1, format_clock(seconds));
    Ok(())
}

/// Execute the last command
pub async fn last(container: &dyn AppContainer, args: EdgeArgs) -> Result<()> {
    let seconds = parse_time(&args.seconds).context("Invalid distance")?;
    let mut session = open_session(container, &args.project).await?;

    let position = session
        .cut_last(seconds)
        .context("Cannot cut from the end")?;
    let at = session.timeline().points()[position].seconds();
    save_session(container, &session, &args.project.project)?;
    println!("Added cut {} at {}", position + 1, format_clock(at));
    Ok(())
}

/// Execute the split-every command
pub async fn split_every(container: &dyn AppContainer, args: SplitArgs) -> Result<()> {
    let interval = parse_time(&args.interval).context("Invalid interval")?;
    let mut session = open_session(container, &args.project).await?;

    let count = session
        .split_by_interval(interval)
        .context("Cannot split by interval")?;
    save_session(container, &session, &args.project.project)?;
    println!("Replaced cuts with {} cuts every {}", count, format_clock(interval));
    Ok(())
}

#[derive(Serialize)]
struct CutListing {
    index: usize,
    seconds: f64,
    tag: Tag,
}

#[derive(Serialize)]
struct ProjectListing<'a> {
    source: String,
    duration: f64,
    cuts: Vec<CutListing>,
    segments: &'a [Segment],
}

/// Execute the list command
pub async fn list(container: &dyn AppContainer, args: ListArgs) -> Result<()> {
    let session = open_session(container, &args.project).await?;
    let source = session
        .source()
        .ok_or_else(|| anyhow!("Project has no source"))?;

    let timeline = session.timeline();
    let derived = if timeline.is_empty() {
        Vec::new()
    } else {
        segments::generate(timeline, source.duration).context("Cannot derive segments")?
    };

    if args.json {
        let listing = ProjectListing {
            source: source.path.to_string_lossy().to_string(),
            duration: source.duration,
            cuts: timeline
                .points()
                .iter()
                .enumerate()
                .map(|(index, cut)| CutListing {
                    index: index + 1,
                    seconds: cut.seconds(),
                    tag: cut.tag,
                })
                .collect(),
            segments: &derived,
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Source: {} ({})", source.path.display(), format_clock(source.duration));
    if timeline.is_empty() {
        println!("No cuts");
        return Ok(());
    }

    println!("Cuts:");
    for (index, cut) in timeline.points().iter().enumerate() {
        println!("  {:>3}  {}  {}", index + 1, format_clock(cut.seconds()), cut.tag);
    }
    println!("Segments:");
    for segment in &derived {
        println!(
            "  {:>3}  {} - {}  {:<7}  {}",
            segment.index + 1,
            format_clock(segment.start_seconds),
            format_clock(segment.end_seconds),
            segment.status.as_str(),
            segment.name
        );
    }
    Ok(())
}

/// Execute the run command
pub async fn run(container: &dyn AppContainer, args: RunArgs) -> Result<()> {
    let mut session = open_session(container, &args.project).await?;
    session
        .generate_segments()
        .context("Cannot derive segments")?;

    for (number, name) in &args.rename {
        session
            .rename_segment(number - 1, name)
            .with_context(|| format!("Cannot rename segment {}", number))?;
    }
    for (number, status) in &args.status {
        session
            .set_segment_status(number - 1, *status)
            .with_context(|| format!("Cannot set status of segment {}", number))?;
    }

    let extension = &container.config().output_extension;
    let jobs = session
        .build_jobs(&args.out, extension, args.only_kept)
        .context("Cannot plan extraction")?;

    let mut reporter: Box<dyn ProgressReporter> = if args.json {
        Box::new(JsonReporter::stdout())
    } else {
        Box::new(ConsoleReporter::stdout(args.verbose))
    };

    let mut handle = session.start_run(jobs).context("Cannot start extraction")?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_requested = false;

    loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(event) => reporter.report(&event)?,
                None => break,
            },
            signal = &mut ctrl_c, if !cancel_requested => {
                signal.context("Failed to listen for Ctrl-C")?;
                warn!("Cancellation requested, stopping after the current segment");
                handle.cancel();
                cancel_requested = true;
            }
        }
    }

    match handle.wait().await? {
        RunOutcome::Completed { completed } => {
            info!("Extracted {} segments", completed);
            Ok(())
        }
        RunOutcome::Failed { index, error, .. } => {
            Err(anyhow::Error::from(error).context(format!("Segment {} failed", index + 1)))
        }
        RunOutcome::Cancelled { completed } => bail!("Run cancelled after {} files", completed),
    }
}

fn load_project(container: &dyn AppContainer, path: &Path) -> Result<LoadedProject> {
    container
        .project_port()
        .load(path)
        .with_context(|| format!("Failed to load project {}", path.display()))
}

async fn resolve_duration(
    container: &dyn AppContainer,
    args: &ProjectArgs,
    source: &Path,
) -> Result<f64> {
    match &args.duration {
        Some(duration) => parse_time(duration).context("Invalid duration"),
        None => container
            .probe_port()
            .probe_duration(source)
            .await
            .context("Could not read the media duration; pass --duration"),
    }
}

async fn open_session(container: &dyn AppContainer, args: &ProjectArgs) -> Result<EditorSession> {
    let loaded = load_project(container, &args.project)?;
    let duration = resolve_duration(container, args, &loaded.state.source_path).await?;

    let mut session = container.session();
    session
        .restore(&loaded, duration)
        .context("Invalid media duration")?;
    Ok(session)
}

fn save_session(container: &dyn AppContainer, session: &EditorSession, path: &Path) -> Result<()> {
    let state = session.project_state()?;
    container
        .project_port()
        .save(&state, path)
        .with_context(|| format!("Failed to save project {}", path.display()))
}
