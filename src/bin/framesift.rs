use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framesift::{
    FrameEvent, ProgressCallback, SiftOptions, VideoInfo, DEFAULT_SIMILARITY_THRESHOLD,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framesift sift input.mp4 --out frames --start 13 --end 28\n  framesift sift input.mp4 --out frames --start 0:00:13 --end 0:00:28 --threshold 0.97 --progress\n  framesift probe input.mp4 --json\n  framesift completions zsh > _framesift";

#[derive(Debug, Parser)]
#[command(
    name = "framesift",
    version,
    about = "Extract a window of video frames and drop near-duplicate neighbours",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long)]
    progress: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a time window of frames, dropping near-duplicates.
    #[command(
        about = "Extract deduplicated frames from a time window",
        after_help = "Examples:\n  framesift sift input.mp4 --out frames --start 13 --end 28\n  framesift sift input.mp4 --out frames --threshold 0.97 --progress\n\nThe output directory is cleared before frames are written."
    )]
    Sift {
        /// Input video path.
        input: PathBuf,
        /// Output directory for kept frames (cleared first).
        #[arg(long)]
        out: PathBuf,
        /// Window start: seconds or [HH:]MM:SS(.f). Defaults to the start
        /// of the video.
        #[arg(long)]
        start: Option<String>,
        /// Window end: seconds or [HH:]MM:SS(.f). Defaults to the end of
        /// the video; clamped to its duration.
        #[arg(long)]
        end: Option<String>,
        /// Similarity threshold in [0, 1]; frames scoring >= this value
        /// against the last kept frame are dropped.
        #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: f64,
        /// Custom staging directory for decoded intermediate frames.
        #[arg(long)]
        staging: Option<PathBuf>,
        /// Keep the staging directory after the run.
        #[arg(long)]
        keep_staging: bool,
        /// Print the run summary as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print video stream properties (alias: info).
    #[command(
        about = "Print video stream properties",
        visible_alias = "info",
        after_help = "Examples:\n  framesift probe input.mp4\n  framesift probe input.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output properties as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse a time value given either as seconds (`13.5`) or as a
/// `[HH:]MM:SS(.f)` timecode.
fn parse_timecode(value: &str) -> Result<f64, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        return Ok(seconds.max(0.0));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("invalid time format: {trimmed}").into());
    }

    let (hours, minutes, seconds_str) = if parts.len() == 3 {
        (parts[0].parse::<u64>()?, parts[1].parse::<u64>()?, parts[2])
    } else {
        (0_u64, parts[0].parse::<u64>()?, parts[1])
    };

    let seconds = seconds_str.parse::<f64>()?;
    let total_seconds = (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds;
    Ok(total_seconds.max(0.0))
}

/// Progress callback backing `--progress` and `--verbose`.
struct TerminalProgress {
    bar: Option<ProgressBar>,
    verbose: bool,
}

impl TerminalProgress {
    fn new(show_bar: bool, verbose: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            let style =
                ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
            bar.set_style(style.progress_chars("##-"));
            Some(bar)
        } else {
            None
        };
        Ok(Self { bar, verbose })
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_frame(&self, event: &FrameEvent) {
        if let Some(bar) = &self.bar {
            if bar.length() != Some(event.frames_emitted) {
                bar.set_length(event.frames_emitted);
            }
            bar.set_position(event.position + 1);
            if event.verdict.is_kept() {
                bar.set_message(format!("kept {}", event.absolute_index));
            }
        }

        if self.verbose {
            match event.verdict.score() {
                Some(score) if event.verdict.is_kept() => {
                    eprintln!("kept frame {} (similarity {score:.4})", event.absolute_index);
                }
                Some(score) => {
                    eprintln!(
                        "dropped frame {} (similarity {score:.4})",
                        event.absolute_index
                    );
                }
                None => eprintln!("kept frame {} (first frame)", event.absolute_index),
            }
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sift {
            input,
            out,
            start,
            end,
            threshold,
            staging,
            keep_staging,
            json,
        } => {
            if out.exists() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("clearing existing output directory {}", out.display()).yellow()
                );
            }

            let mut options = SiftOptions::new(&input, &out)
                .with_threshold(threshold)
                .with_keep_staging(keep_staging);
            if let Some(start) = start {
                options = options.with_start(parse_timecode(&start)?);
            }
            if let Some(end) = end {
                let start_seconds = options.start_seconds;
                options = options.with_window(start_seconds, parse_timecode(&end)?);
            }
            if let Some(staging) = staging {
                options = options.with_staging_dir(staging);
            }

            let progress = Arc::new(TerminalProgress::new(cli.global.progress, cli.global.verbose)?);
            options = options.with_progress(progress.clone());

            let summary = framesift::sift(&options)?;
            progress.finish();

            if json {
                let payload = json!({
                    "fps": summary.frames_per_second,
                    "source_frame_count": summary.source_frame_count,
                    "start_frame": summary.start_frame,
                    "end_frame": summary.end_frame,
                    "frames_emitted": summary.frames_emitted,
                    "frames_kept": summary.frames_kept,
                    "frames_dropped": summary.frames_dropped,
                    "frames_skipped": summary.frames_skipped,
                    "output_dir": summary.output_dir.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Video: {:.2} fps, {} frames",
                    summary.frames_per_second, summary.source_frame_count
                );
                println!(
                    "Window: frame {} to frame {}",
                    summary.start_frame, summary.end_frame
                );
                if summary.frames_skipped > 0 {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!("{} unreadable frame(s) skipped", summary.frames_skipped).yellow()
                    );
                }
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "kept {} of {} frame(s) ({} dropped as duplicates) in {}",
                        summary.frames_kept,
                        summary.frames_emitted,
                        summary.frames_dropped,
                        summary.output_dir.display()
                    )
                    .green()
                );
            }
        }
        Commands::Probe { input, json } => {
            let info = VideoInfo::probe(&input)?;
            if json {
                let payload = json!({
                    "width": info.width,
                    "height": info.height,
                    "fps": info.frames_per_second,
                    "frame_count": info.frame_count,
                    "duration_seconds": info.duration.as_secs_f64(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Video: {}x{} @ {:.2} fps",
                    info.width, info.height, info.frames_per_second
                );
                println!("Frames: {}", info.frame_count);
                println!("Duration: {:.3}s", info.duration.as_secs_f64());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framesift", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_timecode;

    #[test]
    fn parse_timecode_seconds() {
        assert_eq!(parse_timecode("75").unwrap(), 75.0);
        assert_eq!(parse_timecode("13.5").unwrap(), 13.5);
    }

    #[test]
    fn parse_timecode_colon_formats() {
        assert_eq!(parse_timecode("01:15").unwrap(), 75.0);
        assert_eq!(parse_timecode("00:01:15.5").unwrap(), 75.5);
    }

    #[test]
    fn parse_timecode_rejects_garbage() {
        assert!(parse_timecode("").is_err());
        assert!(parse_timecode("1:2:3:4").is_err());
        assert!(parse_timecode("abc").is_err());
    }
}
