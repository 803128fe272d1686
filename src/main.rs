// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use lyricsub::app_config::{self, Config};
use lyricsub::app_controller::Controller;
use lyricsub::request::RequestDocument;
use lyricsub::subtitle_processor::SubtitleTrack;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the subtitle file for a request (or every request in a directory)
    Build {
        /// Request JSON file or directory of request files
        #[arg(value_name = "REQUEST_PATH")]
        path: PathBuf,
    },

    /// Check a request and report every problem without writing anything
    #[command(alias = "validate")]
    Check {
        /// Request JSON file
        #[arg(value_name = "REQUEST_FILE")]
        path: PathBuf,
    },

    /// Print the lyrics and genre text sent to the song generator
    Prompt {
        /// Request JSON file
        #[arg(value_name = "REQUEST_FILE")]
        path: PathBuf,
    },

    /// Build the subtitles and burn them into a video with the media encoder
    Render {
        /// Request JSON file
        #[arg(value_name = "REQUEST_FILE")]
        path: PathBuf,

        /// Generated song audio
        #[arg(short, long)]
        audio: PathBuf,

        /// Background image (a black one is created if missing)
        #[arg(short, long, default_value = "images/background.jpg")]
        image: PathBuf,

        /// Output video path (defaults to <output-dir>/<request_id>.mp4)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the cues of an existing subtitle file
    Inspect {
        /// SRT file
        #[arg(value_name = "SRT_FILE")]
        path: PathBuf,
    },

    /// Generate shell completions for lyricsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lyricsub - lyric timelines to subtitle files
///
/// Turns song requests carrying LRC lyrics or structured sections into SRT
/// subtitle files for lyric videos.
#[derive(Parser, Debug)]
#[command(name = "lyricsub")]
#[command(version)]
#[command(about = "Lyric timeline synthesis and subtitle compilation")]
#[command(long_about = "lyricsub turns song requests into subtitle files for lyric videos.

EXAMPLES:
    lyricsub build requests/song.json          # Write output/<request_id>.srt
    lyricsub build requests/                   # Build every request in a directory
    lyricsub check requests/song.json          # Report every problem, write nothing
    lyricsub prompt requests/song.json         # Show the text sent to the generator
    lyricsub render requests/song.json -a song.wav
    lyricsub completions bash > lyricsub.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Directory for generated artifacts
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; log::set_max_level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lyricsub", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    match cli.command {
        Commands::Build { path } => run_build(&controller, path),
        Commands::Check { path } => run_check(&controller, path),
        Commands::Prompt { path } => run_prompt(&controller, path),
        Commands::Render {
            path,
            audio,
            image,
            output,
        } => {
            let request = RequestDocument::load(&path)?;
            let video = controller.render_video(&request, audio, image, output).await?;
            println!("{}", video.display());
            Ok(())
        }
        Commands::Inspect { path } => run_inspect(path),
        Commands::Completions { .. } => Ok(()),
    }
}

fn run_build(controller: &Controller, path: PathBuf) -> Result<()> {
    if path.is_file() {
        let artifact = controller.build_subtitle_from_file(&path)?;
        println!("{}", artifact.display());
        return Ok(());
    }

    if !path.is_dir() {
        return Err(anyhow!("Input path does not exist: {:?}", path));
    }

    let outcomes = controller.build_folder(&path)?;
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    for outcome in &outcomes {
        match (&outcome.artifact, &outcome.error) {
            (Some(artifact), _) => println!("{}", artifact.display()),
            (None, Some(e)) => error!("{:?}: {}", outcome.request_file, e),
            (None, None) => {}
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} requests failed", failed, outcomes.len()));
    }
    Ok(())
}

fn run_check(controller: &Controller, path: PathBuf) -> Result<()> {
    let request = RequestDocument::load(&path)?;
    let report = controller.check_request(&request);

    if let Some(validation) = &report.validation {
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
    }

    if !report.is_ok() {
        let problems = report.problems();
        for problem in &problems {
            error!("{}", problem);
        }
        return Err(anyhow!("{}: {} problem(s) found", report.request_id, problems.len()));
    }

    info!("Request: {}", report.request_id);
    info!("Genre: {}", request.genre);
    info!("Duration: {}s", request.duration_or(controller.config().request.default_duration));
    if report.section_count > 0 {
        info!("Structure: {} sections", report.section_count);
    }
    info!("Lines: {}, cues: {}", report.line_count, report.cue_count);
    info!("Request is valid");
    Ok(())
}

fn run_prompt(controller: &Controller, path: PathBuf) -> Result<()> {
    let request = RequestDocument::load(&path)?;
    let prompt = controller.inference_prompt(&request)?;

    println!("# genre");
    println!("{}", prompt.genre);
    println!("# duration");
    println!("{}", prompt.duration);
    println!("# lyrics");
    println!("{}", prompt.lyrics);
    Ok(())
}

fn run_inspect(path: PathBuf) -> Result<()> {
    let track = SubtitleTrack::read_srt_file(&path)?;
    if track.is_empty() {
        info!("{:?} contains no cues", path);
        return Ok(());
    }

    for cue in &track.cues {
        println!(
            "{:>4}  {} --> {}  ({}ms)  {}",
            cue.index,
            cue.format_start_time(),
            cue.format_end_time(),
            cue.duration_ms(),
            cue.text.replace('\n', " / ")
        );
    }
    Ok(())
}
