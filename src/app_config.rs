use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::subtitle_compiler::CompilerConfig;
use crate::validation::ValidationConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory subtitle artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Timing constants for normalization and cue compilation
    #[serde(default)]
    pub timing: TimingConfig,

    /// Lyric validation strictness
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Cue compilation options
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Request-level acceptance rules
    #[serde(default)]
    pub request: RequestPolicy,

    /// External media encoder settings
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Timing constants shared by the normalizer and the compiler
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// Gap between consecutive lines of a structured section, in ms
    #[serde(default = "default_line_spacing_ms")]
    pub line_spacing_ms: u64,

    /// How long the last cue stays on screen, in ms
    #[serde(default = "default_trailing_duration_ms")]
    pub trailing_duration_ms: u64,

    /// Shortest cue the compiler will emit, in ms
    #[serde(default = "default_min_cue_ms")]
    pub min_cue_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            line_spacing_ms: default_line_spacing_ms(),
            trailing_duration_ms: default_trailing_duration_ms(),
            min_cue_ms: default_min_cue_ms(),
        }
    }
}

/// Accepted song durations. Target pipelines disagree, so this is configurable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DurationPolicy {
    /// Any duration within an inclusive range
    Range { min: u32, max: u32 },
    /// Only the listed durations
    OneOf { values: Vec<u32> },
}

impl DurationPolicy {
    pub fn accepts(&self, duration: u32) -> bool {
        match self {
            Self::Range { min, max } => (*min..=*max).contains(&duration),
            Self::OneOf { values } => values.contains(&duration),
        }
    }

    // @returns: Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Range { min, max } => format!("{}-{}s", min, max),
            Self::OneOf { values } => {
                let values: Vec<String> = values.iter().map(|v| format!("{}s", v)).collect();
                format!("one of {}", values.join(", "))
            }
        }
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::Range { min: 30, max: 600 }
    }
}

/// Request-level acceptance rules
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RequestPolicy {
    /// Accepted durations
    #[serde(default)]
    pub duration: DurationPolicy,

    /// Duration assumed when the request does not set one
    #[serde(default = "default_duration_secs")]
    pub default_duration: u32,

    /// Optional regex the request id must match (e.g. `^req_[a-zA-Z0-9_-]+$`)
    #[serde(default)]
    pub request_id_pattern: Option<String>,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            duration: DurationPolicy::default(),
            default_duration: default_duration_secs(),
            request_id_pattern: None,
        }
    }
}

/// Settings for the external media encoder
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Encoder executable
    #[serde(default = "default_encoder_program")]
    pub program: String,

    /// Subtitle style passed to the burn-in filter
    #[serde(default = "default_force_style")]
    pub force_style: String,

    /// Audio bitrate for the output video
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Kill the encoder after this many seconds
    #[serde(default = "default_encoder_timeout_secs")]
    pub timeout_secs: u64,

    /// Quality tags appended to the genre for the inference service
    #[serde(default = "default_genre_quality_tags")]
    pub genre_quality_tags: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: default_encoder_program(),
            force_style: default_force_style(),
            audio_bitrate: default_audio_bitrate(),
            timeout_secs: default_encoder_timeout_secs(),
            genre_quality_tags: default_genre_quality_tags(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// @const: Upper bound for any timing value (one hour)
const MAX_TIMING_MS: u64 = 3_600_000;

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_line_spacing_ms() -> u64 {
    4000
}

fn default_trailing_duration_ms() -> u64 {
    5000
}

fn default_min_cue_ms() -> u64 {
    10
}

fn default_duration_secs() -> u32 {
    95
}

fn default_encoder_program() -> String {
    "ffmpeg".to_string()
}

fn default_force_style() -> String {
    "FontName=Arial,FontSize=22,PrimaryColour=&HFFFFFF&,OutlineColour=&H000000&,BorderStyle=1,Outline=1.2,Shadow=0,Alignment=2,MarginV=35".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_encoder_timeout_secs() -> u64 {
    600
}

fn default_genre_quality_tags() -> String {
    "[warm analog tone, mid-range focus, vintage tube compression, thick organic bass, professional mixing]".to_string()
}

impl Config {
    /// Load a configuration file, or write out the defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.timing.line_spacing_ms == 0 {
            return Err(anyhow!("timing.line_spacing_ms must be greater than zero"));
        }
        if self.timing.trailing_duration_ms == 0 {
            return Err(anyhow!("timing.trailing_duration_ms must be greater than zero"));
        }
        // Cue times have centisecond resolution
        if self.timing.min_cue_ms < 10 {
            return Err(anyhow!("timing.min_cue_ms must be at least 10"));
        }
        for (name, value) in [
            ("line_spacing_ms", self.timing.line_spacing_ms),
            ("trailing_duration_ms", self.timing.trailing_duration_ms),
            ("min_cue_ms", self.timing.min_cue_ms),
        ] {
            if value > MAX_TIMING_MS {
                return Err(anyhow!("timing.{} must not exceed {} ms", name, MAX_TIMING_MS));
            }
        }

        match &self.request.duration {
            DurationPolicy::Range { min, max } if min > max => {
                return Err(anyhow!("request.duration range is inverted: {} > {}", min, max));
            }
            DurationPolicy::OneOf { values } if values.is_empty() => {
                return Err(anyhow!("request.duration must list at least one value"));
            }
            _ => {}
        }

        if let Some(pattern) = &self.request.request_id_pattern {
            regex::Regex::new(pattern)
                .with_context(|| format!("Invalid request_id_pattern: {}", pattern))?;
        }

        if self.encoder.program.trim().is_empty() {
            return Err(anyhow!("encoder.program must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: default_output_dir(),
            timing: TimingConfig::default(),
            validation: ValidationConfig::default(),
            compiler: CompilerConfig::default(),
            request: RequestPolicy::default(),
            encoder: EncoderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
