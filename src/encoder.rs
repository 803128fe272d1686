/*!
 * Invocation contract for the external media encoder.
 *
 * The encoder loops a still background image over the song audio and burns
 * the subtitle artifact into the picture. Encoding itself is delegated to
 * the configured program (ffmpeg by default); this module only builds its
 * argument list, runs it, and reports failures.
 */

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::EncoderConfig;
use crate::errors::AppError;
use crate::file_utils::FileManager;

/// Inputs and output of one encoder run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderJob {
    pub image: PathBuf,
    pub audio: PathBuf,
    pub subtitles: PathBuf,
    pub output: PathBuf,
}

impl EncoderJob {
    /// Build the encoder argument list for this job
    pub fn args(&self, config: &EncoderConfig) -> Vec<String> {
        let filter = format!(
            "subtitles={}:force_style='{}'",
            escape_filter_path(&self.subtitles),
            config.force_style
        );

        vec![
            "-loop".to_string(),
            "1".to_string(),
            "-i".to_string(),
            self.image.to_string_lossy().to_string(),
            "-i".to_string(),
            self.audio.to_string_lossy().to_string(),
            "-vf".to_string(),
            filter,
            "-c:v".to_string(),
            "libx264".to_string(),
            "-tune".to_string(),
            "stillimage".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            config.audio_bitrate.clone(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            // Drop any embedded subtitle stream so the lyrics are not shown twice
            "-sn".to_string(),
            "-shortest".to_string(),
            "-y".to_string(),
            self.output.to_string_lossy().to_string(),
        ]
    }
}

/// Arguments that render a plain black 1920x1080 background image
pub fn placeholder_background_args(path: &Path) -> Vec<String> {
    vec![
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        "color=c=black:s=1920x1080:d=1".to_string(),
        "-frames:v".to_string(),
        "1".to_string(),
        "-y".to_string(),
        path.to_string_lossy().to_string(),
    ]
}

// Filter arguments treat ':' '\'' and '\\' specially
fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | ':' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Runs the external encoder
#[derive(Debug, Clone)]
pub struct MediaEncoder {
    config: EncoderConfig,
}

impl MediaEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Render the video for a job. A missing background image is replaced by
    /// a black placeholder first.
    pub async fn render(&self, job: &EncoderJob) -> Result<(), AppError> {
        for input in [&job.audio, &job.subtitles] {
            if !FileManager::file_exists(input) {
                return Err(AppError::File(format!("Encoder input does not exist: {}", input.display())));
            }
        }

        if !FileManager::file_exists(&job.image) {
            info!("Background image not found at {}, creating a black one", job.image.display());
            if let Some(parent) = job.image.parent().filter(|p| !p.as_os_str().is_empty()) {
                FileManager::ensure_dir(parent).map_err(|e| AppError::File(format!("{:#}", e)))?;
            }
            self.run_encoder(placeholder_background_args(&job.image)).await?;
        }

        self.run_encoder(job.args(&self.config)).await?;
        info!("Video created: {}", job.output.display());
        Ok(())
    }

    async fn run_encoder(&self, args: Vec<String>) -> Result<(), AppError> {
        debug!("Running {} {}", self.config.program, args.join(" "));

        let encoder_future = Command::new(&self.config.program)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = encoder_future => {
                result.map_err(|e| AppError::Encoder(format!("Failed to execute {}: {}", self.config.program, e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(AppError::Encoder(format!(
                    "{} timed out after {} seconds",
                    self.config.program, self.config.timeout_secs
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_encoder_stderr(&stderr);
            error!("Encoder failed: {}", filtered);
            return Err(AppError::Encoder(filtered));
        }

        Ok(())
    }
}

/// Keep only meaningful error lines, stripping the version banner, build
/// configuration and stream metadata noise.
fn filter_encoder_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown encoder error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
