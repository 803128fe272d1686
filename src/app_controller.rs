use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::encoder::{EncoderJob, MediaEncoder};
use crate::errors::{AppError, LyricError, RequestError};
use crate::file_utils::FileManager;
use crate::lyrics::{LyricNormalizer, LyricSource};
use crate::prompt::{render_genre_prompt, render_prompt_lyrics};
use crate::request::RequestDocument;
use crate::subtitle_compiler::SubtitleCompiler;
use crate::subtitle_processor::SubtitleTrack;
use crate::validation::{
    request_errors, IssueLocation, LyricValidator, ValidationIssue, ValidationResult,
};

// @module: Request façade for subtitle generation

/// Dry-run report for a request: every problem, nothing written
#[derive(Debug, Clone, Default)]
pub struct RequestReport {
    pub request_id: String,
    /// Request-level problems (id, duration)
    pub request_errors: Vec<RequestError>,
    /// Missing or ambiguous lyric source
    pub source_error: Option<LyricError>,
    /// Lyric validation outcome, when a source was found
    pub validation: Option<ValidationResult>,
    /// Failure while normalizing or compiling a validated source
    pub compile_error: Option<LyricError>,
    /// Sections in a structured source
    pub section_count: usize,
    /// Timed lines after normalization
    pub line_count: usize,
    /// Cues the artifact would contain
    pub cue_count: usize,
}

impl RequestReport {
    pub fn is_ok(&self) -> bool {
        self.request_errors.is_empty()
            && self.source_error.is_none()
            && self.validation.as_ref().is_some_and(|v| v.ok)
            && self.compile_error.is_none()
    }

    /// Every blocking problem as a display line
    pub fn problems(&self) -> Vec<String> {
        let mut problems: Vec<String> = self.request_errors.iter().map(|e| e.to_string()).collect();
        if let Some(e) = &self.source_error {
            problems.push(e.to_string());
        }
        if let Some(validation) = &self.validation {
            problems.extend(validation.errors.iter().map(|e| e.to_string()));
        }
        if let Some(e) = &self.compile_error {
            problems.push(e.to_string());
        }
        problems
    }
}

/// Outcome of one request file in a folder build
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub request_file: PathBuf,
    pub artifact: Option<PathBuf>,
    pub error: Option<String>,
}

/// Text handed to the inference service for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferencePrompt {
    pub lyrics: String,
    pub genre: String,
    pub duration: u32,
}

/// Main application controller for subtitle generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validator(&self) -> LyricValidator {
        LyricValidator::with_config(self.config.validation.clone())
    }

    fn normalizer(&self) -> LyricNormalizer {
        LyricNormalizer::new(self.config.timing.clone(), self.config.validation.malformed_lines)
    }

    fn compiler(&self) -> SubtitleCompiler {
        SubtitleCompiler::new(self.config.timing.clone(), self.config.compiler.clone())
    }

    /// Run the request through selection, validation, normalization and
    /// compilation without touching the file system.
    ///
    /// Request rules, source selection and lyric validation all run before
    /// anything fails, and every problem found is returned in a single
    /// [`LyricError::ValidationFailed`].
    pub fn compile_request(&self, request: &RequestDocument) -> Result<SubtitleTrack, AppError> {
        let mut issues: Vec<ValidationIssue> = request_errors(request, &self.config.request)
            .iter()
            .map(|e| ValidationIssue::new(IssueLocation::Field(e.field().to_string()), e.to_string()))
            .collect();

        let source = match request.lyric_source() {
            Ok(source) => Some(source),
            Err(e) => {
                issues.push(ValidationIssue::new(IssueLocation::Field("lyrics".to_string()), e.to_string()));
                None
            }
        };

        if let Some(source) = &source {
            let validation = self.validator().validate(source);
            for warning in &validation.warnings {
                warn!("{}: {}", request.request_id, warning);
            }
            issues.extend(validation.errors);
        }

        let source = match source {
            Some(source) if issues.is_empty() => source,
            _ => return Err(LyricError::ValidationFailed(issues).into()),
        };

        let normalized = self.normalizer().normalize(&source)?;
        let cues = self.compiler().compile(&normalized.lines)?;

        debug!(
            "Request {}: {} lines, {} skipped, {} cues",
            request.request_id,
            normalized.lines.len(),
            normalized.skipped.len(),
            cues.len()
        );

        Ok(SubtitleTrack::new(cues))
    }

    /// Build the subtitle artifact for a request and return its path.
    ///
    /// Nothing is written unless every check passes. A request with no sung
    /// lines still produces an (empty) artifact.
    pub fn build_subtitle(&self, request: &RequestDocument) -> Result<PathBuf, AppError> {
        let track = self.compile_request(request)?;

        let path = FileManager::artifact_path(&self.config.output_dir, &request.request_id, "srt");
        track
            .write_to_srt(&path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        if track.is_empty() {
            info!("No vocal content in {}, wrote empty subtitle file", request.request_id);
        }
        info!("Created subtitle file: {}", path.display());

        Ok(path)
    }

    /// Load a request document from disk and build its subtitle artifact
    pub fn build_subtitle_from_file<P: AsRef<Path>>(&self, request_file: P) -> Result<PathBuf, AppError> {
        let request = RequestDocument::load(request_file)?;
        self.build_subtitle(&request)
    }

    /// Build every `*.json` request under a directory, continuing past failures
    pub fn build_folder<P: AsRef<Path>>(&self, input_dir: P) -> Result<Vec<BuildOutcome>> {
        let input_dir = input_dir.as_ref();
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        info!("Building subtitles for requests in: {:?}", input_dir);

        let mut outcomes = Vec::new();
        for request_file in FileManager::find_files(input_dir, "json")? {
            let outcome = match self.build_subtitle_from_file(&request_file) {
                Ok(artifact) => BuildOutcome {
                    request_file,
                    artifact: Some(artifact),
                    error: None,
                },
                Err(e) => {
                    error!("Failed to build {:?}: {}", request_file, e);
                    BuildOutcome {
                        request_file,
                        artifact: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let built = outcomes.iter().filter(|o| o.artifact.is_some()).count();
        info!("Finished: {} of {} requests built", built, outcomes.len());

        Ok(outcomes)
    }

    /// Dry run: collect every problem with the request, write nothing
    pub fn check_request(&self, request: &RequestDocument) -> RequestReport {
        let mut report = RequestReport {
            request_id: request.request_id.clone(),
            request_errors: request_errors(request, &self.config.request),
            ..RequestReport::default()
        };

        let source = match request.lyric_source() {
            Ok(source) => source,
            Err(e) => {
                report.source_error = Some(e);
                return report;
            }
        };

        if let LyricSource::Structured(sections) = &source {
            report.section_count = sections.len();
        }

        let validation = self.validator().validate(&source);
        let valid = validation.ok;
        report.validation = Some(validation);
        if !valid {
            return report;
        }

        match self.normalizer().normalize(&source) {
            Ok(normalized) => {
                report.line_count = normalized.lines.len();
                match self.compiler().compile(&normalized.lines) {
                    Ok(cues) => report.cue_count = cues.len(),
                    Err(e) => report.compile_error = Some(e),
                }
            }
            Err(e) => report.compile_error = Some(e),
        }

        report
    }

    /// Lyrics, genre and duration as the inference service expects them
    pub fn inference_prompt(&self, request: &RequestDocument) -> Result<InferencePrompt, AppError> {
        let source = request.lyric_source()?;
        Ok(InferencePrompt {
            lyrics: render_prompt_lyrics(&source),
            genre: render_genre_prompt(&request.genre, &self.config.encoder.genre_quality_tags),
            duration: request.duration_or(self.config.request.default_duration),
        })
    }

    /// Build the subtitle artifact, then have the media encoder burn it into
    /// a video next to it.
    pub async fn render_video(
        &self,
        request: &RequestDocument,
        audio: PathBuf,
        image: PathBuf,
        output: Option<PathBuf>,
    ) -> Result<PathBuf, AppError> {
        let subtitles = self.build_subtitle(request)?;
        let output = output.unwrap_or_else(|| {
            FileManager::artifact_path(&self.config.output_dir, &request.request_id, "mp4")
        });

        let job = EncoderJob {
            image,
            audio,
            subtitles,
            output: output.clone(),
        };
        MediaEncoder::new(self.config.encoder.clone()).render(&job).await?;

        Ok(output)
    }
}
