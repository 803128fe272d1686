/*!
 * # lyricsub - Lyric timeline synthesis and subtitle compilation
 *
 * A Rust library that turns song lyric requests into subtitle files for
 * lyric videos.
 *
 * ## Features
 *
 * - Parse raw LRC lyrics (`[MM:SS.CC] text`) or structured section lists
 * - Report every lyric problem in a single validation pass
 * - Configurable strictness (blank lines, empty text, malformed lines)
 * - Compile timed lines into SRT cues with end-time inference
 * - Render lyrics for the song generator and drive the video encoder
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: `MM:SS.CC` parsing and formatting
 * - `lyrics`: Lyric data model and source normalization
 * - `validation`: Lyric and request validation:
 *   - `validation::lrc`: Raw LRC rules
 *   - `validation::structure`: Section list rules
 *   - `validation::request`: Request id and duration rules
 * - `subtitle_compiler`: Timeline to cue compilation
 * - `subtitle_processor`: Cue rendering and SRT files
 * - `request`: Request documents
 * - `prompt`: Lyric text for the inference service
 * - `encoder`: External media encoder invocation
 * - `app_config`: Configuration management
 * - `app_controller`: Request façade
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod encoder;
pub mod errors;
pub mod file_utils;
pub mod lyrics;
pub mod prompt;
pub mod request;
pub mod subtitle_compiler;
pub mod subtitle_processor;
pub mod timestamp;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::{Config, TimingConfig};
pub use app_controller::Controller;
pub use errors::{AppError, LyricError, RequestError};
pub use lyrics::{LyricLine, LyricNormalizer, LyricSource, Section};
pub use request::RequestDocument;
pub use subtitle_compiler::{CompilerConfig, SubtitleCompiler};
pub use subtitle_processor::{SubtitleCue, SubtitleTrack};
pub use timestamp::Timestamp;
pub use validation::{LyricValidator, ValidationConfig, ValidationResult};
