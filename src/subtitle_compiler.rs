/*!
 * Turns a normalized lyric timeline into interval-timed subtitle cues.
 *
 * Each non-empty line becomes one cue that runs until the next cue starts.
 * The last cue gets a fixed trailing duration, and no cue is ever shorter
 * than the configured minimum length.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::TimingConfig;
use crate::errors::LyricError;
use crate::lyrics::{join_line_breaks, LyricLine};
use crate::subtitle_processor::SubtitleCue;

/// Cue compilation options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Sort out-of-order timelines instead of rejecting them
    #[serde(default)]
    pub reorder_by_timestamp: bool,

    /// End a cue at a following silence marker instead of the next sung line
    #[serde(default)]
    pub end_at_silence_markers: bool,
}

/// Compiles [`LyricLine`] sequences into [`SubtitleCue`]s
#[derive(Debug, Clone, Default)]
pub struct SubtitleCompiler {
    timing: TimingConfig,
    config: CompilerConfig,
}

impl SubtitleCompiler {
    pub fn new(timing: TimingConfig, config: CompilerConfig) -> Self {
        Self { timing, config }
    }

    /// Compile a timeline into cues with contiguous 1-based indices.
    ///
    /// The timeline must be in non-decreasing timestamp order unless
    /// `reorder_by_timestamp` is enabled.
    pub fn compile(&self, lines: &[LyricLine]) -> Result<Vec<SubtitleCue>, LyricError> {
        let ordered = self.ordered_timeline(lines)?;

        let mut cues = Vec::new();
        for (pos, line) in ordered.iter().enumerate() {
            if line.is_silence() {
                continue;
            }

            let start = line.timestamp;
            let next = ordered[pos + 1..]
                .iter()
                .find(|next| self.config.end_at_silence_markers || !next.is_silence());

            let natural_end = match next {
                Some(next) => next.timestamp,
                None => start.offset_by_millis(self.timing.trailing_duration_ms),
            };
            let end = natural_end.max(start.offset_by_millis(self.timing.min_cue_ms));

            if end != natural_end {
                debug!(
                    "Extending cue at {} to minimum length ({}ms)",
                    start, self.timing.min_cue_ms
                );
            }

            cues.push(SubtitleCue::new(cues.len() + 1, start, end, join_line_breaks(&line.text)));
        }

        debug!("Compiled {} lines into {} cues", lines.len(), cues.len());
        Ok(cues)
    }

    fn ordered_timeline<'a>(&self, lines: &'a [LyricLine]) -> Result<Vec<&'a LyricLine>, LyricError> {
        let mut ordered: Vec<&LyricLine> = lines.iter().collect();

        let violation = lines
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp);

        if let Some(idx) = violation {
            if !self.config.reorder_by_timestamp {
                return Err(LyricError::NonMonotonicTimeline {
                    position: idx + 2,
                    previous: lines[idx].timestamp.to_string(),
                    current: lines[idx + 1].timestamp.to_string(),
                });
            }
            warn!("Lyric timeline is out of order at line {}, sorting by timestamp", idx + 2);
            // Stable sort keeps the input order of lines sharing a timestamp
            ordered.sort_by_key(|line| line.timestamp);
        }

        Ok(ordered)
    }
}
