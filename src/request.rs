use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{AppError, LyricError, RequestError};
use crate::file_utils::FileManager;
use crate::lyrics::{LyricSource, Section};

// @module: Song request documents

/// A song request as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    /// Identifier, also used to name the output artifacts
    pub request_id: String,

    /// LRC text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,

    /// Structured sections, the alternative to `lyrics`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Vec<Section>>,

    /// Musical genre handed to the inference service
    #[serde(default = "default_genre")]
    pub genre: String,

    /// Song duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    /// Reference audio for the inference service, passed through untouched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ref_audio_urls: Vec<String>,
}

fn default_genre() -> String {
    "rock".to_string()
}

impl RequestDocument {
    /// Minimal request carrying raw LRC text
    pub fn with_lyrics(request_id: &str, lyrics: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            lyrics: Some(lyrics.to_string()),
            structure: None,
            genre: default_genre(),
            duration: None,
            ref_audio_urls: Vec::new(),
        }
    }

    /// Minimal request carrying structured sections
    pub fn with_structure(request_id: &str, sections: Vec<Section>) -> Self {
        Self {
            request_id: request_id.to_string(),
            lyrics: None,
            structure: Some(sections),
            genre: default_genre(),
            duration: None,
            ref_audio_urls: Vec::new(),
        }
    }

    /// Parse a JSON request document
    pub fn from_json_str(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|e| RequestError::Parse(e.to_string()))
    }

    /// Read and parse a JSON request document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path).map_err(|e| AppError::File(format!("{:#}", e)))?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Select the authoritative lyric source. Blank lyrics and an empty
    /// structure count as absent.
    pub fn lyric_source(&self) -> Result<LyricSource, LyricError> {
        let lyrics = self.lyrics.as_deref().filter(|l| !l.trim().is_empty());
        let structure = self.structure.as_ref().filter(|s| !s.is_empty());

        match (lyrics, structure) {
            (Some(_), Some(_)) => Err(LyricError::AmbiguousLyricSource),
            (Some(text), None) => Ok(LyricSource::RawLrc(text.to_string())),
            (None, Some(sections)) => Ok(LyricSource::Structured(sections.clone())),
            (None, None) => Err(LyricError::MissingLyricSource),
        }
    }

    /// Duration, falling back to the given default
    pub fn duration_or(&self, default: u32) -> u32 {
        self.duration.unwrap_or(default)
    }
}
