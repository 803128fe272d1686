/*!
 * Common test utilities for the lyricsub test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lyricsub::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Sample LRC lyrics with two sung lines
pub const SAMPLE_LRC: &str = "[00:00.00] Walking through the shadows\n[00:05.00] Searching for the truth";

/// Creates a request JSON file carrying raw LRC lyrics
pub fn create_lrc_request(dir: &Path, request_id: &str, lyrics: &str) -> Result<PathBuf> {
    let content = serde_json::json!({
        "request_id": request_id,
        "lyrics": lyrics,
        "genre": "rock",
        "duration": 95,
    });
    create_test_file(dir, &format!("{}.json", request_id), &content.to_string())
}

/// Default configuration writing into the given directory
pub fn config_with_output(dir: &Path) -> Config {
    Config {
        output_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

/// Route library logs to the test output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
