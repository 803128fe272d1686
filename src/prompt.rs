/*!
 * Lyric text for the external inference service.
 *
 * The generator wants plain, lowercase lyrics grouped under bracketed
 * section tags:
 *
 * ```text
 * [verse]
 * walking through the shadows
 *
 * [chorus]
 * ...
 * ```
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lyrics::LyricSource;

static TIMESTAMP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\d{2,}:\d{2}\.\d{2}\]").unwrap()
});

// @const: A line that only names a section, e.g. "Verse 2" or "[Chorus]"
static SECTION_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[?\s*(verse|chorus|intro|outro|bridge|pre-chorus|hook)(\s*\d+)?\s*\]?$").unwrap()
});

/// Render a lyric source as section-tagged text for the inference service
pub fn render_prompt_lyrics(source: &LyricSource) -> String {
    match source {
        LyricSource::RawLrc(text) => render_raw(text),
        LyricSource::Structured(sections) => sections
            .iter()
            .map(|section| {
                let mut block = format!("[{}]", section.kind.trim().to_lowercase());
                for line in section.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                    block.push('\n');
                    block.push_str(&line.to_lowercase());
                }
                block
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

fn render_raw(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for line in text.lines() {
        let stripped = TIMESTAMP_TAG_REGEX.replace_all(line, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            continue;
        }

        match SECTION_HEADER_REGEX.captures(stripped) {
            Some(caps) => {
                if !out.is_empty() {
                    out.push(String::new());
                }
                out.push(format!("[{}]", caps[1].to_lowercase()));
            }
            None => out.push(stripped.to_lowercase()),
        }
    }

    out.join("\n")
}

/// Genre description with the configured quality tags appended
pub fn render_genre_prompt(genre: &str, quality_tags: &str) -> String {
    let genre = genre.trim();
    let tags = quality_tags.trim();
    if tags.is_empty() {
        genre.to_string()
    } else {
        format!("{}. {}", genre, tags)
    }
}
