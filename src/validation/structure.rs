/*!
 * Rules for structured section lists.
 */

use super::{IssueCollector, IssueLocation, ValidationConfig};
use crate::lyrics::Section;
use crate::timestamp::Timestamp;

pub(crate) fn check_sections(
    sections: &[Section],
    config: &ValidationConfig,
    collector: &mut IssueCollector,
) {
    if sections.is_empty() {
        collector.error(IssueLocation::Field("structure".to_string()), "No sections given");
        return;
    }

    // (section number, start) of the last section with a usable start
    let mut previous: Option<(usize, Timestamp)> = None;

    for (idx, section) in sections.iter().enumerate() {
        let number = idx + 1;
        let location = IssueLocation::Section(number);

        if section.kind.trim().is_empty() {
            collector.error(location.clone(), "Missing section type");
        }
        if section.lines.is_empty() {
            collector.error(location.clone(), "Section has no lines");
        }

        for (line_idx, line) in section.lines.iter().enumerate() {
            let line_location = IssueLocation::SectionLine {
                section: number,
                line: line_idx + 1,
            };
            // A cue is a single block of text; a break would end it early
            if line.contains(['\r', '\n']) {
                collector.error(line_location.clone(), "Lyric line contains a line break");
            }
            if config.require_text && line.trim().is_empty() {
                collector.error(line_location, "Empty lyric line");
            }
        }

        let Some(token) = &section.start else {
            continue;
        };

        match Timestamp::parse(token.trim()) {
            Ok(start) => {
                if config.check_section_order {
                    if let Some((prev_number, prev_start)) = previous {
                        if start < prev_start {
                            collector.error(
                                location,
                                format!(
                                    "Starts at {}, before section {} at {}",
                                    start, prev_number, prev_start
                                ),
                            );
                        }
                    }
                }
                previous = Some((number, start));
            }
            Err(e) => collector.error(location, format!("Invalid start: {}", e)),
        }
    }
}
