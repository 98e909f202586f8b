//! SRT (SubRip) parsing and serialization.

use super::SubtitleCue;
use crate::error::{Result, SubzhError};
use regex::Regex;
use std::time::Duration;

/// Parse an SRT document into an ordered list of cues.
///
/// Tolerates CRLF line endings, a leading UTF-8 BOM, and extra blank
/// lines between blocks. An empty (or whitespace-only) document yields
/// an empty list.
pub fn parse(content: &str) -> Result<Vec<SubtitleCue>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    // Matches `HH:MM:SS,mmm --> HH:MM:SS,mmm`
    let time_range =
        Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})$")
            .expect("Invalid regex");
    let mut cues = Vec::new();
    let mut lines = content.lines().peekable();

    while lines.peek().is_some() {
        // Skip blank lines between blocks
        let index_line = match lines.next() {
            Some(line) if !line.trim().is_empty() => line.trim(),
            Some(_) => continue,
            None => break,
        };

        let index: usize = index_line.parse().map_err(|_| {
            SubzhError::Parse(format!("invalid cue index: {:?}", index_line))
        })?;

        let time_line = lines
            .next()
            .map(str::trim)
            .ok_or_else(|| SubzhError::Parse(format!("cue {}: missing time range", index)))?;

        let (start, end) = parse_time_range(&time_range, time_line)
            .ok_or_else(|| SubzhError::Parse(format!("cue {}: bad time range: {:?}", index, time_line)))?;

        if start > end {
            return Err(SubzhError::Parse(format!(
                "cue {}: start time is after end time",
                index
            )));
        }

        // Text runs until the next blank line
        let mut text_lines = Vec::new();
        while let Some(line) = lines.peek() {
            if line.trim().is_empty() {
                lines.next();
                break;
            }
            text_lines.push(lines.next().unwrap_or_default().to_string());
        }

        cues.push(SubtitleCue {
            index,
            start,
            end,
            text: text_lines.join("\n"),
        });
    }

    Ok(cues)
}

fn parse_time_range(re: &Regex, line: &str) -> Option<(Duration, Duration)> {
    let caps = re.captures(line)?;
    let field = |i: usize| caps[i].parse::<u64>().ok();

    let start = timestamp(field(1)?, field(2)?, field(3)?, field(4)?)?;
    let end = timestamp(field(5)?, field(6)?, field(7)?, field(8)?)?;
    Some((start, end))
}

fn timestamp(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Duration> {
    if minutes > 59 || seconds > 59 {
        return None;
    }
    Some(Duration::from_millis(
        ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis,
    ))
}

/// Serialize cues as SRT, preserving index and time range.
pub fn format(cues: &[SubtitleCue]) -> String {
    cues.iter()
        .map(|cue| {
            format!(
                "{}\n{} --> {}\n{}\n",
                cue.index,
                format_timestamp(cue.start),
                format_timestamp(cue.end),
                cue.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_timestamp(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = d.subsec_millis();
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
