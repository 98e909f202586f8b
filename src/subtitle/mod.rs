pub mod srt;

use std::time::Duration;

/// One subtitle entry: index, time range, and text (possibly multi-line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}
