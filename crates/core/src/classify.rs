//! Title and heading predicates, plus font-size → level lookup.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::{FontThresholds, OutlineConfig};
use crate::types::HeadingLevel;

/// Page numbers, bullets, dates and the like: nothing but digits, whitespace
/// and a handful of punctuation marks.
fn is_numeric_only(text: &str) -> bool {
    static RE_NUMERIC: OnceLock<Regex> = OnceLock::new();
    let re_numeric =
        RE_NUMERIC.get_or_init(|| Regex::new(r"^[\d\s\-–.():]+$").expect("valid pattern"));
    re_numeric.is_match(text)
}

/// Whether a cluster can become an outline entry.
pub fn is_heading_candidate(text: &str, avg_size: f32, config: &OutlineConfig) -> bool {
    let text = text.trim().to_lowercase();
    text.chars().count() >= config.min_text_length
        && avg_size >= config.heading_min_font_size()
        && !is_numeric_only(&text)
        && !config.excluded_headings.contains(&text)
}

/// Whether a first-page cluster can become the document title.
///
/// Unlike [`is_heading_candidate`] the text is not lower-cased and the
/// caption exclusion list does not apply.
pub fn is_title_candidate(text: &str, avg_size: f32, config: &OutlineConfig) -> bool {
    let text = text.trim();
    text.chars().count() >= config.min_text_length
        && avg_size >= config.title_min_font_size
        && !is_numeric_only(text)
}

/// First level whose threshold is at most `avg_size`, largest threshold first.
pub fn level_for(avg_size: f32, thresholds: &FontThresholds) -> Option<HeadingLevel> {
    thresholds
        .iter()
        .find(|(_, min_size)| avg_size >= *min_size)
        .map(|(level, _)| *level)
}

/// Outcome of classifying one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Heading(HeadingLevel),
    Body,
}

/// Heading test followed by level lookup. A candidate no level covers is body.
pub fn classify_heading(text: &str, avg_size: f32, config: &OutlineConfig) -> Classification {
    if !is_heading_candidate(text, avg_size, config) {
        return Classification::Body;
    }
    match level_for(avg_size, &config.font_thresholds) {
        Some(level) => Classification::Heading(level),
        None => Classification::Body,
    }
}
