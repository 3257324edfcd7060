//! Tunables for the outline heuristic.
//!
//! Everything the algorithm compares against lives in [`OutlineConfig`], an
//! immutable value handed to [`crate::builder::OutlineBuilder`] at
//! construction. Defaults reproduce the stock thresholds; a TOML file can
//! override any subset of them:
//!
//! ```toml
//! max_pages = 20
//! y_threshold = 6.0
//!
//! [font_thresholds]
//! H1 = 18.0
//! H2 = 15.0
//! H3 = 12.5
//! H4 = 10.0
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::HeadingLevel;
use crate::OutlineError;

pub const MAX_PAGES: usize = 50;
pub const Y_THRESHOLD: f32 = 8.0;
pub const MIN_TEXT_LENGTH: usize = 4;
pub const TITLE_MIN_FONT_SIZE: f32 = 9.0;
pub const EXCLUDED_HEADINGS: [&str; 3] = ["figure", "table", "appendix"];

/// Default level table, largest threshold first.
pub const FONT_THRESHOLDS: [(HeadingLevel, f32); 4] = [
    (HeadingLevel::H1, 16.0),
    (HeadingLevel::H2, 14.0),
    (HeadingLevel::H3, 12.0),
    (HeadingLevel::H4, 10.0),
];

/// Level → minimum font size table, kept in descending threshold order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f32>", into = "BTreeMap<String, f32>")]
pub struct FontThresholds(Vec<(HeadingLevel, f32)>);

impl FontThresholds {
    pub fn new(entries: impl IntoIterator<Item = (HeadingLevel, f32)>) -> Self {
        let mut entries: Vec<(HeadingLevel, f32)> = entries.into_iter().collect();
        // Ties keep the shallower level first.
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut seen = BTreeSet::new();
        entries.retain(|(level, _)| seen.insert(*level));
        FontThresholds(entries)
    }

    /// Entries in descending threshold order.
    pub fn iter(&self) -> impl Iterator<Item = &(HeadingLevel, f32)> {
        self.0.iter()
    }

    pub fn get(&self, level: HeadingLevel) -> Option<f32> {
        self.0
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, size)| *size)
    }

    /// Smallest threshold in the table.
    pub fn min(&self) -> Option<f32> {
        self.0.last().map(|(_, size)| *size)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for FontThresholds {
    fn default() -> Self {
        FontThresholds::new(FONT_THRESHOLDS)
    }
}

impl TryFrom<BTreeMap<String, f32>> for FontThresholds {
    type Error = String;

    fn try_from(map: BTreeMap<String, f32>) -> Result<Self, Self::Error> {
        let entries = map
            .into_iter()
            .map(|(key, size)| {
                key.parse::<HeadingLevel>()
                    .map(|level| (level, size))
                    .map_err(|e| format!("invalid font_thresholds key '{key}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FontThresholds::new(entries))
    }
}

impl From<FontThresholds> for BTreeMap<String, f32> {
    fn from(thresholds: FontThresholds) -> Self {
        thresholds
            .0
            .into_iter()
            .map(|(level, size)| (level.to_string(), size))
            .collect()
    }
}

/// Immutable configuration for one outline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Level whose threshold is the minimum size for a heading.
    pub heading_floor: HeadingLevel,
    /// Pages past this count are never looked at.
    pub max_pages: usize,
    /// Maximum vertical distance between chained fragments of one cluster.
    pub y_threshold: f32,
    /// Minimum trimmed character count for titles and headings.
    pub min_text_length: usize,
    /// Lower-cased texts that are captions, never headings.
    pub excluded_headings: BTreeSet<String>,
    /// Fragments at or below this size are never grouped.
    pub title_min_font_size: f32,
    /// Level table consulted largest threshold first.
    pub font_thresholds: FontThresholds,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        OutlineConfig {
            heading_floor: HeadingLevel::H3,
            max_pages: MAX_PAGES,
            y_threshold: Y_THRESHOLD,
            min_text_length: MIN_TEXT_LENGTH,
            excluded_headings: EXCLUDED_HEADINGS.iter().map(|s| s.to_string()).collect(),
            title_min_font_size: TITLE_MIN_FONT_SIZE,
            font_thresholds: FontThresholds::default(),
        }
    }
}

impl OutlineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, OutlineError> {
        let config: OutlineConfig =
            toml::from_str(s).map_err(|e| OutlineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, OutlineError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
            .map_err(|e| OutlineError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn to_toml_string(&self) -> Result<String, OutlineError> {
        toml::to_string_pretty(self).map_err(|e| OutlineError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), OutlineError> {
        if self.font_thresholds.is_empty() {
            return Err(OutlineError::Config(
                "font_thresholds must contain at least one level".into(),
            ));
        }
        if let Some((level, size)) = self
            .font_thresholds
            .iter()
            .find(|(_, size)| !size.is_finite() || *size < 0.0)
        {
            return Err(OutlineError::Config(format!(
                "font threshold for {level} must be a non-negative number, got {size}"
            )));
        }
        if self.font_thresholds.get(self.heading_floor).is_none() {
            return Err(OutlineError::Config(format!(
                "heading_floor {} has no entry in font_thresholds",
                self.heading_floor
            )));
        }
        if self.max_pages == 0 {
            return Err(OutlineError::Config("max_pages must be at least 1".into()));
        }
        if !self.y_threshold.is_finite() || self.y_threshold < 0.0 {
            return Err(OutlineError::Config(format!(
                "y_threshold must be a non-negative number, got {}",
                self.y_threshold
            )));
        }
        if !self.title_min_font_size.is_finite() || self.title_min_font_size < 0.0 {
            return Err(OutlineError::Config(format!(
                "title_min_font_size must be a non-negative number, got {}",
                self.title_min_font_size
            )));
        }
        Ok(())
    }

    /// Minimum average size a cluster needs to be a heading.
    pub fn heading_min_font_size(&self) -> f32 {
        self.font_thresholds
            .get(self.heading_floor)
            .or_else(|| self.font_thresholds.min())
            .unwrap_or(f32::INFINITY)
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_y_threshold(mut self, y_threshold: f32) -> Self {
        self.y_threshold = y_threshold;
        self
    }

    pub fn with_font_thresholds(mut self, thresholds: FontThresholds) -> Self {
        self.font_thresholds = thresholds;
        self
    }
}
