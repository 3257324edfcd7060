use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::font::average_font_size;
use crate::source::LayoutElement;

/// Outline depth tag. `H1` is the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 4] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
    ];

    /// 1-based depth: `H1` is 1, `H4` is 4.
    pub fn rank(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HeadingLevel {
    type Err = InvalidHeadingLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeadingLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(InvalidHeadingLevel)
    }
}

#[derive(Debug, Error)]
#[error("Heading level must be one of H1, H2, H3, H4")]
pub struct InvalidHeadingLevel;

/// A piece of page text reduced to what the heuristic looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub font_size: f32,
    pub y0: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, font_size: f32, y0: f32) -> Self {
        TextFragment {
            text: text.into(),
            font_size,
            y0,
        }
    }

    /// Annotate a collaborator element with its representative font size.
    pub fn from_element(element: &LayoutElement) -> Self {
        TextFragment {
            text: element.text.trim().to_string(),
            font_size: average_font_size(&element.char_sizes),
            y0: element.y0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    /// 1-based page number.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    pub text: String,
    pub font_size: f32,
}

/// The inferred outline of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub title: String,
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Record used when a document could not be analysed at all.
    pub fn fallback(file_name: &str) -> Self {
        Outline {
            title: file_name.to_string(),
            entries: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_rank() {
        assert_eq!(HeadingLevel::H1.rank(), 1);
        assert_eq!(HeadingLevel::H4.rank(), 4);
    }

    #[test]
    fn test_heading_level_parse() {
        assert_eq!("H3".parse::<HeadingLevel>().unwrap(), HeadingLevel::H3);
        assert_eq!("h1".parse::<HeadingLevel>().unwrap(), HeadingLevel::H1);
        assert!("H7".parse::<HeadingLevel>().is_err());
    }

    #[test]
    fn test_heading_level_serializes_as_tag() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
    }

    #[test]
    fn test_fragment_from_element_trims_and_averages() {
        let element = LayoutElement {
            text: "  Introduction \n".to_string(),
            y0: 512.0,
            char_sizes: vec![12.0, 14.0, 16.0],
        };
        let fragment = TextFragment::from_element(&element);
        assert_eq!(fragment.text, "Introduction");
        assert_eq!(fragment.font_size, 14.0);
        assert_eq!(fragment.y0, 512.0);
    }

    #[test]
    fn test_fallback_outline() {
        let outline = Outline::fallback("broken.pdf");
        assert_eq!(outline.title, "broken.pdf");
        assert!(outline.entries.is_empty());
    }
}
