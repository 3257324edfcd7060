//! The seam between the heuristic and whatever decodes documents.
//!
//! A [`LayoutSource`] turns raw document bytes into ordered pages of text
//! elements, each carrying the sizes of its characters. The PDF
//! implementation lives in the `pdf` crate; [`StaticLayout`] serves
//! pre-extracted pages (tests, replayed layout dumps).

use serde::{Deserialize, Serialize};

use crate::OutlineError;

/// One text container as segmented by the layout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    pub text: String,
    /// Bottom edge of the element in page units; larger is higher up.
    pub y0: f32,
    /// Font size of every sized character in the element.
    #[serde(default)]
    pub char_sizes: Vec<f32>,
}

impl LayoutElement {
    pub fn new(text: impl Into<String>, y0: f32, char_sizes: Vec<f32>) -> Self {
        LayoutElement {
            text: text.into(),
            y0,
            char_sizes,
        }
    }

    /// Element whose characters all share one size.
    pub fn uniform(text: impl Into<String>, y0: f32, size: f32) -> Self {
        let text = text.into();
        let char_sizes = vec![size; text.chars().filter(|c| !c.is_whitespace()).count()];
        LayoutElement {
            text,
            y0,
            char_sizes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    pub fn new(elements: Vec<LayoutElement>) -> Self {
        LayoutPage { elements }
    }
}

/// Extracts ordered pages of positioned, sized text from a document.
pub trait LayoutSource {
    fn extract(&self, document: &[u8]) -> Result<Vec<LayoutPage>, OutlineError>;
}

/// A source that ignores the document bytes and hands out fixed pages.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    pages: Vec<LayoutPage>,
}

impl StaticLayout {
    pub fn new(pages: Vec<LayoutPage>) -> Self {
        StaticLayout { pages }
    }

    /// Read a layout dump: a JSON array of pages.
    pub fn from_json(json: &str) -> Result<Self, OutlineError> {
        let pages: Vec<LayoutPage> = serde_json::from_str(json)
            .map_err(|e| OutlineError::Extraction(format!("invalid layout dump: {e}")))?;
        Ok(StaticLayout { pages })
    }
}

impl LayoutSource for StaticLayout {
    fn extract(&self, _document: &[u8]) -> Result<Vec<LayoutPage>, OutlineError> {
        Ok(self.pages.clone())
    }
}
