//! Output shapes for an [`Outline`].
//!
//! The structured record is what the batch writes to disk; the Markdown
//! rendering is a read-only view for humans.

pub mod markdown;

use serde::{Deserialize, Serialize};

use crate::types::{HeadingLevel, Outline};
use crate::OutlineError;

pub use markdown::render_markdown;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
}

/// Serialisable form of an outline: `{"title": ..., "outline": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub title: String,
    pub outline: Vec<RecordEntry>,
}

pub fn render(outline: &Outline) -> OutlineRecord {
    OutlineRecord {
        title: outline.title.clone(),
        outline: outline
            .entries
            .iter()
            .map(|e| RecordEntry {
                level: e.level,
                text: e.text.clone(),
                page: e.page,
            })
            .collect(),
    }
}

/// Pretty JSON with two-space indentation; non-ASCII text is kept as is.
pub fn render_json(outline: &Outline) -> Result<String, OutlineError> {
    serde_json::to_string_pretty(&render(outline))
        .map_err(|e| OutlineError::Serialization(e.to_string()))
}
