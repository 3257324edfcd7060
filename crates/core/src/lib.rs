//! Document outline inference from page layout geometry.
//!
//! ```text
//! LayoutSource -> LayoutPage[] -> TextFragment[] -> Cluster[] -> Outline
//!   (extract)       (per page)     font::average    grouping     builder
//!                                                   classify     render
//! ```
//!
//! Everything here is a pure transformation over already extracted pages;
//! decoding documents is the job of a [`source::LayoutSource`].

use thiserror::Error;

pub mod builder;
pub mod classify;
pub mod config;
pub mod font;
pub mod grouping;
pub mod render;
pub mod source;
pub mod types;

pub use builder::{default_title, OutlineBuilder};
pub use config::{FontThresholds, OutlineConfig};
pub use render::{render, render_json, render_markdown, OutlineRecord, RecordEntry};
pub use source::{LayoutElement, LayoutPage, LayoutSource, StaticLayout};
pub use types::*;

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Layout extraction failed: {0}")]
    Extraction(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
