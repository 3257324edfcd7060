//! Span → line → text box assembly.
//!
//! Spans sharing a baseline become a [`TextLine`]; vertically adjacent lines
//! of similar size become a text box, emitted as one
//! [`outline_core::LayoutElement`]. Every character painted by a span keeps
//! the span's size; spaces inserted between spans carry no size.

use std::cmp::Ordering;

use outline_core::LayoutElement;

use super::spans::TextSpan;
use crate::text::is_spaceless_script_char;

/// Maximum baseline difference (points) for spans on one line.
const Y_TOLERANCE: f32 = 1.0;

/// Horizontal gap (points) above which two spans are separate words.
const MIN_WORD_GAP: f32 = 1.5;

/// Lines further apart than this multiple of the upper line's size start a
/// new box.
const BLOCK_GAP_FACTOR: f32 = 1.4;

/// Lines whose sizes differ by more than this (points) start a new box.
const FONT_SIZE_TOLERANCE: f32 = 1.0;

/// One visual line with per-character sizes aligned to `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub char_sizes: Vec<f32>,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

impl TextLine {
    fn push_span(&mut self, span: &TextSpan) {
        self.text.push_str(&span.text);
        self.char_sizes
            .extend(std::iter::repeat_n(span.font_size, span.text.chars().count()));
    }
}

/// Group spans into lines, top of the page first.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y = f32::NAN;

    for span in spans {
        if !current.is_empty() && (span.y - current_y).abs() > Y_TOLERANCE {
            lines.push(assemble_line(std::mem::take(&mut current)));
        }
        if current.is_empty() {
            current_y = span.y;
        }
        current.push(span);
    }
    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

/// Build a [`TextLine`] from spans known to share a baseline.
fn assemble_line(mut spans: Vec<TextSpan>) -> TextLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let mut line = TextLine {
        text: String::new(),
        char_sizes: Vec::new(),
        x: spans.first().map(|s| s.x).unwrap_or(0.0),
        y: spans.first().map(|s| s.y).unwrap_or(0.0),
        font_size: dominant_font_size(&spans),
    };

    let mut prev: Option<&TextSpan> = None;
    for span in &spans {
        if let Some(p) = prev {
            let gap = span.x - (p.x + p.width);
            if gap >= MIN_WORD_GAP && needs_space(p, span) {
                line.text.push(' ');
            }
        }
        line.push_span(span);
        prev = Some(span);
    }

    line
}

fn needs_space(prev: &TextSpan, next: &TextSpan) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(f)) => {
            !l.is_whitespace()
                && !f.is_whitespace()
                && !(is_spaceless_script_char(l) && is_spaceless_script_char(f))
        }
        _ => false,
    }
}

/// The size covering the most characters in `spans`.
fn dominant_font_size(spans: &[TextSpan]) -> f32 {
    let mut best: Vec<(f32, usize)> = Vec::new();
    for span in spans {
        let count = span.text.chars().count();
        match best
            .iter_mut()
            .find(|(size, _)| (*size - span.font_size).abs() < f32::EPSILON)
        {
            Some(entry) => entry.1 += count,
            None => best.push((span.font_size, count)),
        }
    }
    best.into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(size, _)| size)
        .unwrap_or(0.0)
}

/// Group lines into text boxes.
///
/// A new box starts when the vertical gap exceeds [`BLOCK_GAP_FACTOR`] times
/// the previous line's size or when the dominant size changes by more than
/// [`FONT_SIZE_TOLERANCE`].
pub fn group_lines_into_boxes(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let mut boxes: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        let breaks = current.last().is_some_and(|prev: &TextLine| {
            let gap = (prev.y - line.y).abs();
            gap > prev.font_size * BLOCK_GAP_FACTOR
                || (prev.font_size - line.font_size).abs() > FONT_SIZE_TOLERANCE
        });
        if breaks {
            boxes.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        boxes.push(current);
    }

    boxes
}

/// Collapse a box into a [`LayoutElement`]: lines joined by newlines, bottom
/// edge at the lowest baseline.
pub fn box_to_element(lines: Vec<TextLine>) -> LayoutElement {
    let y0 = lines.iter().map(|l| l.y).fold(f32::INFINITY, f32::min);
    let mut text = String::new();
    let mut char_sizes = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&line.text);
        char_sizes.extend(line.char_sizes);
    }
    LayoutElement::new(text, if y0.is_finite() { y0 } else { 0.0 }, char_sizes)
}

/// Full page assembly: spans in, layout elements out, top of page first.
pub fn spans_to_elements(spans: Vec<TextSpan>) -> Vec<LayoutElement> {
    group_lines_into_boxes(group_spans_into_lines(spans))
        .into_iter()
        .map(box_to_element)
        .collect()
}
