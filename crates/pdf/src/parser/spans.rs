//! Content-stream walker producing positioned, sized text runs.
//!
//! Implements the subset of the PDF text state needed to know where each
//! string is painted and at which size:
//!
//! | Operator | Action |
//! |----------|--------|
//! | `BT`     | Begin text object, reset matrices |
//! | `Tf`     | Set font and size |
//! | `Tm`     | Set text matrix |
//! | `Td`/`TD`| Translate text position (`TD` also sets leading) |
//! | `T*`     | Next line |
//! | `TL`/`Tc`/`Tw`/`Tz`/`Ts` | Leading, spacing, scaling, rise |
//! | `Tj`/`TJ`/`'`/`"` | Show text |
//! | `cm`/`q`/`Q` | Graphics state matrix |

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};
use crate::text::normalize_text;
use crate::PdfError;

/// A run of text painted at one position with one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    /// Baseline in page space, origin at the bottom of the page.
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
}

/// Approximate glyph advance as a fraction of the font size; no font metrics
/// are read.
pub const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `a × b` for 2×3 affine matrices in PDF order `[a b c d e f]`.
fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_size: f32,
    text_matrix: Matrix,
    line_matrix: Matrix,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        TextState {
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Text-space origin mapped to page space.
    fn position(&self) -> (f32, f32) {
        let m = multiply(&self.text_matrix, &self.ctm);
        (m[4], m[5] + self.text_rise * m[3])
    }

    /// Rendered size: `font_size` scaled by the length of the text-space
    /// y axis, `√(c² + d²)` of the combined text and graphics matrices.
    fn effective_font_size(&self) -> f32 {
        let m = multiply(&self.text_matrix, &self.ctm);
        (self.font_size * (m[2].powi(2) + m[3].powi(2)).sqrt()).abs()
    }

    fn glyph_advance(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn advance_after(&mut self, text: &str) {
        let dx: f32 = text
            .chars()
            .map(|ch| {
                let spacing = if ch == ' ' { self.word_spacing } else { 0.0 };
                self.glyph_advance() + self.char_spacing + spacing
            })
            .sum();
        self.advance_x(dx);
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&[1.0, 0.0, 0.0, 1.0, tx, ty], &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

/// Walks one page's operations and collects [`TextSpan`]s.
struct SpanCollector<'a> {
    backend: &'a dyn PdfBackend,
    page: PageId,
    state: TextState,
    spans: Vec<TextSpan>,
}

impl<'a> SpanCollector<'a> {
    fn new(backend: &'a dyn PdfBackend, page: PageId) -> Self {
        SpanCollector {
            backend,
            page,
            state: TextState::default(),
            spans: Vec::new(),
        }
    }

    fn decode(&self, operand: &PdfValue) -> String {
        match operand {
            PdfValue::Str(bytes) => self.backend.decode_text(self.page, &self.state.font_key, bytes),
            _ => String::new(),
        }
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.state.ctm_stack.push(self.state.ctm),
            "Q" => {
                if let Some(ctm) = self.state.ctm_stack.pop() {
                    self.state.ctm = ctm;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let m: Matrix = std::array::from_fn(|i| op.number(i));
                    self.state.ctm = multiply(&m, &self.state.ctm);
                }
            }
            "BT" => {
                self.state.text_matrix = IDENTITY;
                self.state.line_matrix = IDENTITY;
            }
            "Tf" => {
                if let Some(PdfValue::Name(key)) = op.operands.first() {
                    self.state.font_key = key.clone();
                }
                self.state.font_size = op.number(1);
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    self.state.text_matrix = std::array::from_fn(|i| op.number(i));
                    self.state.line_matrix = self.state.text_matrix;
                }
            }
            "Td" => self.state.translate_line(op.number(0), op.number(1)),
            "TD" => {
                self.state.leading = -op.number(1);
                self.state.translate_line(op.number(0), op.number(1));
            }
            "T*" => self.state.next_line(),
            "TL" => self.state.leading = op.number(0),
            "Tc" => self.state.char_spacing = op.number(0),
            "Tw" => self.state.word_spacing = op.number(0),
            "Tz" => self.state.horiz_scale = op.number(0) / 100.0,
            "Ts" => self.state.text_rise = op.number(0),
            "Tj" => {
                if let Some(operand) = op.operands.first() {
                    let text = self.decode(operand);
                    self.show(&text);
                }
            }
            "'" => {
                self.state.next_line();
                if let Some(operand) = op.operands.first() {
                    let text = self.decode(operand);
                    self.show(&text);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    self.state.word_spacing = op.number(0);
                    self.state.char_spacing = op.number(1);
                    self.state.next_line();
                    let text = self.decode(&op.operands[2]);
                    self.show(&text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show_array(items);
                }
            }
            _ => {}
        }
    }

    /// Emit `text` at the current position and advance past it.
    fn show(&mut self, text: &str) {
        let text = normalize_text(text);
        if text.trim().is_empty() {
            self.state.advance_after(&text);
            return;
        }
        let (x, y) = self.state.position();
        self.spans.push(TextSpan {
            width: text.chars().count() as f32 * self.state.glyph_advance(),
            text: text.clone(),
            x,
            y,
            font_size: self.state.effective_font_size(),
        });
        self.state.advance_after(&text);
    }

    /// `TJ`: strings interleaved with kerning adjustments in thousandths of
    /// a text-space unit. Large negative adjustments read as word gaps.
    fn show_array(&mut self, items: &[PdfValue]) {
        let start = self.state.clone();
        let mut buf = String::new();

        for item in items {
            if let PdfValue::Str(_) = item {
                let fragment = self.decode(item);
                buf.push_str(&fragment);
                self.state.advance_after(&fragment);
            } else if let Some(adjust) = item.as_f32() {
                let dx = -adjust / 1000.0 * self.state.font_size * self.state.horiz_scale;
                if dx > self.state.glyph_advance() * 0.3 && !buf.is_empty() && !buf.ends_with(' ') {
                    buf.push(' ');
                }
                self.state.advance_x(dx);
            }
        }

        let end_matrix = self.state.text_matrix;
        let text = normalize_text(buf.trim_end());
        if !text.trim().is_empty() {
            let (x, y) = start.position();
            self.spans.push(TextSpan {
                width: (end_matrix[4] - start.text_matrix[4]).abs(),
                text,
                x,
                y,
                font_size: start.effective_font_size(),
            });
        }
    }
}

/// Extract the text spans painted on one page.
pub fn extract_page_spans(backend: &dyn PdfBackend, page: PageId) -> Result<Vec<TextSpan>, PdfError> {
    let ops = backend.page_operations(page)?;
    let mut collector = SpanCollector::new(backend, page);
    for op in &ops {
        collector.apply(op);
    }
    Ok(collector.spans)
}
