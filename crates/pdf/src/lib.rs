//! PDF layout extraction for outline inference.
//!
//! [`PdfLayoutSource`] decodes a document with lopdf, walks each page's
//! content stream for positioned text runs, and assembles them into the
//! [`LayoutPage`]s consumed by [`outline_core::OutlineBuilder`].

use log::debug;
use outline_core::{LayoutPage, LayoutSource, OutlineError};
use thiserror::Error;

use parser::backend::{LopdfBackend, PdfBackend};

pub mod parser;
pub mod text;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PdfError> for OutlineError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::Io(io) => OutlineError::Io(io),
            other => OutlineError::Extraction(other.to_string()),
        }
    }
}

/// [`LayoutSource`] over PDF bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLayoutSource {
    max_pages: Option<usize>,
}

impl PdfLayoutSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop decoding after `max_pages` pages.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

impl LayoutSource for PdfLayoutSource {
    fn extract(&self, document: &[u8]) -> Result<Vec<LayoutPage>, OutlineError> {
        let backend = LopdfBackend::load_bytes(document)?;
        debug!("Loaded PDF with {} pages", backend.page_count());
        Ok(extract_pages(&backend, self.max_pages)?)
    }
}

/// Decode up to `max_pages` pages of `backend` in document order.
pub fn extract_pages(
    backend: &dyn PdfBackend,
    max_pages: Option<usize>,
) -> Result<Vec<LayoutPage>, PdfError> {
    let page_map = backend.pages();
    let limit = max_pages.unwrap_or(usize::MAX);
    let mut pages = Vec::with_capacity(page_map.len().min(limit));

    for (&page_num, &page_id) in page_map.iter().take(limit) {
        let spans = parser::spans::extract_page_spans(backend, page_id)?;
        let elements = parser::elements::spans_to_elements(spans);
        debug!("Page {page_num}: {} elements", elements.len());
        pages.push(LayoutPage::new(elements));
    }

    Ok(pages)
}

/// Extract layout pages from PDF bytes.
pub fn extract_layout(bytes: &[u8], max_pages: Option<usize>) -> Result<Vec<LayoutPage>, PdfError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    extract_pages(&backend, max_pages)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::{decode_text_simple, ContentOp, PageId, PdfValue};

    /// Every page shows its own number as a heading-sized line.
    struct NumberedPages {
        count: u32,
    }

    impl PdfBackend for NumberedPages {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            (1..=self.count).map(|n| (n, (n + 10, 0))).collect()
        }

        fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError> {
            let label = format!("Section {}", page.0 - 10);
            Ok(vec![
                ContentOp::new("BT", vec![]),
                ContentOp::new(
                    "Tf",
                    vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(14)],
                ),
                ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
                ContentOp::new("Tj", vec![PdfValue::Str(label.into_bytes())]),
                ContentOp::new("ET", vec![]),
            ])
        }

        fn decode_text(&self, _page: PageId, _font_key: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    struct BrokenPage;

    impl PdfBackend for BrokenPage {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_operations(&self, _page: PageId) -> Result<Vec<ContentOp>, PdfError> {
            Err(PdfError::Parse("content stream decode error".into()))
        }

        fn decode_text(&self, _page: PageId, _font_key: &[u8], _bytes: &[u8]) -> String {
            String::new()
        }
    }

    #[test]
    fn test_extract_pages_in_order() {
        let pages = extract_pages(&NumberedPages { count: 3 }, None).unwrap();
        assert_eq!(pages.len(), 3);
        let texts: Vec<&str> = pages
            .iter()
            .map(|p| p.elements[0].text.as_str())
            .collect();
        assert_eq!(texts, vec!["Section 1", "Section 2", "Section 3"]);
        assert_eq!(pages[0].elements[0].y0, 700.0);
        assert!(pages[0].elements[0].char_sizes.iter().all(|s| *s == 14.0));
    }

    #[test]
    fn test_extract_pages_respects_limit() {
        let pages = extract_pages(&NumberedPages { count: 10 }, Some(4)).unwrap();
        assert_eq!(pages.len(), 4);
    }

    #[test]
    fn test_page_error_propagates() {
        assert!(matches!(
            extract_pages(&BrokenPage, None),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_layout_source_rejects_garbage() {
        let err = PdfLayoutSource::new().extract(b"%PDF-garbage").unwrap_err();
        assert!(matches!(err, OutlineError::Extraction(_)));
    }

    /// One page per `(text, size, y)` line, Helvetica, via lopdf.
    fn build_pdf(pages: &[Vec<(&str, i64, i64)>]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (text, size, y) in lines {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), (*size).into()]));
                operations.push(Operation::new("Td", vec![72i64.into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extract_layout_from_generated_pdf() {
        let bytes = build_pdf(&[
            vec![("Quarterly Report", 24, 760), ("Prepared by finance", 10, 700)],
            vec![("Overview", 16, 760)],
        ]);

        let pages = extract_layout(&bytes, None).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].elements.len(), 2);
        assert_eq!(pages[0].elements[0].text, "Quarterly Report");
        assert!(pages[0].elements[0].char_sizes.iter().all(|s| *s == 24.0));
        assert_eq!(pages[1].elements[0].text, "Overview");
        assert_eq!(pages[1].elements[0].y0, 760.0);
    }

    #[test]
    fn test_generated_pdf_outline() {
        let bytes = build_pdf(&[
            vec![("Quarterly Report", 24, 760), ("Prepared by finance", 10, 700)],
            vec![("Overview", 16, 760), ("Revenue grew in all regions.", 10, 720)],
        ]);

        let outline = outline_core::OutlineBuilder::default()
            .extract(&PdfLayoutSource::new(), &bytes, "report.pdf")
            .unwrap();
        assert_eq!(outline.title, "Quarterly Report");
        assert_eq!(outline.entries.len(), 1);
        assert_eq!(outline.entries[0].text, "Overview");
        assert_eq!(outline.entries[0].page, 2);
    }

    #[test]
    fn test_max_pages_limits_generated_pdf() {
        let bytes = build_pdf(&[
            vec![("Page one", 12, 700)],
            vec![("Page two", 12, 700)],
            vec![("Page three", 12, 700)],
        ]);
        let pages = PdfLayoutSource::new()
            .with_max_pages(2)
            .extract(&bytes)
            .unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_error_conversion() {
        let err: OutlineError = PdfError::Encrypted.into();
        assert!(err.to_string().contains("encrypted"));
    }
}
