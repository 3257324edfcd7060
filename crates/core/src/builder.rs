//! Page-by-page outline assembly.
//!
//! [`OutlineBuilder`] owns the configuration; each call runs a fresh
//! [`OutlineRun`] over a document's pages, so one builder can be shared by
//! any number of documents. Within a run the only cross-page state is the
//! title search and the accumulated entries.
//!
//! Title search:
//!
//! ```text
//! Seeking --(first page-1 cluster passing the title test)--> Locked
//! Seeking --(end of page 1)--------------------------------> Locked
//! Locked  --(finish)---------------------------------------> Done
//! ```

use std::path::Path;

use log::{debug, info, warn};

use crate::classify::{classify_heading, is_title_candidate, Classification};
use crate::config::OutlineConfig;
use crate::grouping::{group_fragments, Cluster};
use crate::source::{LayoutPage, LayoutSource};
use crate::types::{Outline, OutlineEntry, TextFragment, TitleCandidate};
use crate::OutlineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TitleState {
    Seeking,
    Locked,
    Done,
}

/// An entry still carrying its vertical anchor for the final sort.
#[derive(Debug, Clone)]
struct PendingEntry {
    entry: OutlineEntry,
    min_y0: f32,
}

/// Mutable state for one document.
struct OutlineRun<'a> {
    config: &'a OutlineConfig,
    state: TitleState,
    title: Option<TitleCandidate>,
    entries: Vec<PendingEntry>,
}

impl<'a> OutlineRun<'a> {
    fn new(config: &'a OutlineConfig) -> Self {
        OutlineRun {
            config,
            state: TitleState::Seeking,
            title: None,
            entries: Vec::new(),
        }
    }

    fn process_page(&mut self, page_number: usize, page: &LayoutPage) {
        let fragments: Vec<TextFragment> =
            page.elements.iter().map(TextFragment::from_element).collect();
        let clusters = group_fragments(
            fragments,
            self.config.title_min_font_size,
            self.config.y_threshold,
        );
        debug!("page {page_number}: {} clusters", clusters.len());

        for cluster in &clusters {
            if page_number == 1 && self.try_title(cluster) {
                continue;
            }
            self.try_heading(page_number, cluster);
        }

        if self.state == TitleState::Seeking {
            self.state = TitleState::Locked;
        }
    }

    /// The single title attempt. Returns `true` when the cluster was consumed.
    fn try_title(&mut self, cluster: &Cluster) -> bool {
        if self.state != TitleState::Seeking {
            return false;
        }

        let text = cluster.merged_text();
        let size = cluster.avg_font_size();
        if !is_title_candidate(&text, size, self.config) {
            return false;
        }

        let largest = self.title.as_ref().map_or(0.0, |t| t.font_size);
        if size > largest {
            debug!("title candidate {text:?} at {size}pt");
            self.title = Some(TitleCandidate {
                text,
                font_size: size,
            });
        }
        self.state = TitleState::Locked;
        true
    }

    fn try_heading(&mut self, page_number: usize, cluster: &Cluster) {
        let text = cluster.merged_text();
        let size = cluster.avg_font_size();
        match classify_heading(&text, size, self.config) {
            Classification::Heading(level) => {
                debug!("page {page_number}: {level} {text:?} at {size}pt");
                self.entries.push(PendingEntry {
                    entry: OutlineEntry {
                        level,
                        text,
                        page: page_number,
                    },
                    min_y0: cluster.min_y0(),
                });
            }
            Classification::Body => {}
        }
    }

    fn finish(mut self, file_name: &str) -> Outline {
        self.state = TitleState::Done;

        // Stable: equal anchors keep encounter order.
        self.entries.sort_by(|a, b| {
            a.entry
                .page
                .cmp(&b.entry.page)
                .then(b.min_y0.total_cmp(&a.min_y0))
        });

        let title = match self.title {
            Some(candidate) => candidate.text,
            None => default_title(file_name),
        };

        Outline {
            title,
            entries: self.entries.into_iter().map(|p| p.entry).collect(),
        }
    }
}

/// Infers outlines with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuilder {
    config: OutlineConfig,
}

impl OutlineBuilder {
    pub fn new(config: OutlineConfig) -> Self {
        OutlineBuilder { config }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Build the outline of already extracted pages.
    ///
    /// Only the first `max_pages` pages are looked at.
    pub fn build(&self, pages: &[LayoutPage], file_name: &str) -> Outline {
        let mut run = OutlineRun::new(&self.config);
        for (index, page) in pages.iter().take(self.config.max_pages).enumerate() {
            run.process_page(index + 1, page);
        }
        let outline = run.finish(file_name);
        info!(
            "{file_name}: {} of {} pages, title {:?}, {} entries",
            pages.len().min(self.config.max_pages),
            pages.len(),
            outline.title,
            outline.entries.len()
        );
        outline
    }

    /// Extract a document through `source` and build its outline.
    pub fn extract<S>(
        &self,
        source: &S,
        document: &[u8],
        file_name: &str,
    ) -> Result<Outline, OutlineError>
    where
        S: LayoutSource + ?Sized,
    {
        let pages = source.extract(document)?;
        Ok(self.build(&pages, file_name))
    }

    /// Like [`OutlineBuilder::extract`], degrading any failure to
    /// [`Outline::fallback`].
    pub fn extract_or_fallback<S>(&self, source: &S, document: &[u8], file_name: &str) -> Outline
    where
        S: LayoutSource + ?Sized,
    {
        match self.extract(source, document, file_name) {
            Ok(outline) => outline,
            Err(e) => {
                warn!("Error processing {file_name}: {e}");
                Outline::fallback(file_name)
            }
        }
    }
}

/// Title used when no page-1 cluster qualified: the file stem with
/// underscores turned into spaces, title-cased.
pub fn default_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    title_case(&stem.replace('_', " "))
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
