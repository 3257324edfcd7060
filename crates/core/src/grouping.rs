//! Vertical clustering of same-page fragments.
//!
//! Headings often reach us as several fragments (one per wrapped line or per
//! text run). Fragments are walked top to bottom and chained into a
//! [`Cluster`] while each one sits within `y_threshold` of the fragment just
//! before it.

use crate::types::TextFragment;

/// Fragments judged to form one visual line or block.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub fragments: Vec<TextFragment>,
}

impl Cluster {
    fn new(first: TextFragment) -> Self {
        Cluster {
            fragments: vec![first],
        }
    }

    /// Member texts joined with line breaks, in encounter order.
    pub fn merged_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn avg_font_size(&self) -> f32 {
        if self.fragments.is_empty() {
            return 0.0;
        }
        self.fragments.iter().map(|f| f.font_size).sum::<f32>() / self.fragments.len() as f32
    }

    /// Lowest member position, used as the cluster's sort anchor.
    pub fn min_y0(&self) -> f32 {
        self.fragments
            .iter()
            .map(|f| f.y0)
            .fold(f32::INFINITY, f32::min)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Cluster one page's fragments by chained vertical proximity.
///
/// Fragments whose size does not exceed `min_font_size` never take part.
/// Clusters come back top of page first.
pub fn group_fragments(
    fragments: Vec<TextFragment>,
    min_font_size: f32,
    y_threshold: f32,
) -> Vec<Cluster> {
    let mut fragments: Vec<TextFragment> = fragments
        .into_iter()
        .filter(|f| f.font_size > min_font_size)
        .collect();

    // Stable: fragments sharing a y0 keep their extraction order.
    fragments.sort_by(|a, b| b.y0.total_cmp(&a.y0));

    let mut iter = fragments.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut last_y = first.y0;
    let mut current = Cluster::new(first);
    let mut clusters: Vec<Cluster> = Vec::new();

    for fragment in iter {
        let y0 = fragment.y0;
        if (y0 - last_y).abs() <= y_threshold {
            current.fragments.push(fragment);
        } else {
            clusters.push(std::mem::replace(&mut current, Cluster::new(fragment)));
        }
        last_y = y0;
    }

    clusters.push(current);
    clusters
}
