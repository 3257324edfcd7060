use crate::types::OutlineEntry;

/// Render entries as a nested bullet list, two spaces per level below `H1`.
pub fn render_markdown(entries: &[OutlineEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(entry.level.rank() as usize - 1);
            format!("{}- {} (Page {})", indent, entry.text, entry.page)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HeadingLevel;

    fn make_entry(level: HeadingLevel, text: &str, page: usize) -> OutlineEntry {
        OutlineEntry {
            level,
            text: text.to_string(),
            page,
        }
    }

    #[test]
    fn test_render_markdown_empty() {
        assert_eq!(render_markdown(&[]), "");
    }

    #[test]
    fn test_render_markdown_nesting() {
        let entries = vec![
            make_entry(HeadingLevel::H1, "Intro", 1),
            make_entry(HeadingLevel::H2, "1.1 Background", 1),
            make_entry(HeadingLevel::H3, "Scope", 2),
            make_entry(HeadingLevel::H4, "Notes", 3),
        ];
        assert_eq!(
            render_markdown(&entries),
            "- Intro (Page 1)\n  - 1.1 Background (Page 1)\n    - Scope (Page 2)\n      - Notes (Page 3)"
        );
    }

    #[test]
    fn test_render_markdown_deep_first_entry() {
        let entries = vec![make_entry(HeadingLevel::H2, "Orphan", 7)];
        assert_eq!(render_markdown(&entries), "  - Orphan (Page 7)");
    }
}
