use std::path::{Path, PathBuf};

use outline_core::{render_json, render_markdown, Outline, OutlineBuilder, StaticLayout};
use pdf::PdfLayoutSource;

use crate::prelude::{println, *};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Options {
    /// PDF file, or a `.json` layout dump produced by `outliner layout`
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let config = crate::settings::load(&global)?;
    let builder = OutlineBuilder::new(config);

    let outline = tokio::task::spawn_blocking({
        let path = options.path.clone();
        move || outline_file(&builder, &path)
    })
    .await??;

    println!("{}", format_outline(&outline, options.format)?);
    Ok(())
}

/// Outline a PDF, or replay a layout dump when the path ends in `.json`.
///
/// A PDF that cannot be decoded yields the fallback record; a dump that
/// cannot be parsed is an error.
pub fn outline_file(builder: &OutlineBuilder, path: &Path) -> Result<Outline> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_eyre("Path has no file name")?;
    let bytes =
        std::fs::read(path).wrap_err_with(|| f!("Failed to read {}", path.display()))?;

    let is_dump = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_dump {
        let json = String::from_utf8(bytes).wrap_err("Layout dump is not valid UTF-8")?;
        let source = StaticLayout::from_json(&json)?;
        return Ok(builder.extract(&source, &[], file_name)?);
    }

    let source = PdfLayoutSource::new().with_max_pages(builder.config().max_pages);
    Ok(builder.extract_or_fallback(&source, &bytes, file_name))
}

pub fn format_outline(outline: &Outline, format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => render_json(outline)?,
        Format::Markdown => render_markdown(&outline.entries),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use outline_core::{LayoutElement, LayoutPage};
    use tempfile::TempDir;

    fn write_dump(dir: &Path, name: &str) -> PathBuf {
        let pages = vec![
            LayoutPage::new(vec![LayoutElement::uniform("Field Manual", 760.0, 22.0)]),
            LayoutPage::new(vec![
                LayoutElement::uniform("Getting Started", 760.0, 16.0),
                LayoutElement::uniform("Installing the tools", 700.0, 14.5),
                LayoutElement::uniform("Plain paragraph text", 660.0, 10.0),
            ]),
        ];
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(&pages).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_outline_layout_dump() {
        let dir = TempDir::new().unwrap();
        let path = write_dump(dir.path(), "manual.json");

        let outline = outline_file(&OutlineBuilder::default(), &path).unwrap();
        assert_eq!(outline.title, "Field Manual");
        let texts: Vec<&str> = outline.entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Getting Started", "Installing the tools"]);

        let md = format_outline(&outline, Format::Markdown).unwrap();
        assert_eq!(
            md,
            "- Getting Started (Page 2)\n  - Installing the tools (Page 2)"
        );
    }

    #[test]
    fn test_invalid_dump_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(outline_file(&OutlineBuilder::default(), &path).is_err());
    }

    #[test]
    fn test_undecodable_pdf_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"\x00\x01\x02").unwrap();

        let outline = outline_file(&OutlineBuilder::default(), &path).unwrap();
        assert_eq!(outline, Outline::fallback("scan.pdf"));
        assert_eq!(
            format_outline(&outline, Format::Json).unwrap(),
            "{\n  \"title\": \"scan.pdf\",\n  \"outline\": []\n}"
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = outline_file(&OutlineBuilder::default(), Path::new("/nonexistent/a.pdf"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/a.pdf"));
    }
}
