use std::path::PathBuf;

use crate::prelude::{println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    path: PathBuf,
}

/// Print the extracted pages as a JSON array, the format `extract` replays.
pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let config = crate::settings::load(&global)?;
    let bytes = std::fs::read(&options.path)
        .wrap_err_with(|| f!("Failed to read {}", options.path.display()))?;

    let pages = tokio::task::spawn_blocking(move || {
        pdf::extract_layout(&bytes, Some(config.max_pages))
    })
    .await?
    .map_err(|e| eyre!("Failed to extract layout from {}: {}", options.path.display(), e))?;

    println!("{}", serde_json::to_string_pretty(&pages)?);
    Ok(())
}
