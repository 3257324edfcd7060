use crate::prelude::*;
use clap::Parser;

mod batch;
mod error;
mod extract;
mod layout;
mod prelude;
mod settings;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Infer title and heading outlines of PDF documents from font sizes and positions"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct Global {
    /// TOML file overriding the default thresholds
    #[clap(long, env = "OUTLINER_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Number of pages inspected per document
    #[clap(long, env = "OUTLINER_MAX_PAGES", global = true)]
    max_pages: Option<usize>,

    /// Maximum vertical distance between lines of one heading
    #[clap(long, env = "OUTLINER_Y_THRESHOLD", global = true)]
    y_threshold: Option<f32>,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Write one outline record per PDF found in a directory
    Batch(crate::batch::Options),

    /// Print the outline of a single document
    Extract(crate::extract::Options),

    /// Dump the extracted page layout of a PDF as JSON
    Layout(crate::layout::Options),

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Batch(options) => crate::batch::run(options, app.global).await,
        SubCommands::Extract(options) => crate::extract::run(options, app.global).await,
        SubCommands::Layout(options) => crate::layout::run(options, app.global).await,
        SubCommands::Config => crate::settings::print(&app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
