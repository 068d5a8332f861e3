mod cli;
mod config;
mod filters;
mod html;
mod i18n;
mod loader;
mod logging;
mod opener;
mod pager;
mod record;
mod render;
mod state;
mod stats;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::CliArgs::parse();
    let settings = config::Settings::resolve(&args, config::load_for(&args)?);

    if let Err(e) = logging::init(&settings.log_file, &settings.log_filter) {
        eprintln!("Warning: {:#}", e);
        eprintln!("Continuing without a log file.");
    }
    i18n::init(settings.language.as_deref());
    info!(source = %settings.source, filter = %settings.log_filter, "starting");

    if let Some(output) = &settings.export_html {
        return html::export(&settings.source, settings.initial_actions(), output).await;
    }

    println!("Loading {}...", settings.source);
    if let Err(e) = ui::run(settings.source.clone(), settings.initial_actions()).await {
        eprintln!("Error running UI: {}", e);
        return Err(e);
    }

    Ok(())
}
