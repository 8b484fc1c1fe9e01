//! Fixit CLI Application
//!
//! Command-line interface for the photo-to-blueprint guided repair tool.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use fixit_core::{HttpProviderBuilder, SqliteStoreBuilder};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        api_url,
        timeout_secs,
        no_color,
        command,
    } = Args::parse();

    let store = SqliteStoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize repair store")?;

    let mut provider_builder = HttpProviderBuilder::new();
    if let Some(url) = api_url {
        provider_builder = provider_builder.with_base_url(url);
    }
    if let Some(secs) = timeout_secs {
        provider_builder = provider_builder.with_timeout(Duration::from_secs(secs));
    }
    let provider = provider_builder
        .build()
        .context("Failed to initialize analysis provider")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(Arc::new(store), Arc::new(provider), renderer);

    info!("Fixit started");

    match command {
        Some(Analyze { photo, note }) => cli.analyze(&photo, note.as_deref()).await,
        Some(List) | None => cli.list().await,
        Some(Feed) => cli.feed().await,
        Some(Show { repair_id }) => cli.show(&repair_id).await,
        Some(Walk { repair_id }) => cli.walk(&repair_id).await,
        Some(Publish {
            repair_id,
            visibility,
            outcome,
        }) => {
            cli.publish(
                &repair_id,
                outcome.and_then(args::OutcomeArg::as_flag),
                visibility.into(),
            )
            .await
        }
        Some(Delete { repair_id }) => cli.delete(&repair_id).await,
    }
}
