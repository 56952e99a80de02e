mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    config::{open_backend, resolve_selection, Settings},
    load_events, EventsListPage,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "events_cli", about = "Événements des commerces du profil connecté")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    supabase_url: Option<String>,
    #[arg(long, global = true)]
    anon_key: Option<String>,
    #[arg(long, global = true)]
    access_token: Option<String>,
    #[arg(long, global = true)]
    http_timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[arg(long, global = true)]
    profile_id: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints one card per event, or the empty state.
    List,
}

impl Cli {
    fn overrides(&self) -> Settings {
        Settings {
            supabase_url: self.supabase_url.clone(),
            anon_key: self.anon_key.clone(),
            access_token: self.access_token.clone(),
            timeout_secs: self.http_timeout_secs,
            database_url: self.database_url.clone(),
            profile_id: self.profile_id.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let selection = resolve_selection(cli.config.as_deref(), cli.overrides())?;
    let backend = open_backend(&selection).await?;

    match cli.command {
        Command::List => {
            let mut page = EventsListPage::new();
            let ticket = page.begin_load();
            let outcome = load_events(backend.as_ref()).await;
            if let Err(err) = &outcome {
                tracing::warn!(stage = err.kind.stage(), "events unavailable: {}", err.message);
            }
            page.finish_load(ticket, outcome);
            print!("{}", render::render_page(&page.view()));
        }
    }

    Ok(())
}
