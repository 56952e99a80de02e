//! Startup configuration for the desktop window.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use client_core::config::{BackendSelection, Settings, CONFIG_FILE_NAME};

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "Tableau de bord des événements")]
pub struct StartupArgs {
    /// Path to the TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub supabase_url: Option<String>,
    #[arg(long)]
    pub anon_key: Option<String>,
    #[arg(long)]
    pub access_token: Option<String>,
    #[arg(long)]
    pub http_timeout_secs: Option<u64>,
    #[arg(long)]
    pub database_url: Option<String>,
    #[arg(long)]
    pub profile_id: Option<String>,
}

impl StartupArgs {
    pub fn overrides(&self) -> Settings {
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

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub selection: BackendSelection,
}

impl StartupConfig {
    pub fn resolve(args: &StartupArgs) -> anyhow::Result<Self> {
        let config_path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let mut settings = Settings::load_file(&config_path)?;
        settings.apply_env(|name| std::env::var(name).ok());
        Self::from_settings(settings, args)
    }

    fn from_settings(mut settings: Settings, args: &StartupArgs) -> anyhow::Result<Self> {
        settings.merge(args.overrides());
        if settings.supabase_url.is_none() && settings.database_url.is_none() {
            settings.database_url = default_database_path()
                .map(|path| path.to_string_lossy().into_owned());
        }
        let selection = settings
            .into_selection()
            .context("invalid desktop configuration")?;
        Ok(Self { selection })
    }
}

/// Per-user data directory, e.g. `~/.local/share/commerce_events/events.db`.
fn default_database_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("commerce_events").join("events.db"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
