//! Backend selection shared by the desktop app and the CLI.
//!
//! Layers, lowest to highest: built-in defaults, `events_dashboard.toml`,
//! `EVENTS_*` environment variables, command line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::ProfileId;
use storage::Storage;

use crate::{EventStore, LocalBackend, RestBackend, RestConfig};

pub const CONFIG_FILE_NAME: &str = "events_dashboard.toml";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/events.db";

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    supabase: SupabaseSection,
    #[serde(default)]
    local: LocalSection,
}

#[derive(Debug, Default, Deserialize)]
struct SupabaseSection {
    url: Option<String>,
    anon_key: Option<String>,
    access_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalSection {
    database_url: Option<String>,
    profile_id: Option<String>,
}

/// Every knob is optional until [`Settings::into_selection`] decides which
/// backend to talk to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub database_url: Option<String>,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendSelection {
    Rest(RestSettings),
    Local {
        database_url: String,
        profile_id: Option<ProfileId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestSettings {
    pub base_url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

impl Settings {
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let file: FileConfig = toml::from_str(raw).context("invalid configuration file")?;
        Ok(Self {
            supabase_url: file.supabase.url,
            anon_key: file.supabase.anon_key,
            access_token: file.supabase.access_token,
            timeout_secs: file.supabase.timeout_secs,
            database_url: file.local.database_url,
            profile_id: file.local.profile_id,
        })
    }

    /// Reads `path` if it exists. A missing file is not an error.
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw)
                .with_context(|| format!("failed to parse '{}'", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read '{}'", path.display()))
            }
        }
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("EVENTS_SUPABASE_URL") {
            self.supabase_url = Some(v);
        }
        if let Some(v) = non_empty("EVENTS_ANON_KEY") {
            self.anon_key = Some(v);
        }
        if let Some(v) = non_empty("EVENTS_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        if let Some(v) = non_empty("EVENTS_HTTP_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.timeout_secs = Some(parsed),
                Err(_) => tracing::warn!(value = %v, "ignoring invalid EVENTS_HTTP_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = non_empty("EVENTS_DATABASE_URL") {
            self.database_url = Some(v);
        }
        if let Some(v) = non_empty("EVENTS_PROFILE_ID") {
            self.profile_id = Some(v);
        }
    }

    /// Values set in `overrides` win.
    pub fn merge(&mut self, overrides: Settings) {
        let Settings {
            supabase_url,
            anon_key,
            access_token,
            timeout_secs,
            database_url,
            profile_id,
        } = overrides;
        self.supabase_url = supabase_url.or(self.supabase_url.take());
        self.anon_key = anon_key.or(self.anon_key.take());
        self.access_token = access_token.or(self.access_token.take());
        self.timeout_secs = timeout_secs.or(self.timeout_secs);
        self.database_url = database_url.or(self.database_url.take());
        self.profile_id = profile_id.or(self.profile_id.take());
    }

    /// A configured Supabase URL selects the REST backend; otherwise the
    /// local SQLite store is used.
    pub fn into_selection(self) -> anyhow::Result<BackendSelection> {
        if let Some(base_url) = self.supabase_url {
            let anon_key = self.anon_key.context(
                "EVENTS_ANON_KEY (or [supabase].anon_key) is required with a Supabase URL",
            )?;
            return Ok(BackendSelection::Rest(RestSettings {
                base_url,
                anon_key,
                access_token: self.access_token,
                timeout: self.timeout_secs.map(Duration::from_secs),
            }));
        }

        let database_url = prepare_database_url(
            self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL),
        )?;
        let profile_id = self
            .profile_id
            .as_deref()
            .map(str::parse::<ProfileId>)
            .transpose()
            .context("profile id must be a UUID")?;
        Ok(BackendSelection::Local {
            database_url,
            profile_id,
        })
    }
}

/// Defaults, then the config file, then the process environment, then `overrides`.
pub fn resolve_selection(
    config_path: Option<&Path>,
    overrides: Settings,
) -> anyhow::Result<BackendSelection> {
    let default_path = PathBuf::from(CONFIG_FILE_NAME);
    let mut settings = Settings::load_file(config_path.unwrap_or(&default_path))?;
    settings.apply_env(|name| std::env::var(name).ok());
    settings.merge(overrides);
    settings.into_selection()
}

pub async fn open_backend(selection: &BackendSelection) -> anyhow::Result<Arc<dyn EventStore>> {
    match selection {
        BackendSelection::Rest(rest) => {
            tracing::info!(base_url = %rest.base_url, "using REST backend");
            let backend = RestBackend::new(RestConfig {
                base_url: rest.base_url.clone(),
                anon_key: rest.anon_key.clone(),
                access_token: rest.access_token.clone(),
                timeout: rest.timeout,
            })?;
            Ok(Arc::new(backend))
        }
        BackendSelection::Local {
            database_url,
            profile_id,
        } => {
            tracing::info!(%database_url, "using local sqlite backend");
            let storage = Storage::new(database_url)
                .await
                .with_context(|| format!("failed to open '{database_url}'"))?;
            Ok(Arc::new(LocalBackend::new(storage, *profile_id)))
        }
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
