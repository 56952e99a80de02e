use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::config::{prepare_database_url, DEFAULT_DATABASE_URL};
use shared::domain::{CommerceId, EventDraft, EventId, EventStatus, ProfileId};
use storage::Storage;
use tracing_subscriber::EnvFilter;

/// Seeds the local events database.
#[derive(Parser, Debug)]
struct Cli {
    /// A `sqlite:` URL or a plain file path.
    #[arg(long, env = "EVENTS_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateProfile {
        email: String,
    },
    CreateCommerce {
        profile_id: ProfileId,
        name: String,
    },
    ListCommerces {
        profile_id: ProfileId,
    },
    CreateEvent {
        commerce_id: CommerceId,
        title: String,
        /// ISO date or timestamp, e.g. 2024-10-02 or 2024-10-02T14:00:00+02:00.
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        conditions: Option<String>,
        #[arg(long, default_value_t = 20)]
        max_participants: u32,
        /// Stored as given; `active`, `inactive` and `draft` (or their French
        /// forms) get a dedicated badge.
        #[arg(long, default_value = "draft")]
        status: String,
    },
    SetParticipants {
        event_id: EventId,
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let storage = open_storage(&cli.database_url).await?;

    match cli.command {
        Command::CreateProfile { email } => {
            let profile_id = storage.create_profile(&email).await?;
            println!("created profile_id={profile_id}");
        }
        Command::CreateCommerce { profile_id, name } => {
            if !storage.profile_exists(profile_id).await? {
                anyhow::bail!("profile {profile_id} does not exist");
            }
            let commerce_id = storage.create_commerce(profile_id, &name).await?;
            println!("created commerce_id={commerce_id}");
        }
        Command::ListCommerces { profile_id } => {
            for commerce in storage.list_commerces_for_profile(profile_id).await? {
                println!("{}\t{}", commerce.commerce_id, commerce.name);
            }
        }
        Command::CreateEvent {
            commerce_id,
            title,
            start,
            end,
            location,
            description,
            image_url,
            conditions,
            max_participants,
            status,
        } => {
            let draft = EventDraft {
                title,
                short_description: description,
                image_url,
                location,
                conditions,
                max_participants,
                status,
                start_date: start,
                end_date: end,
                ..EventDraft::empty(commerce_id)
            };
            let event = storage.insert_event(&draft).await?;
            println!(
                "created event_id={} status={}",
                event.id,
                EventStatus::parse(&event.status).badge_label()
            );
        }
        Command::SetParticipants { event_id, count } => {
            if !storage.set_participants_count(event_id, count).await? {
                anyhow::bail!("event {event_id} not found");
            }
            println!("updated event_id={event_id} participants={count}");
        }
    }

    Ok(())
}

async fn open_storage(raw_database_url: &str) -> Result<Storage> {
    let database_url = prepare_database_url(raw_database_url)?;
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open '{database_url}'"))?;
    storage.health_check().await?;
    Ok(storage)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
