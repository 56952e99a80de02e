use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, QueryBuilder, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use uuid::Uuid;

use shared::domain::{CommerceId, Event, EventDraft, EventId, ProfileId};

const EVENT_COLUMNS: &str = "id, commerce_id, title, short_description, image_url, location, \
     conditions, max_participants, participants_count, status, start_date, end_date, \
     created_at, updated_at";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredCommerce {
    pub commerce_id: CommerceId,
    pub profile_id: ProfileId,
    pub name: String,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_profile(&self, email: &str) -> Result<ProfileId> {
        let rec = sqlx::query(
            "INSERT INTO profiles (id, email) VALUES (?, ?)
             ON CONFLICT(email) DO UPDATE SET email=excluded.email
             RETURNING id",
        )
        .bind(ProfileId::new_random().to_string())
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(ProfileId(parse_uuid(&rec.get::<String, _>(0))?))
    }

    pub async fn profile_exists(&self, profile_id: ProfileId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM profiles WHERE id = ?")
            .bind(profile_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn create_commerce(&self, profile_id: ProfileId, name: &str) -> Result<CommerceId> {
        let commerce_id = CommerceId::new_random();
        sqlx::query("INSERT INTO commerces (id, profile_id, name) VALUES (?, ?, ?)")
            .bind(commerce_id.to_string())
            .bind(profile_id.to_string())
            .bind(name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to create commerce for profile {profile_id}"))?;
        Ok(commerce_id)
    }

    pub async fn list_commerces_for_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<StoredCommerce>> {
        let rows = sqlx::query(
            "SELECT id, profile_id, name FROM commerces WHERE profile_id = ? ORDER BY rowid",
        )
        .bind(profile_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| {
                Ok(StoredCommerce {
                    commerce_id: CommerceId(parse_uuid(&r.get::<String, _>(0))?),
                    profile_id: ProfileId(parse_uuid(&r.get::<String, _>(1))?),
                    name: r.get::<String, _>(2),
                })
            })
            .collect()
    }

    pub async fn list_commerce_ids_for_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<CommerceId>> {
        Ok(self
            .list_commerces_for_profile(profile_id)
            .await?
            .into_iter()
            .map(|c| c.commerce_id)
            .collect())
    }

    pub async fn insert_event(&self, draft: &EventDraft) -> Result<Event> {
        let event_id = EventId::new_random();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO events (id, commerce_id, title, short_description, image_url, location,
                                 conditions, max_participants, participants_count, status,
                                 start_date, end_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)",
        )
        .bind(event_id.to_string())
        .bind(draft.commerce_id.to_string())
        .bind(&draft.title)
        .bind(&draft.short_description)
        .bind(draft.image_url.as_deref())
        .bind(&draft.location)
        .bind(draft.conditions.as_deref())
        .bind(i64::from(draft.max_participants))
        .bind(&draft.status)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert event for commerce {}", draft.commerce_id))?;

        self.load_event(event_id)
            .await?
            .context("inserted event not found")
    }

    pub async fn update_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<Option<Event>> {
        let result = sqlx::query(
            "UPDATE events
             SET commerce_id = ?, title = ?, short_description = ?, image_url = ?, location = ?,
                 conditions = ?, max_participants = ?, status = ?, start_date = ?, end_date = ?,
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(draft.commerce_id.to_string())
        .bind(&draft.title)
        .bind(&draft.short_description)
        .bind(draft.image_url.as_deref())
        .bind(&draft.location)
        .bind(draft.conditions.as_deref())
        .bind(i64::from(draft.max_participants))
        .bind(&draft.status)
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(Utc::now())
        .bind(event_id.to_string())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update event {event_id}"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.load_event(event_id).await
    }

    pub async fn set_participants_count(&self, event_id: EventId, count: u32) -> Result<bool> {
        let result = sqlx::query("UPDATE events SET participants_count = ? WHERE id = ?")
            .bind(i64::from(count))
            .bind(event_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn load_event(&self, event_id: EventId) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
            .bind(event_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }

    /// Events whose commerce is one of `commerce_ids`, in insertion order.
    pub async fn list_events_for_commerces(
        &self,
        commerce_ids: &[CommerceId],
    ) -> Result<Vec<Event>> {
        if commerce_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE commerce_id IN ("
        ));
        let mut separated = query.separated(", ");
        for commerce_id in commerce_ids {
            separated.push_bind(commerce_id.to_string());
        }
        separated.push_unseparated(") ORDER BY rowid");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .context("failed to list events for commerces")?;
        tracing::debug!(
            commerce_count = commerce_ids.len(),
            event_count = rows.len(),
            "storage: listed events"
        );
        rows.iter().map(event_from_row).collect()
    }
}

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    let max_participants: i64 = row.try_get("max_participants")?;
    let participants_count: i64 = row.try_get("participants_count")?;
    Ok(Event {
        id: EventId(parse_uuid(&row.try_get::<String, _>("id")?)?),
        commerce_id: CommerceId(parse_uuid(&row.try_get::<String, _>("commerce_id")?)?),
        title: row.try_get("title")?,
        short_description: row.try_get("short_description")?,
        image_url: row.try_get("image_url")?,
        location: row.try_get("location")?,
        conditions: row.try_get("conditions")?,
        max_participants: u32::try_from(max_participants).unwrap_or(0),
        participants_count: u32::try_from(participants_count).unwrap_or(0),
        status: row.try_get("status")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        created_at: row.try_get::<Option<DateTime<Utc>>, _>("created_at")?,
        updated_at: row.try_get::<Option<DateTime<Utc>>, _>("updated_at")?,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("malformed uuid column value '{raw}'"))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
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
#[path = "tests/lib_tests.rs"]
mod tests;
