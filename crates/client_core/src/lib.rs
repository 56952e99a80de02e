use async_trait::async_trait;
use shared::{
    domain::{AuthUser, CommerceId, Event, EventDraft, EventId, ProfileId},
    error::ApiError,
};
use thiserror::Error;
use tracing::{error, info};

pub mod config;
pub mod events_page;
mod local;
mod rest;

pub use events_page::{
    EventCard, EventsListPage, ImageSource, LoadStatus, LoadTicket, PageView, PLACEHOLDER_IMAGE,
};
pub use local::LocalBackend;
pub use rest::{RestBackend, RestConfig};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("http status {status}: {error}")]
    Api { status: u16, error: ApiError },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
    #[error("invalid backend configuration: {0}")]
    Config(String),
}

/// Read side of the remote database, as seen by the events page.
#[async_trait]
pub trait EventsBackend: Send + Sync {
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError>;
    async fn owned_commerce_ids(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<CommerceId>, BackendError>;
    /// `Ok(None)` when the service answered without a result set.
    async fn events_for_commerces(
        &self,
        commerce_ids: &[CommerceId],
    ) -> Result<Option<Vec<Event>>, BackendError>;
}

/// Write side used by the create/edit form.
#[async_trait]
pub trait EventsWriter: Send + Sync {
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, BackendError>;
    async fn update_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<Event, BackendError>;
}

/// Both sides of the backend behind one object.
pub trait EventStore: EventsBackend + EventsWriter {}

impl<T: EventsBackend + EventsWriter + ?Sized> EventStore for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    Authentication,
    Unauthenticated,
    CommerceQuery,
    EventQuery,
    Unexpected,
}

impl LoadErrorKind {
    pub fn stage(self) -> &'static str {
        match self {
            Self::Authentication | Self::Unauthenticated => "authentication",
            Self::CommerceQuery => "commerces",
            Self::EventQuery => "events",
            Self::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn from_backend(kind: LoadErrorKind, err: &BackendError) -> Self {
        let kind = match err {
            BackendError::Decode(_) => LoadErrorKind::Unexpected,
            _ => kind,
        };
        Self::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnedEvents {
    pub commerce_ids: Vec<CommerceId>,
    pub events: Vec<Event>,
}

pub type LoadOutcome = Result<OwnedEvents, LoadError>;

/// Identity, then owned commerce ids, then their events. Each step is awaited
/// before the next and any failure ends the sequence.
pub async fn load_events<B>(backend: &B) -> LoadOutcome
where
    B: EventsBackend + ?Sized,
{
    info!("loading events");

    let user = match backend.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("no authenticated user");
            return Err(LoadError::new(
                LoadErrorKind::Unauthenticated,
                "no authenticated user",
            ));
        }
        Err(err) => {
            error!(stage = "authentication", "authentication error: {err}");
            return Err(LoadError::from_backend(LoadErrorKind::Authentication, &err));
        }
    };
    info!(profile_id = %user.id, "user authenticated");

    let commerce_ids = match backend.owned_commerce_ids(user.id).await {
        Ok(ids) => ids,
        Err(err) => {
            error!(stage = "commerces", profile_id = %user.id, "error loading commerces: {err}");
            return Err(LoadError::from_backend(LoadErrorKind::CommerceQuery, &err));
        }
    };
    if commerce_ids.is_empty() {
        info!(profile_id = %user.id, "no commerces found for user");
        return Ok(OwnedEvents::default());
    }

    let events = match backend.events_for_commerces(&commerce_ids).await {
        Ok(rows) => rows.unwrap_or_default(),
        Err(err) => {
            error!(
                stage = "events",
                commerce_count = commerce_ids.len(),
                "database error: {err}"
            );
            return Err(LoadError::from_backend(LoadErrorKind::EventQuery, &err));
        }
    };
    info!(
        commerce_count = commerce_ids.len(),
        event_count = events.len(),
        "events loaded"
    );

    Ok(OwnedEvents {
        commerce_ids,
        events,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
