//! Backend over the local SQLite store, signed in as a fixed profile.

use async_trait::async_trait;
use shared::{
    domain::{AuthUser, CommerceId, Event, EventDraft, EventId, ProfileId},
    error::{ApiError, ErrorCode},
};
use storage::Storage;

use crate::{BackendError, EventsBackend, EventsWriter};

#[derive(Clone)]
pub struct LocalBackend {
    storage: Storage,
    profile_id: Option<ProfileId>,
}

impl LocalBackend {
    pub fn new(storage: Storage, profile_id: Option<ProfileId>) -> Self {
        Self {
            storage,
            profile_id,
        }
    }

    async fn ensure_owned(&self, commerce_id: CommerceId) -> Result<(), BackendError> {
        let profile_id = self.profile_id.ok_or(BackendError::Unauthorized)?;
        let owned = self.owned_commerce_ids(profile_id).await?;
        if owned.contains(&commerce_id) {
            Ok(())
        } else {
            Err(BackendError::Api {
                status: 403,
                error: ApiError::new(
                    ErrorCode::Forbidden,
                    format!("commerce {commerce_id} is not owned by profile {profile_id}"),
                ),
            })
        }
    }
}

#[async_trait]
impl EventsBackend for LocalBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        let Some(profile_id) = self.profile_id else {
            return Ok(None);
        };
        let exists = self
            .storage
            .profile_exists(profile_id)
            .await
            .map_err(BackendError::Storage)?;
        Ok(exists.then_some(AuthUser {
            id: profile_id,
            email: None,
        }))
    }

    async fn owned_commerce_ids(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<CommerceId>, BackendError> {
        self.storage
            .list_commerce_ids_for_profile(profile_id)
            .await
            .map_err(BackendError::Storage)
    }

    async fn events_for_commerces(
        &self,
        commerce_ids: &[CommerceId],
    ) -> Result<Option<Vec<Event>>, BackendError> {
        self.storage
            .list_events_for_commerces(commerce_ids)
            .await
            .map(Some)
            .map_err(BackendError::Storage)
    }
}

#[async_trait]
impl EventsWriter for LocalBackend {
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, BackendError> {
        self.ensure_owned(draft.commerce_id).await?;
        self.storage
            .insert_event(draft)
            .await
            .map_err(BackendError::Storage)
    }

    async fn update_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<Event, BackendError> {
        let existing = self
            .storage
            .load_event(event_id)
            .await
            .map_err(BackendError::Storage)?
            .ok_or_else(|| event_not_found(event_id))?;
        self.ensure_owned(existing.commerce_id).await?;
        self.ensure_owned(draft.commerce_id).await?;
        self.storage
            .update_event(event_id, draft)
            .await
            .map_err(BackendError::Storage)?
            .ok_or_else(|| event_not_found(event_id))
    }
}

fn event_not_found(event_id: EventId) -> BackendError {
    BackendError::Api {
        status: 404,
        error: ApiError::new(ErrorCode::NotFound, format!("event {event_id} not found")),
    }
}

#[cfg(test)]
#[path = "tests/local_tests.rs"]
mod tests;
