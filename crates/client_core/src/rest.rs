//! PostgREST / Supabase style HTTP backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AuthUser, CommerceId, Event, EventDraft, EventId, ProfileId},
    error::{ApiError, ErrorCode},
    protocol::{CommerceIdRow, EventWriteRequest},
};
use url::Url;

use crate::{BackendError, EventsBackend, EventsWriter};

const USER_PATH: &str = "auth/v1/user";
const COMMERCES_PATH: &str = "rest/v1/commerces";
const EVENTS_PATH: &str = "rest/v1/events";

#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

pub struct RestBackend {
    http: Client,
    base_url: Url,
    anon_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    pub fn new(config: RestConfig) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            BackendError::Config(format!("invalid base url '{}': {e}", config.base_url))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key,
            access_token: config.access_token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::Config(format!("cannot build endpoint '{path}': {e}")))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    async fn read_body(response: Response) -> Result<String, BackendError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                error: ApiError::from_response(status.as_u16(), &body),
            });
        }
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn write_event(
        &self,
        request: RequestBuilder,
        draft: &EventDraft,
    ) -> Result<Event, BackendError> {
        let response = self
            .authorized(request)
            .header("Prefer", "return=representation")
            .json(&EventWriteRequest { draft })
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        let rows: Vec<Event> = Self::decode(&body)?;
        rows.into_iter().next().ok_or_else(|| BackendError::Api {
            status: StatusCode::NOT_FOUND.as_u16(),
            error: ApiError::new(ErrorCode::NotFound, "no event row returned"),
        })
    }
}

#[async_trait]
impl EventsBackend for RestBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        if self.access_token.is_none() {
            return Ok(None);
        }
        let response = self
            .authorized(self.http.get(self.endpoint(USER_PATH)?))
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }
        Self::decode(&body).map(Some)
    }

    async fn owned_commerce_ids(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<CommerceId>, BackendError> {
        let response = self
            .authorized(self.http.get(self.endpoint(COMMERCES_PATH)?))
            .query(&[
                ("select", "id".to_string()),
                ("profile_id", format!("eq.{profile_id}")),
            ])
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        let rows: Option<Vec<CommerceIdRow>> = Self::decode(&body)?;
        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.id)
            .collect())
    }

    async fn events_for_commerces(
        &self,
        commerce_ids: &[CommerceId],
    ) -> Result<Option<Vec<Event>>, BackendError> {
        if commerce_ids.is_empty() {
            return Ok(Some(Vec::new()));
        }
        let members = commerce_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .authorized(self.http.get(self.endpoint(EVENTS_PATH)?))
            .query(&[
                ("select", "*".to_string()),
                ("commerce_id", format!("in.({members})")),
            ])
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Self::decode(&body)
    }
}

#[async_trait]
impl EventsWriter for RestBackend {
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, BackendError> {
        let request = self.http.post(self.endpoint(EVENTS_PATH)?);
        self.write_event(request, draft).await
    }

    async fn update_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<Event, BackendError> {
        let request = self
            .http
            .patch(self.endpoint(EVENTS_PATH)?)
            .query(&[("id", format!("eq.{event_id}"))]);
        self.write_event(request, draft).await
    }
}

#[cfg(test)]
#[path = "tests/rest_tests.rs"]
mod tests;
