use serde::{Deserialize, Serialize};

use crate::domain::{CommerceId, EventDraft};

/// Row of `commerces?select=id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceIdRow {
    pub id: CommerceId,
}

/// Error body returned by PostgREST and the auth endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestErrorBody {
    #[serde(default, alias = "msg", alias = "error_description")]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Payload for `POST /rest/v1/events` and `PATCH /rest/v1/events`.
#[derive(Debug, Clone, Serialize)]
pub struct EventWriteRequest<'a> {
    #[serde(flatten)]
    pub draft: &'a EventDraft,
}
