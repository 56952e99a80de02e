//! Worker-to-UI events and error modeling for the events dashboard.

use client_core::{LoadOutcome, LoadTicket};
use shared::domain::EventId;

use crate::backend_bridge::commands::SaveTarget;
use crate::ui::app::PreviewImage;

pub enum UiEvent {
    Info(String),
    /// The worker could not start; every later command will fail the same way.
    WorkerFailed(UiError),
    EventsLoaded {
        ticket: LoadTicket,
        outcome: LoadOutcome,
    },
    EventSaved {
        target: SaveTarget,
    },
    EventSaveFailed(UiError),
    EventImageLoaded {
        event_id: EventId,
        image: PreviewImage,
    },
    EventImageFailed {
        event_id: EventId,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SaveEvent,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("not authenticated")
            || message_lower.contains("not owned")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("violates")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short French sentence shown inside the form dialog.
    pub fn user_message(&self) -> String {
        let prefix = match self.category {
            UiErrorCategory::Auth => "Accès refusé",
            UiErrorCategory::Transport => "Service injoignable",
            UiErrorCategory::Validation => "Données invalides",
            UiErrorCategory::Unknown => "Erreur",
        };
        format!("{prefix} : {}", self.message)
    }
}
