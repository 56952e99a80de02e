//! Backend commands queued from UI to backend worker.

use client_core::LoadTicket;
use shared::domain::{EventDraft, EventId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(EventId),
}

#[derive(Debug)]
pub enum BackendCommand {
    LoadEvents { ticket: LoadTicket },
    SaveEvent { target: SaveTarget, draft: EventDraft },
    FetchEventImage { event_id: EventId, url: String },
    Shutdown,
}

/// Identifies the page state a queued command is responsible for, so a
/// command that never reached the worker can be rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKey {
    Load(LoadTicket),
    Save,
    Image(EventId),
    Shutdown,
}

impl BackendCommand {
    pub fn key(&self) -> CommandKey {
        match self {
            Self::LoadEvents { ticket } => CommandKey::Load(*ticket),
            Self::SaveEvent { .. } => CommandKey::Save,
            Self::FetchEventImage { event_id, .. } => CommandKey::Image(*event_id),
            Self::Shutdown => CommandKey::Shutdown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadEvents { .. } => "load_events",
            Self::SaveEvent {
                target: SaveTarget::Create,
                ..
            } => "create_event",
            Self::SaveEvent {
                target: SaveTarget::Update(_),
                ..
            } => "update_event",
            Self::FetchEventImage { .. } => "fetch_event_image",
            Self::Shutdown => "shutdown",
        }
    }
}
