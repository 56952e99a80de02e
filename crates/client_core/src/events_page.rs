//! Headless state of the events list page: loading, dialogs, cards.
//!
//! The page never talks to the backend itself. Callers run
//! [`crate::load_events`] for the ticket returned by [`EventsListPage::begin_load`]
//! and hand the outcome back through [`EventsListPage::finish_load`].

use shared::{
    domain::{BadgeTone, CommerceId, Event, EventId},
    format::format_event_date,
};
use tracing::debug;

use crate::{LoadErrorKind, LoadOutcome};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-logo.png";
pub const CONDITIONS_LABEL: &str = "Conditions:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(LoadErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCard {
    pub event_id: EventId,
    pub title: String,
    pub location: String,
    pub image: ImageSource,
    pub status_label: String,
    pub status_tone: BadgeTone,
    pub short_description: String,
    pub start_date: String,
    pub end_date: String,
    pub participants_count: u32,
    pub max_participants: u32,
    pub conditions: Option<String>,
}

impl EventCard {
    pub fn from_event(event: &Event) -> Self {
        let status = event.status();
        Self {
            event_id: event.id,
            title: event.title.clone(),
            location: event.location.clone(),
            image: event
                .image_source()
                .map(|url| ImageSource::Remote(url.to_string()))
                .unwrap_or(ImageSource::Placeholder),
            status_label: status.badge_label().to_string(),
            status_tone: status.badge_tone(),
            short_description: event.short_description.clone(),
            start_date: format_event_date(&event.start_date),
            end_date: format_event_date(&event.end_date),
            participants_count: event.participants_count,
            max_participants: event.max_participants,
            conditions: event.conditions_text().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    Empty,
    Cards(Vec<EventCard>),
}

#[derive(Debug, Clone)]
pub struct EventsListPage {
    events: Vec<Event>,
    owned_commerces: Vec<CommerceId>,
    is_loading_events: bool,
    is_action_pending: bool,
    create_dialog_open: bool,
    edit_dialog_open: bool,
    editing_event: Option<Event>,
    load_status: LoadStatus,
    generation: u64,
}

impl Default for EventsListPage {
    fn default() -> Self {
        Self::new()
    }
}

impl EventsListPage {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            owned_commerces: Vec::new(),
            is_loading_events: true,
            is_action_pending: false,
            create_dialog_open: false,
            edit_dialog_open: false,
            editing_event: None,
            load_status: LoadStatus::Pending,
            generation: 0,
        }
    }

    /// Starts a load run. Results for any earlier ticket are dropped from now on.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.is_loading_events = true;
        self.load_status = LoadStatus::Pending;
        LoadTicket(self.generation)
    }

    /// Resets the page to its freshly mounted state and starts a new load.
    pub fn reload(&mut self) -> LoadTicket {
        let generation = self.generation;
        *self = Self::new();
        self.generation = generation;
        self.begin_load()
    }

    /// Applies a load result. Returns `false` when the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "dropping stale events load result"
            );
            return false;
        }

        match outcome {
            Ok(owned) => {
                self.events = owned.events;
                self.owned_commerces = owned.commerce_ids;
                self.load_status = LoadStatus::Loaded;
            }
            Err(err) => {
                self.events.clear();
                self.owned_commerces.clear();
                self.load_status = LoadStatus::Failed(err.kind);
            }
        }
        self.is_loading_events = false;
        true
    }

    pub fn view(&self) -> PageView {
        if self.is_loading_events {
            PageView::Loading
        } else if self.events.is_empty() {
            PageView::Empty
        } else {
            PageView::Cards(self.events.iter().map(EventCard::from_event).collect())
        }
    }

    pub fn open_create_dialog(&mut self) {
        self.create_dialog_open = true;
    }

    pub fn close_create_dialog(&mut self) {
        self.create_dialog_open = false;
    }

    /// Completion of the create flow: close the dialog and refetch.
    pub fn on_event_created(&mut self) -> LoadTicket {
        self.create_dialog_open = false;
        self.reload()
    }

    /// Selects `event_id` for editing. Unknown ids are ignored.
    pub fn open_edit_dialog(&mut self, event_id: EventId) -> bool {
        let Some(event) = self.events.iter().find(|e| e.id == event_id) else {
            return false;
        };
        self.editing_event = Some(event.clone());
        self.edit_dialog_open = true;
        true
    }

    pub fn close_edit_dialog(&mut self) {
        self.edit_dialog_open = false;
    }

    /// Completion of the edit flow: close the dialog, drop the selection and
    /// reload everything from scratch.
    pub fn on_event_updated(&mut self) -> LoadTicket {
        self.edit_dialog_open = false;
        self.editing_event = None;
        self.reload()
    }

    pub fn set_action_pending(&mut self, pending: bool) {
        self.is_action_pending = pending;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn owned_commerces(&self) -> &[CommerceId] {
        &self.owned_commerces
    }

    pub fn is_loading_events(&self) -> bool {
        self.is_loading_events
    }

    pub fn is_action_pending(&self) -> bool {
        self.is_action_pending
    }

    pub fn is_create_dialog_open(&self) -> bool {
        self.create_dialog_open
    }

    pub fn is_edit_dialog_open(&self) -> bool {
        self.edit_dialog_open
    }

    pub fn editing_event(&self) -> Option<&Event> {
        self.editing_event.as_ref()
    }

    /// Tag of the last completed load. Rendering treats a failure like an
    /// empty result; the tag keeps the two apart for callers that care.
    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }
}

#[cfg(test)]
#[path = "tests/events_page_tests.rs"]
mod tests;
