//! Applies worker events to the page state and decides follow-up commands.

use std::collections::HashMap;

use client_core::{
    EventsListPage, ImageSource, LoadError, LoadErrorKind, LoadTicket, PageView,
};
use shared::domain::{EventDraft, EventId};

use crate::backend_bridge::commands::{BackendCommand, CommandKey, SaveTarget};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::PreviewImage;

#[derive(Debug, Clone)]
pub enum ImageSlot {
    Loading,
    Ready(PreviewImage),
    Failed,
}

pub struct PageController {
    page: EventsListPage,
    pending_load: Option<LoadTicket>,
    images: HashMap<EventId, ImageSlot>,
    save_error: Option<UiError>,
    worker_error: Option<UiError>,
    status: String,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

impl PageController {
    pub fn new() -> Self {
        Self {
            page: EventsListPage::new(),
            pending_load: None,
            images: HashMap::new(),
            save_error: None,
            worker_error: None,
            status: String::new(),
        }
    }

    /// First load after the window opens.
    pub fn mount(&mut self) -> BackendCommand {
        let ticket = self.page.begin_load();
        self.pending_load = Some(ticket);
        BackendCommand::LoadEvents { ticket }
    }

    pub fn apply(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::WorkerFailed(err) => {
                tracing::error!(
                    context = ?err.context(),
                    "backend worker failed: {}",
                    err.message()
                );
                if let Some(ticket) = self.pending_load.take() {
                    self.page.finish_load(
                        ticket,
                        Err(LoadError::new(LoadErrorKind::Unexpected, err.message())),
                    );
                }
                self.page.set_action_pending(false);
                self.worker_error = Some(err);
                Vec::new()
            }
            UiEvent::EventsLoaded { ticket, outcome } => {
                if !self.page.finish_load(ticket, outcome) {
                    return Vec::new();
                }
                self.pending_load = None;
                self.request_images()
            }
            UiEvent::EventSaved { target } => {
                self.page.set_action_pending(false);
                self.save_error = None;
                let ticket = match target {
                    SaveTarget::Create => self.page.on_event_created(),
                    SaveTarget::Update(event_id) => {
                        tracing::info!(%event_id, "event updated, reloading page");
                        self.page.on_event_updated()
                    }
                };
                self.pending_load = Some(ticket);
                self.images.clear();
                vec![BackendCommand::LoadEvents { ticket }]
            }
            UiEvent::EventSaveFailed(err) => {
                tracing::warn!(category = ?err.category(), "event save failed: {}", err.message());
                self.page.set_action_pending(false);
                self.save_error = Some(err);
                Vec::new()
            }
            UiEvent::EventImageLoaded { event_id, image } => {
                if self.images.contains_key(&event_id) {
                    self.images.insert(event_id, ImageSlot::Ready(image));
                }
                Vec::new()
            }
            UiEvent::EventImageFailed { event_id, reason } => {
                tracing::debug!(%event_id, "event image unavailable: {reason}");
                if self.images.contains_key(&event_id) {
                    self.images.insert(event_id, ImageSlot::Failed);
                }
                Vec::new()
            }
        }
    }

    /// Queues a form submission unless one is already in flight.
    pub fn submit(&mut self, target: SaveTarget, draft: EventDraft) -> Option<BackendCommand> {
        if self.page.is_action_pending() {
            return None;
        }
        self.page.set_action_pending(true);
        self.save_error = None;
        Some(BackendCommand::SaveEvent { target, draft })
    }

    /// Rolls back the state a command set up when it never reached the worker.
    pub fn command_not_sent(&mut self, key: CommandKey) {
        match key {
            CommandKey::Load(ticket) => {
                if self.pending_load != Some(ticket) {
                    return;
                }
                self.pending_load = None;
                self.page.finish_load(
                    ticket,
                    Err(LoadError::new(
                        LoadErrorKind::Unexpected,
                        "backend connection unavailable",
                    )),
                );
            }
            CommandKey::Save => {
                self.page.set_action_pending(false);
                self.save_error = Some(UiError::from_message(
                    UiErrorContext::SaveEvent,
                    "backend connection unavailable",
                ));
            }
            CommandKey::Image(event_id) => {
                if self.images.contains_key(&event_id) {
                    self.images.insert(event_id, ImageSlot::Failed);
                }
            }
            CommandKey::Shutdown => {}
        }
    }

    pub fn open_create_dialog(&mut self) {
        self.save_error = None;
        self.page.open_create_dialog();
    }

    pub fn open_edit_dialog(&mut self, event_id: EventId) -> bool {
        self.save_error = None;
        self.page.open_edit_dialog(event_id)
    }

    pub fn close_dialogs(&mut self) {
        self.page.close_create_dialog();
        self.page.close_edit_dialog();
    }

    pub fn page(&self) -> &EventsListPage {
        &self.page
    }

    pub fn view(&self) -> PageView {
        self.page.view()
    }

    pub fn image(&self, event_id: EventId) -> Option<&ImageSlot> {
        self.images.get(&event_id)
    }

    pub fn save_error(&self) -> Option<&UiError> {
        self.save_error.as_ref()
    }

    pub fn worker_error(&self) -> Option<&UiError> {
        self.worker_error.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn request_images(&mut self) -> Vec<BackendCommand> {
        let PageView::Cards(cards) = self.page.view() else {
            self.images.clear();
            return Vec::new();
        };

        self.images
            .retain(|event_id, _| cards.iter().any(|card| card.event_id == *event_id));

        let mut commands = Vec::new();
        for card in cards {
            let ImageSource::Remote(url) = card.image else {
                continue;
            };
            if self.images.contains_key(&card.event_id) {
                continue;
            }
            self.images.insert(card.event_id, ImageSlot::Loading);
            commands.push(BackendCommand::FetchEventImage {
                event_id: card.event_id,
                url,
            });
        }
        commands
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
