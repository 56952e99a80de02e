//! Create/edit form hosted by the event dialogs.

use eframe::egui;
use shared::{
    domain::{CommerceId, Event, EventDraft, EventId, EventStatus},
    format::parse_calendar_date,
};

use crate::backend_bridge::commands::SaveTarget;

const STATUS_CHOICES: [EventStatus; 3] =
    [EventStatus::Draft, EventStatus::Active, EventStatus::Inactive];

#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    Pending,
    Cancelled,
    Submitted(EventDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    NoCommerce,
    MissingTitle,
    MissingLocation,
    InvalidDate { field: &'static str },
    EndBeforeStart,
    InvalidCapacity,
    MissingStatus,
}

impl FormError {
    pub fn message(&self) -> String {
        match self {
            Self::NoCommerce => "Aucun commerce disponible pour cet événement".to_string(),
            Self::MissingTitle => "Le titre est obligatoire".to_string(),
            Self::MissingLocation => "Le lieu est obligatoire".to_string(),
            Self::InvalidDate { field } => {
                format!("{field} : date invalide (AAAA-MM-JJ ou horodatage ISO 8601)")
            }
            Self::EndBeforeStart => "La date de fin précède la date de début".to_string(),
            Self::InvalidCapacity => {
                "Le nombre maximum de participants doit être un entier positif ou nul".to_string()
            }
            Self::MissingStatus => "Le statut est obligatoire".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventFormFlow {
    target: SaveTarget,
    commerces: Vec<CommerceId>,
    commerce_id: Option<CommerceId>,
    title: String,
    short_description: String,
    image_url: String,
    location: String,
    conditions: String,
    max_participants: String,
    status: String,
    start_date: String,
    end_date: String,
    errors: Vec<FormError>,
}

impl EventFormFlow {
    /// Empty draft bound to the first owned commerce.
    pub fn create(commerces: &[CommerceId]) -> Self {
        let mut flow = Self::blank(SaveTarget::Create, commerces);
        if let Some(draft) = commerces.first().copied().map(EventDraft::empty) {
            flow.commerce_id = Some(draft.commerce_id);
            flow.status = draft.status;
        } else {
            flow.status = EventStatus::Draft.as_literal().to_string();
        }
        flow
    }

    pub fn edit(event: &Event, commerces: &[CommerceId]) -> Self {
        let draft = EventDraft::from_event(event);
        let mut flow = Self::blank(SaveTarget::Update(event.id), commerces);
        if !flow.commerces.contains(&draft.commerce_id) {
            flow.commerces.push(draft.commerce_id);
        }
        flow.commerce_id = Some(draft.commerce_id);
        flow.title = draft.title;
        flow.short_description = draft.short_description;
        flow.image_url = draft.image_url.unwrap_or_default();
        flow.location = draft.location;
        flow.conditions = draft.conditions.unwrap_or_default();
        flow.max_participants = draft.max_participants.to_string();
        flow.status = draft.status;
        flow.start_date = draft.start_date;
        flow.end_date = draft.end_date;
        flow
    }

    fn blank(target: SaveTarget, commerces: &[CommerceId]) -> Self {
        Self {
            target,
            commerces: commerces.to_vec(),
            commerce_id: None,
            title: String::new(),
            short_description: String::new(),
            image_url: String::new(),
            location: String::new(),
            conditions: String::new(),
            max_participants: String::new(),
            status: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn target(&self) -> SaveTarget {
        self.target
    }

    pub fn editing(&self) -> Option<EventId> {
        match self.target {
            SaveTarget::Create => None,
            SaveTarget::Update(event_id) => Some(event_id),
        }
    }

    pub fn errors(&self) -> &[FormError] {
        &self.errors
    }

    pub fn validate(&self) -> Result<EventDraft, Vec<FormError>> {
        let mut errors = Vec::new();

        if self.commerce_id.is_none() {
            errors.push(FormError::NoCommerce);
        }
        if self.title.trim().is_empty() {
            errors.push(FormError::MissingTitle);
        }
        if self.location.trim().is_empty() {
            errors.push(FormError::MissingLocation);
        }
        if self.status.trim().is_empty() {
            errors.push(FormError::MissingStatus);
        }

        let start = parse_calendar_date(&self.start_date);
        if start.is_none() {
            errors.push(FormError::InvalidDate {
                field: "Date début",
            });
        }
        let end = parse_calendar_date(&self.end_date);
        if end.is_none() {
            errors.push(FormError::InvalidDate { field: "Date fin" });
        }
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.push(FormError::EndBeforeStart);
            }
        }

        let max_participants = match self.max_participants.trim().parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                errors.push(FormError::InvalidCapacity);
                0
            }
        };

        let Some(commerce_id) = self.commerce_id else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(EventDraft {
            commerce_id,
            title: self.title.trim().to_string(),
            short_description: self.short_description.trim().to_string(),
            image_url: non_empty(&self.image_url),
            location: self.location.trim().to_string(),
            conditions: non_empty(&self.conditions),
            max_participants,
            status: self.status.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        })
    }

    /// Runs validation; on failure the errors are kept for display.
    pub fn try_submit(&mut self) -> FlowOutcome {
        match self.validate() {
            Ok(draft) => {
                self.errors.clear();
                FlowOutcome::Submitted(draft)
            }
            Err(errors) => {
                self.errors = errors;
                FlowOutcome::Pending
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> FlowOutcome {
        let mut outcome = FlowOutcome::Pending;

        egui::Grid::new(("event_form", self.editing()))
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                if self.commerces.len() > 1 {
                    ui.label("Commerce");
                    let selected = self
                        .commerce_id
                        .map(|id| short_id(&id))
                        .unwrap_or_else(|| "-".to_string());
                    egui::ComboBox::from_id_salt("event_form_commerce")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for commerce_id in &self.commerces {
                                ui.selectable_value(
                                    &mut self.commerce_id,
                                    Some(*commerce_id),
                                    short_id(commerce_id),
                                );
                            }
                        });
                    ui.end_row();
                }

                form_row(ui, "Titre", &mut self.title);
                ui.label("Description courte");
                ui.add(
                    egui::TextEdit::multiline(&mut self.short_description)
                        .desired_rows(3)
                        .desired_width(320.0),
                );
                ui.end_row();
                form_row(ui, "Image (URL)", &mut self.image_url);
                form_row(ui, "Lieu", &mut self.location);
                form_row(ui, "Conditions", &mut self.conditions);
                form_row(ui, "Max participants", &mut self.max_participants);

                ui.label("Statut");
                let current = EventStatus::parse(&self.status);
                egui::ComboBox::from_id_salt("event_form_status")
                    .selected_text(current.badge_label().to_string())
                    .show_ui(ui, |ui| {
                        for choice in &STATUS_CHOICES {
                            let literal = choice.as_literal().to_string();
                            ui.selectable_value(&mut self.status, literal, choice.badge_label());
                        }
                    });
                ui.end_row();

                form_row(ui, "Date début", &mut self.start_date);
                form_row(ui, "Date fin", &mut self.end_date);
            });

        for error in &self.errors {
            ui.colored_label(ui.visuals().error_fg_color, error.message());
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Annuler").clicked() {
                outcome = FlowOutcome::Cancelled;
            }
            let label = match self.target {
                SaveTarget::Create => "Créer",
                SaveTarget::Update(_) => "Enregistrer",
            };
            if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                outcome = self.try_submit();
            }
            if busy {
                ui.spinner();
            }
        });

        outcome
    }
}

fn form_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(320.0));
    ui.end_row();
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn short_id(id: &CommerceId) -> String {
    let text = id.to_string();
    text.chars().take(8).collect()
}

#[cfg(test)]
#[path = "tests/event_flow_tests.rs"]
mod tests;
