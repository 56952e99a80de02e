use std::{collections::HashMap, time::Duration};

use client_core::{events_page::CONDITIONS_LABEL, EventCard, ImageSource, PageView};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::{BadgeTone, EventId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{ImageSlot, PageController};
use crate::ui::event_flow::{EventFormFlow, FlowOutcome};

const CARD_WIDTH: f32 = 300.0;
const CARD_IMAGE_HEIGHT: f32 = 170.0;

const TOP_BAR_FILL: egui::Color32 = egui::Color32::from_rgb(19, 20, 24);
const NAV_FILL: egui::Color32 = egui::Color32::from_rgb(24, 25, 30);
const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(32, 33, 38);
const CARD_STROKE: egui::Color32 = egui::Color32::from_rgb(58, 60, 70);
const PLACEHOLDER_FILL: egui::Color32 = egui::Color32::from_rgb(44, 45, 52);

#[derive(Debug, Clone)]
pub(crate) struct PreviewImage {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) rgba: Vec<u8>,
}

enum PageAction {
    OpenCreate,
    OpenEdit(EventId),
}

pub struct EventsDashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: PageController,
    form: Option<EventFormFlow>,
    textures: HashMap<EventId, TextureHandle>,
    status: String,
}

impl EventsDashboardApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller: PageController::new(),
            form: None,
            textures: HashMap::new(),
            status: String::new(),
        };
        let mount = app.controller.mount();
        app.dispatch(mount);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Err(key) = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.controller.command_not_sent(key);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            for cmd in self.controller.apply(event) {
                self.dispatch(cmd);
            }
        }

        let page = self.controller.page();
        if !page.is_create_dialog_open() && !page.is_edit_dialog_open() {
            self.form = None;
        }

        let controller = &self.controller;
        self.textures
            .retain(|event_id, _| matches!(controller.image(*event_id), Some(ImageSlot::Ready(_))));
    }

    fn apply_action(&mut self, action: PageAction) {
        match action {
            PageAction::OpenCreate => {
                self.controller.open_create_dialog();
                self.form = Some(EventFormFlow::create(
                    self.controller.page().owned_commerces(),
                ));
            }
            PageAction::OpenEdit(event_id) => {
                if !self.controller.open_edit_dialog(event_id) {
                    return;
                }
                let page = self.controller.page();
                self.form = page
                    .editing_event()
                    .map(|event| EventFormFlow::edit(event, page.owned_commerces()));
            }
        }
    }

    fn card_texture(&mut self, ctx: &egui::Context, event_id: EventId) -> Option<TextureHandle> {
        if let Some(texture) = self.textures.get(&event_id) {
            return Some(texture.clone());
        }
        let Some(ImageSlot::Ready(image)) = self.controller.image(event_id) else {
            return None;
        };
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
        let texture = ctx.load_texture(
            format!("event-image:{event_id}"),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(event_id, texture.clone());
        Some(texture)
    }

    fn show_top_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("dashboard_top_bar")
            .resizable(false)
            .exact_height(40.0)
            .frame(
                egui::Frame::new()
                    .fill(TOP_BAR_FILL)
                    .inner_margin(egui::Margin::symmetric(14, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Espace commerçant")
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(err) = self.controller.worker_error() {
                            ui.colored_label(ui.visuals().error_fg_color, err.user_message());
                        } else {
                            let status: &str = if self.status.is_empty() {
                                self.controller.status()
                            } else {
                                &self.status
                            };
                            ui.label(egui::RichText::new(status).small().weak());
                        }
                    });
                });
            });
    }

    fn show_navigation(&self, ctx: &egui::Context) {
        egui::SidePanel::left("dashboard_navigation")
            .resizable(false)
            .exact_width(200.0)
            .frame(
                egui::Frame::NONE
                    .fill(NAV_FILL)
                    .inner_margin(egui::Margin::symmetric(10, 12)),
            )
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Navigation").small().weak());
                ui.add_space(6.0);
                let _ = ui.selectable_label(true, "Événements");
            });
    }

    fn show_page(&mut self, ctx: &egui::Context) {
        let mut action = None;
        let view = self.controller.view();
        let textures: HashMap<EventId, TextureHandle> = match &view {
            PageView::Cards(cards) => cards
                .iter()
                .filter_map(|card| {
                    self.card_texture(ctx, card.event_id)
                        .map(|texture| (card.event_id, texture))
                })
                .collect(),
            _ => HashMap::new(),
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.heading(egui::RichText::new("Événements").strong());
                    ui.label(egui::RichText::new("Gérez vos événements et ateliers").weak());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Créer un événement").clicked() {
                        action = Some(PageAction::OpenCreate);
                    }
                });
            });
            ui.add_space(12.0);
            ui.separator();
            ui.add_space(12.0);

            match &view {
                PageView::Loading => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(80.0);
                        ui.spinner();
                        ui.add_space(8.0);
                        ui.label(
                            egui::RichText::new("Chargement des événements...").weak(),
                        );
                    });
                }
                PageView::Empty => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(60.0);
                        ui.label(egui::RichText::new("Aucun événement").heading());
                        ui.add_space(6.0);
                        ui.label(
                            egui::RichText::new(
                                "Vous n'avez pas encore créé d'événements pour vos commerces.",
                            )
                            .weak(),
                        );
                        ui.add_space(12.0);
                        if ui.button("Créer votre premier événement").clicked() {
                            action = Some(PageAction::OpenCreate);
                        }
                    });
                }
                PageView::Cards(cards) => {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.horizontal_wrapped(|ui| {
                                ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
                                for card in cards {
                                    let slot = self.controller.image(card.event_id);
                                    let texture = textures.get(&card.event_id);
                                    if render_event_card(ui, card, texture, slot) {
                                        action = Some(PageAction::OpenEdit(card.event_id));
                                    }
                                }
                            });
                        });
                }
            }
        });

        if let Some(action) = action {
            self.apply_action(action);
        }
    }

    fn show_form_dialog(&mut self, ctx: &egui::Context) {
        let page = self.controller.page();
        let creating = page.is_create_dialog_open();
        if !creating && !page.is_edit_dialog_open() {
            return;
        }
        let Some(mut form) = self.form.take() else {
            return;
        };

        let title = if creating {
            "Créer un nouvel événement"
        } else {
            "Modifier l'événement"
        };
        let busy = page.is_action_pending();
        let save_error = self.controller.save_error().map(|err| err.user_message());

        let mut outcome = FlowOutcome::Pending;
        let modal = egui::Modal::new(egui::Id::new("event_form_modal")).show(ctx, |ui| {
            ui.set_width(520.0);
            ui.heading(title);
            ui.add_space(10.0);
            if let Some(message) = &save_error {
                ui.colored_label(ui.visuals().error_fg_color, message);
                ui.add_space(6.0);
            }
            egui::ScrollArea::vertical()
                .max_height(520.0)
                .show(ui, |ui| {
                    outcome = form.show(ui, busy);
                });
        });
        if modal.should_close() && !busy && outcome == FlowOutcome::Pending {
            outcome = FlowOutcome::Cancelled;
        }

        match outcome {
            FlowOutcome::Pending => self.form = Some(form),
            FlowOutcome::Cancelled => self.controller.close_dialogs(),
            FlowOutcome::Submitted(draft) => {
                if let Some(cmd) = self.controller.submit(form.target(), draft) {
                    self.dispatch(cmd);
                }
                self.form = Some(form);
            }
        }
    }
}

/// Returns `true` when the card's edit button was clicked.
fn render_event_card(
    ui: &mut egui::Ui,
    card: &EventCard,
    texture: Option<&TextureHandle>,
    slot: Option<&ImageSlot>,
) -> bool {
    let mut edit_clicked = false;

    egui::Frame::NONE
        .fill(CARD_FILL)
        .stroke(egui::Stroke::new(1.0, CARD_STROKE))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.vertical(|ui| {
                let image_size = egui::vec2(CARD_WIDTH, CARD_IMAGE_HEIGHT);
                match (texture, &card.image) {
                    (Some(texture), ImageSource::Remote(_)) => {
                        ui.add(
                            egui::Image::new(texture)
                                .fit_to_exact_size(image_size)
                                .corner_radius(6.0),
                        );
                    }
                    _ => render_image_placeholder(
                        ui,
                        image_size,
                        matches!(slot, Some(ImageSlot::Loading)),
                    ),
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(&card.title).strong().size(16.0));
                        ui.label(egui::RichText::new(&card.location).small().weak());
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                        render_status_badge(ui, &card.status_label, card.status_tone);
                    });
                });

                ui.add_space(6.0);
                ui.label(&card.short_description);
                ui.add_space(6.0);

                egui::Grid::new(("event_card_facts", card.event_id))
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        fact_row(ui, "Date début", &card.start_date);
                        fact_row(ui, "Date fin", &card.end_date);
                        fact_row(ui, "Participants", &card.participants_count.to_string());
                        fact_row(ui, "Max participants", &card.max_participants.to_string());
                    });

                if let Some(conditions) = &card.conditions {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new(CONDITIONS_LABEL).strong().small());
                    ui.label(egui::RichText::new(conditions).small());
                }

                ui.add_space(8.0);
                if ui.button("Modifier").clicked() {
                    edit_clicked = true;
                }
            });
        });

    edit_clicked
}

fn render_image_placeholder(ui: &mut egui::Ui, size: egui::Vec2, loading: bool) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    ui.painter().rect_filled(rect, 6.0, PLACEHOLDER_FILL);
    if loading {
        ui.put(
            egui::Rect::from_center_size(rect.center(), egui::vec2(24.0, 24.0)),
            egui::Spinner::new(),
        );
    } else {
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Aucune image",
            egui::FontId::proportional(13.0),
            ui.visuals().weak_text_color(),
        );
    }
}

fn render_status_badge(ui: &mut egui::Ui, label: &str, tone: BadgeTone) {
    let (fill, text) = badge_colors(tone);
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(label).small().color(text));
        });
}

fn badge_colors(tone: BadgeTone) -> (egui::Color32, egui::Color32) {
    match tone {
        BadgeTone::Positive => (
            egui::Color32::from_rgb(22, 101, 52),
            egui::Color32::from_rgb(220, 252, 231),
        ),
        BadgeTone::Negative => (
            egui::Color32::from_rgb(127, 29, 29),
            egui::Color32::from_rgb(254, 226, 226),
        ),
        BadgeTone::Neutral => (
            egui::Color32::from_rgb(63, 63, 70),
            egui::Color32::from_rgb(228, 228, 231),
        ),
    }
}

fn fact_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(egui::RichText::new(label).small().weak());
    ui.label(egui::RichText::new(value).small());
    ui.end_row();
}

impl eframe::App for EventsDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_navigation(ctx);
        self.show_page(ctx);
        self.show_form_dialog(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl Drop for EventsDashboardApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
