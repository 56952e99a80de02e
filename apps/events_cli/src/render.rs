//! Plain-text rendering of the events page.

use std::fmt::Write as _;

use client_core::{
    events_page::CONDITIONS_LABEL, EventCard, ImageSource, PageView, PLACEHOLDER_IMAGE,
};

pub fn render_page(view: &PageView) -> String {
    let mut out = String::from("Événements\nGérez vos événements et ateliers\n\n");
    match view {
        PageView::Loading => out.push_str("Chargement des événements...\n"),
        PageView::Empty => {
            out.push_str("Aucun événement\n");
            out.push_str("Vous n'avez pas encore créé d'événements pour vos commerces.\n");
        }
        PageView::Cards(cards) => {
            for (index, card) in cards.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                render_card(&mut out, card);
            }
        }
    }
    out
}

fn render_card(out: &mut String, card: &EventCard) {
    let image = match &card.image {
        ImageSource::Remote(url) => url.as_str(),
        ImageSource::Placeholder => PLACEHOLDER_IMAGE,
    };

    let _ = writeln!(out, "[{}] {}", card.status_label, card.title);
    let _ = writeln!(out, "  Lieu: {}", card.location);
    let _ = writeln!(out, "  Image: {image}");
    if !card.short_description.is_empty() {
        let _ = writeln!(out, "  {}", card.short_description);
    }
    let _ = writeln!(out, "  Date début: {}", card.start_date);
    let _ = writeln!(out, "  Date fin: {}", card.end_date);
    let _ = writeln!(out, "  Participants: {}", card.participants_count);
    let _ = writeln!(out, "  Max participants: {}", card.max_participants);
    if let Some(conditions) = &card.conditions {
        let _ = writeln!(out, "  {CONDITIONS_LABEL} {conditions}");
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
