use shared::{domain::EventDraft, format::format_event_date};
use storage::Storage;

#[tokio::test]
async fn owner_sees_events_of_all_owned_commerces_and_nothing_else() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    let owner = storage.create_profile("owner@example.com").await.expect("owner");
    let stranger = storage
        .create_profile("stranger@example.com")
        .await
        .expect("stranger");
    let cafe = storage.create_commerce(owner, "Café").await.expect("cafe");
    let shop = storage.create_commerce(owner, "Boutique").await.expect("shop");
    let other = storage.create_commerce(stranger, "Ailleurs").await.expect("other");

    for (commerce_id, title) in [(cafe, "Latte art"), (other, "Caché"), (shop, "Soldes")] {
        storage
            .insert_event(&EventDraft {
                title: title.to_string(),
                status: "active".to_string(),
                start_date: "2024-09-10T18:00:00+02:00".to_string(),
                end_date: "2024-09-11T01:00:00+02:00".to_string(),
                ..EventDraft::empty(commerce_id)
            })
            .await
            .expect("event");
    }

    let owned = storage
        .list_commerce_ids_for_profile(owner)
        .await
        .expect("owned");
    let events = storage
        .list_events_for_commerces(&owned)
        .await
        .expect("events");

    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Latte art", "Soldes"]);
    assert_eq!(format_event_date(&events[0].start_date), "10/09/2024");
    assert_eq!(format_event_date(&events[0].end_date), "11/09/2024");
}
