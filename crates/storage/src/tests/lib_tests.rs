use super::*;

fn draft(commerce_id: CommerceId, title: &str) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        location: "Nantes".to_string(),
        max_participants: 10,
        status: "actif".to_string(),
        start_date: "2024-06-01T09:00:00+00:00".to_string(),
        end_date: "2024-06-01T17:00:00+00:00".to_string(),
        ..EventDraft::empty(commerce_id)
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("commerce_events_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn create_profile_is_idempotent_per_email() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage.create_profile("marie@example.com").await.expect("profile");
    let second = storage.create_profile("marie@example.com").await.expect("profile");
    assert_eq!(first, second);
    assert!(storage.profile_exists(first).await.expect("exists"));
    assert!(!storage
        .profile_exists(ProfileId::new_random())
        .await
        .expect("exists"));
}

#[tokio::test]
async fn lists_only_commerces_owned_by_profile() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let alice = storage.create_profile("alice@example.com").await.expect("alice");
    let bob = storage.create_profile("bob@example.com").await.expect("bob");
    let bakery = storage.create_commerce(alice, "Boulangerie").await.expect("commerce");
    let florist = storage.create_commerce(alice, "Fleuriste").await.expect("commerce");
    storage.create_commerce(bob, "Garage").await.expect("commerce");

    let owned = storage
        .list_commerce_ids_for_profile(alice)
        .await
        .expect("commerces");
    assert_eq!(owned, vec![bakery, florist]);
}

#[tokio::test]
async fn lists_events_of_given_commerces_in_insertion_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let alice = storage.create_profile("alice@example.com").await.expect("alice");
    let bob = storage.create_profile("bob@example.com").await.expect("bob");
    let bakery = storage.create_commerce(alice, "Boulangerie").await.expect("commerce");
    let florist = storage.create_commerce(alice, "Fleuriste").await.expect("commerce");
    let garage = storage.create_commerce(bob, "Garage").await.expect("commerce");

    let first = storage.insert_event(&draft(florist, "Bouquets")).await.expect("event");
    storage.insert_event(&draft(garage, "Vidange")).await.expect("event");
    let second = storage.insert_event(&draft(bakery, "Pain au levain")).await.expect("event");
    let third = storage.insert_event(&draft(florist, "Couronnes")).await.expect("event");

    let events = storage
        .list_events_for_commerces(&[bakery, florist])
        .await
        .expect("events");
    let ids: Vec<_> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
    assert!(events.iter().all(|e| e.commerce_id != garage));
}

#[tokio::test]
async fn empty_commerce_set_yields_no_events() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let events = storage.list_events_for_commerces(&[]).await.expect("events");
    assert!(events.is_empty());
}

#[tokio::test]
async fn insert_and_update_round_trip_event_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let owner = storage.create_profile("owner@example.com").await.expect("owner");
    let commerce = storage.create_commerce(owner, "Atelier").await.expect("commerce");

    let created = storage.insert_event(&draft(commerce, "Initiation")).await.expect("insert");
    assert_eq!(created.participants_count, 0);
    assert_eq!(created.status, "actif");
    assert!(created.created_at.is_some());
    assert!(created.image_url.is_none());

    let mut changes = EventDraft::from_event(&created);
    changes.title = "Initiation avancée".to_string();
    changes.conditions = Some("Tablier fourni".to_string());
    changes.status = "inactif".to_string();
    let updated = storage
        .update_event(created.id, &changes)
        .await
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.title, "Initiation avancée");
    assert_eq!(updated.conditions.as_deref(), Some("Tablier fourni"));
    assert_eq!(updated.status, "inactif");

    assert!(storage
        .set_participants_count(created.id, 4)
        .await
        .expect("participants"));
    let reloaded = storage.load_event(created.id).await.expect("load").expect("row");
    assert_eq!(reloaded.participants_count, 4);
}

#[tokio::test]
async fn update_of_unknown_event_returns_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let owner = storage.create_profile("owner@example.com").await.expect("owner");
    let commerce = storage.create_commerce(owner, "Atelier").await.expect("commerce");
    let missing = storage
        .update_event(EventId::new_random(), &draft(commerce, "Fantôme"))
        .await
        .expect("update");
    assert!(missing.is_none());
}
