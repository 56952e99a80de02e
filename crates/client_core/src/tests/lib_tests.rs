use super::*;
use shared::domain::EventDraft;
use std::sync::Mutex;

#[derive(Clone)]
enum Scripted<T> {
    Ok(T),
    Unauthorized,
    Http(u16),
    Malformed,
}

impl<T: Clone> Scripted<T> {
    fn result(&self) -> Result<T, BackendError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Unauthorized => Err(BackendError::Unauthorized),
            Self::Http(status) => Err(BackendError::Api {
                status: *status,
                error: ApiError::from_response(*status, "boom"),
            }),
            Self::Malformed => Err(BackendError::Decode("expected array".to_string())),
        }
    }
}

struct FakeBackend {
    user: Scripted<Option<AuthUser>>,
    commerces: Scripted<Vec<CommerceId>>,
    events: Scripted<Option<Vec<Event>>>,
    calls: Mutex<Vec<&'static str>>,
    seen_commerce_filter: Mutex<Vec<CommerceId>>,
}

impl FakeBackend {
    fn signed_in(commerces: Vec<CommerceId>, events: Option<Vec<Event>>) -> Self {
        Self {
            user: Scripted::Ok(Some(AuthUser {
                id: ProfileId::new_random(),
                email: Some("owner@example.com".to_string()),
            })),
            commerces: Scripted::Ok(commerces),
            events: Scripted::Ok(events),
            calls: Mutex::new(Vec::new()),
            seen_commerce_filter: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl EventsBackend for FakeBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        self.calls.lock().expect("calls lock").push("user");
        self.user.result()
    }

    async fn owned_commerce_ids(
        &self,
        _profile_id: ProfileId,
    ) -> Result<Vec<CommerceId>, BackendError> {
        self.calls.lock().expect("calls lock").push("commerces");
        self.commerces.result()
    }

    async fn events_for_commerces(
        &self,
        commerce_ids: &[CommerceId],
    ) -> Result<Option<Vec<Event>>, BackendError> {
        self.calls.lock().expect("calls lock").push("events");
        *self.seen_commerce_filter.lock().expect("filter lock") = commerce_ids.to_vec();
        self.events.result()
    }
}

pub(crate) fn sample_event(commerce_id: CommerceId, title: &str, status: &str) -> Event {
    Event {
        id: EventId::new_random(),
        commerce_id,
        title: title.to_string(),
        short_description: format!("{title} description"),
        image_url: None,
        location: "Bordeaux".to_string(),
        conditions: None,
        max_participants: 20,
        participants_count: 3,
        status: status.to_string(),
        start_date: "2024-10-02T14:00:00+00:00".to_string(),
        end_date: "2024-10-03T18:00:00+00:00".to_string(),
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn loads_events_of_all_owned_commerces_in_query_order() {
    let first = CommerceId::new_random();
    let second = CommerceId::new_random();
    let events = vec![
        sample_event(second, "Yoga", "actif"),
        sample_event(first, "Brunch", "draft"),
        sample_event(second, "Concert", "inactif"),
    ];
    let backend = FakeBackend::signed_in(vec![first, second], Some(events.clone()));

    let owned = load_events(&backend).await.expect("load succeeds");

    assert_eq!(owned.events, events);
    assert_eq!(owned.commerce_ids, vec![first, second]);
    assert_eq!(backend.calls(), vec!["user", "commerces", "events"]);
    assert_eq!(
        *backend.seen_commerce_filter.lock().expect("filter lock"),
        vec![first, second]
    );
}

#[tokio::test]
async fn zero_commerces_is_an_empty_success_without_event_query() {
    let backend = FakeBackend::signed_in(Vec::new(), Some(Vec::new()));

    let owned = load_events(&backend).await.expect("no commerces is not an error");

    assert!(owned.events.is_empty());
    assert_eq!(backend.calls(), vec!["user", "commerces"]);
}

#[tokio::test]
async fn absent_event_result_becomes_empty_list() {
    let backend = FakeBackend::signed_in(vec![CommerceId::new_random()], None);

    let owned = load_events(&backend).await.expect("null result is not an error");

    assert!(owned.events.is_empty());
}

#[tokio::test]
async fn missing_identity_stops_before_any_query() {
    let mut backend = FakeBackend::signed_in(vec![CommerceId::new_random()], None);
    backend.user = Scripted::Ok(None);

    let err = load_events(&backend).await.expect_err("no identity");

    assert_eq!(err.kind, LoadErrorKind::Unauthenticated);
    assert_eq!(backend.calls(), vec!["user"]);
}

#[tokio::test]
async fn identity_failure_is_an_authentication_error() {
    let mut backend = FakeBackend::signed_in(vec![CommerceId::new_random()], None);
    backend.user = Scripted::Unauthorized;

    let err = load_events(&backend).await.expect_err("auth failure");

    assert_eq!(err.kind, LoadErrorKind::Authentication);
    assert_eq!(err.kind.stage(), "authentication");
    assert_eq!(backend.calls(), vec!["user"]);
}

#[tokio::test]
async fn commerce_query_failure_stops_the_sequence() {
    let mut backend = FakeBackend::signed_in(Vec::new(), None);
    backend.commerces = Scripted::Http(500);

    let err = load_events(&backend).await.expect_err("commerce failure");

    assert_eq!(err.kind, LoadErrorKind::CommerceQuery);
    assert!(err.message.contains("500"));
    assert_eq!(backend.calls(), vec!["user", "commerces"]);
}

#[tokio::test]
async fn event_query_failure_is_tagged() {
    let mut backend = FakeBackend::signed_in(vec![CommerceId::new_random()], None);
    backend.events = Scripted::Http(400);

    let err = load_events(&backend).await.expect_err("event failure");

    assert_eq!(err.kind, LoadErrorKind::EventQuery);
}

#[tokio::test]
async fn malformed_payload_is_unexpected() {
    let mut backend = FakeBackend::signed_in(vec![CommerceId::new_random()], None);
    backend.events = Scripted::Malformed;

    let err = load_events(&backend).await.expect_err("decode failure");

    assert_eq!(err.kind, LoadErrorKind::Unexpected);
}

#[test]
fn draft_serializes_without_database_owned_fields() {
    let draft = EventDraft::empty(CommerceId::new_random());
    let value = serde_json::to_value(&draft).expect("json");
    assert!(value.get("participants_count").is_none());
    assert!(value.get("id").is_none());
    assert!(value.get("image_url").is_none());
    assert_eq!(value["status"], "draft");
}
