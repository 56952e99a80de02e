use super::*;

fn stored_event(commerce_id: CommerceId) -> Event {
    Event {
        id: EventId::new_random(),
        commerce_id,
        title: "Atelier poterie".to_string(),
        short_description: "Initiation".to_string(),
        image_url: None,
        location: "Nantes".to_string(),
        conditions: Some("Tablier fourni".to_string()),
        max_participants: 12,
        participants_count: 4,
        status: "actif".to_string(),
        start_date: "2024-09-14T09:00:00+02:00".to_string(),
        end_date: "2024-09-14T12:00:00+02:00".to_string(),
        created_at: None,
        updated_at: None,
    }
}

fn filled(flow: &mut EventFormFlow) {
    flow.title = "Dégustation".to_string();
    flow.location = "Dijon".to_string();
    flow.max_participants = "15".to_string();
    flow.start_date = "2024-11-02".to_string();
    flow.end_date = "2024-11-03".to_string();
}

#[test]
fn create_mode_binds_first_owned_commerce_and_draft_status() {
    let first = CommerceId::new_random();
    let second = CommerceId::new_random();
    let flow = EventFormFlow::create(&[first, second]);

    assert_eq!(flow.target(), SaveTarget::Create);
    assert_eq!(flow.editing(), None);
    assert_eq!(flow.commerce_id, Some(first));
    assert_eq!(flow.status, "draft");
}

#[test]
fn create_mode_without_commerce_cannot_submit() {
    let mut flow = EventFormFlow::create(&[]);
    filled(&mut flow);
    assert_eq!(flow.try_submit(), FlowOutcome::Pending);
    assert_eq!(flow.errors(), &[FormError::NoCommerce]);
}

#[test]
fn valid_create_form_produces_trimmed_draft() {
    let commerce = CommerceId::new_random();
    let mut flow = EventFormFlow::create(&[commerce]);
    filled(&mut flow);
    flow.title = "  Dégustation  ".to_string();
    flow.image_url = "   ".to_string();
    flow.conditions = "Majeurs uniquement".to_string();

    let FlowOutcome::Submitted(draft) = flow.try_submit() else {
        panic!("expected a submission, errors: {:?}", flow.errors());
    };
    assert_eq!(draft.commerce_id, commerce);
    assert_eq!(draft.title, "Dégustation");
    assert_eq!(draft.image_url, None);
    assert_eq!(draft.conditions.as_deref(), Some("Majeurs uniquement"));
    assert_eq!(draft.max_participants, 15);
    assert_eq!(draft.status, "draft");
    assert!(flow.errors().is_empty());
}

#[test]
fn edit_mode_prefills_from_event() {
    let commerce = CommerceId::new_random();
    let event = stored_event(commerce);
    let flow = EventFormFlow::edit(&event, &[commerce]);

    assert_eq!(flow.target(), SaveTarget::Update(event.id));
    assert_eq!(flow.title, "Atelier poterie");
    assert_eq!(flow.conditions, "Tablier fourni");
    assert_eq!(flow.max_participants, "12");
    assert_eq!(flow.status, "actif");
    assert_eq!(flow.start_date, "2024-09-14T09:00:00+02:00");
    assert_eq!(flow.end_date, "2024-09-14T12:00:00+02:00");

    let draft = flow.validate().expect("stored event is valid");
    assert_eq!(draft.commerce_id, commerce);
    assert_eq!(draft.status, "actif");
}

#[test]
fn unchanged_edit_keeps_stored_timestamps() {
    let commerce = CommerceId::new_random();
    let event = stored_event(commerce);
    let mut flow = EventFormFlow::edit(&event, &[commerce]);

    let FlowOutcome::Submitted(draft) = flow.try_submit() else {
        panic!("expected a submission, errors: {:?}", flow.errors());
    };
    assert_eq!(draft, EventDraft::from_event(&event));
    assert_eq!(draft.start_date, event.start_date);
    assert_eq!(draft.end_date, event.end_date);
}

#[test]
fn edit_mode_keeps_commerce_missing_from_owned_list() {
    let commerce = CommerceId::new_random();
    let event = stored_event(commerce);
    let flow = EventFormFlow::edit(&event, &[]);
    assert_eq!(flow.commerces, vec![commerce]);
    assert_eq!(flow.commerce_id, Some(commerce));
}

#[test]
fn reports_every_invalid_field() {
    let mut flow = EventFormFlow::create(&[CommerceId::new_random()]);
    flow.max_participants = "-3".to_string();
    flow.start_date = "demain".to_string();

    let errors = flow.validate().expect_err("empty form is invalid");
    assert!(errors.contains(&FormError::MissingTitle));
    assert!(errors.contains(&FormError::MissingLocation));
    assert!(errors.contains(&FormError::InvalidDate {
        field: "Date début"
    }));
    assert!(errors.contains(&FormError::InvalidDate { field: "Date fin" }));
    assert!(errors.contains(&FormError::InvalidCapacity));
}

#[test]
fn end_date_before_start_is_rejected() {
    let mut flow = EventFormFlow::create(&[CommerceId::new_random()]);
    filled(&mut flow);
    flow.start_date = "2024-11-05".to_string();
    flow.end_date = "2024-11-01".to_string();

    assert_eq!(flow.validate(), Err(vec![FormError::EndBeforeStart]));
}

#[test]
fn zero_capacity_is_accepted() {
    let mut flow = EventFormFlow::create(&[CommerceId::new_random()]);
    filled(&mut flow);
    flow.max_participants = "0".to_string();
    let draft = flow.validate().expect("zero means no stated limit");
    assert_eq!(draft.max_participants, 0);
}

#[test]
fn stored_event_without_capacity_can_be_edited() {
    let commerce = CommerceId::new_random();
    let event = Event {
        max_participants: 0,
        ..stored_event(commerce)
    };
    let mut flow = EventFormFlow::edit(&event, &[commerce]);
    assert!(matches!(flow.try_submit(), FlowOutcome::Submitted(_)));
    assert!(flow.errors().is_empty());
}
