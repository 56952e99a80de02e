use super::dispatch_backend_command;

use crossbeam_channel::bounded;
use shared::domain::EventId;

use crate::backend_bridge::commands::{BackendCommand, CommandKey};

#[test]
fn queued_command_reaches_the_worker() {
    let (tx, rx) = bounded(1);
    let mut status = String::new();
    assert_eq!(
        dispatch_backend_command(&tx, BackendCommand::Shutdown, &mut status),
        Ok(())
    );
    assert!(status.is_empty());
    assert!(matches!(rx.try_recv(), Ok(BackendCommand::Shutdown)));
}

#[test]
fn full_queue_reports_status_and_returns_the_key() {
    let (tx, _rx) = bounded(1);
    let mut status = String::new();
    let event_id = EventId::new_random();
    dispatch_backend_command(&tx, BackendCommand::Shutdown, &mut status).expect("queued");

    let rejected = dispatch_backend_command(
        &tx,
        BackendCommand::FetchEventImage {
            event_id,
            url: "https://cdn.example.com/a.png".to_string(),
        },
        &mut status,
    );

    assert_eq!(rejected, Err(CommandKey::Image(event_id)));
    assert_eq!(status, "File de commandes pleine, réessayez");
}

#[test]
fn disconnected_worker_reports_status() {
    let (tx, rx) = bounded::<BackendCommand>(1);
    drop(rx);
    let mut status = String::new();
    assert_eq!(
        dispatch_backend_command(&tx, BackendCommand::Shutdown, &mut status),
        Err(CommandKey::Shutdown)
    );
    assert_eq!(status, "Service d'arrière-plan arrêté");
}
