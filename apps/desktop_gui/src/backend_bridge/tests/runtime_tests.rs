use super::*;

use std::{io::Cursor, time::Duration};

use client_core::{EventsListPage, LoadErrorKind};
use crossbeam_channel::bounded;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

#[test]
fn decodes_small_png_at_native_size() {
    let preview = decode_preview_image(&png_bytes(4, 3)).expect("decode");
    assert_eq!((preview.width, preview.height), (4, 3));
    assert_eq!(preview.rgba.len(), 4 * 3 * 4);
    assert_eq!(&preview.rgba[..4], &[10, 20, 30, 255]);
}

#[test]
fn large_images_are_downscaled() {
    let preview = decode_preview_image(&png_bytes(1280, 640)).expect("decode");
    assert_eq!(preview.width, PREVIEW_MAX_EDGE as usize);
    assert_eq!(preview.height, (PREVIEW_MAX_EDGE / 2) as usize);
}

#[test]
fn garbage_bytes_are_reported() {
    assert!(decode_preview_image(b"not an image").is_err());
}

#[test]
fn worker_answers_load_for_signed_out_local_profile() {
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(32);
    let worker = launch(
        BackendSelection::Local {
            database_url: "sqlite::memory:".to_string(),
            profile_id: None,
        },
        cmd_rx,
        ui_tx,
    );

    let ticket = EventsListPage::new().begin_load();
    cmd_tx
        .send(BackendCommand::LoadEvents { ticket })
        .expect("queue load");

    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    let outcome = loop {
        let remaining = deadline.saturating_duration_since(std::time::Instant::now());
        match ui_rx.recv_timeout(remaining).expect("worker event") {
            UiEvent::EventsLoaded {
                ticket: got,
                outcome,
            } => {
                assert_eq!(got, ticket);
                break outcome;
            }
            UiEvent::WorkerFailed(err) => panic!("worker failed: {}", err.message()),
            _ => continue,
        }
    };
    let err = outcome.expect_err("no signed-in profile");
    assert_eq!(err.kind, LoadErrorKind::Unauthenticated);

    cmd_tx.send(BackendCommand::Shutdown).expect("queue shutdown");
    worker.join().expect("worker exits");
}
