//! Backend worker: a dedicated thread driving a tokio runtime that serves
//! commands from the UI queue and reports back through the event queue.

use std::{sync::Arc, thread};

use client_core::{
    config::{open_backend, BackendSelection},
    load_events, EventStore, EventsWriter, LoadError, LoadErrorKind,
};
use crossbeam_channel::{Receiver, Sender};
use reqwest::Client as HttpClient;
use tokio::task::AbortHandle;

use crate::backend_bridge::commands::{BackendCommand, SaveTarget};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::PreviewImage;

const PREVIEW_MAX_EDGE: u32 = 640;

pub fn launch(
    selection: BackendSelection,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Connexion au service...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let backend = match open_backend(&selection).await {
                Ok(backend) => backend,
                Err(err) => {
                    tracing::error!("backend startup failed: {err:#}");
                    let _ = ui_tx.try_send(UiEvent::WorkerFailed(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("{err:#}"),
                    )));
                    return;
                }
            };
            let http = HttpClient::new();
            let _ = ui_tx.try_send(UiEvent::Info("Service prêt".to_string()));

            serve(backend, http, cmd_rx, ui_tx).await;
        });
        tracing::info!("backend worker stopped");
    })
}

async fn serve(
    backend: Arc<dyn EventStore>,
    http: HttpClient,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let mut load_task: Option<AbortHandle> = None;

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::LoadEvents { ticket } => {
                if let Some(previous) = load_task.take() {
                    previous.abort();
                }
                let backend = Arc::clone(&backend);
                let load = tokio::spawn(async move { load_events(backend.as_ref()).await });
                load_task = Some(load.abort_handle());

                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let outcome = match load.await {
                        Ok(outcome) => outcome,
                        Err(err) if err.is_cancelled() => {
                            tracing::debug!("superseded events load cancelled");
                            return;
                        }
                        Err(err) => {
                            tracing::error!(stage = "unexpected", "events load task failed: {err}");
                            Err(LoadError::new(LoadErrorKind::Unexpected, err.to_string()))
                        }
                    };
                    let _ = ui_tx.try_send(UiEvent::EventsLoaded { ticket, outcome });
                });
            }
            BackendCommand::SaveEvent { target, draft } => {
                let backend = Arc::clone(&backend);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let result = match target {
                        SaveTarget::Create => backend.create_event(&draft).await,
                        SaveTarget::Update(event_id) => {
                            backend.update_event(event_id, &draft).await
                        }
                    };
                    let event = match result {
                        Ok(saved) => {
                            tracing::info!(event_id = %saved.id, "event saved");
                            UiEvent::EventSaved { target }
                        }
                        Err(err) => UiEvent::EventSaveFailed(UiError::from_message(
                            UiErrorContext::SaveEvent,
                            err.to_string(),
                        )),
                    };
                    let _ = ui_tx.try_send(event);
                });
            }
            BackendCommand::FetchEventImage { event_id, url } => {
                let http = http.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = match fetch_event_image(&http, &url).await {
                        Ok(image) => UiEvent::EventImageLoaded { event_id, image },
                        Err(reason) => UiEvent::EventImageFailed { event_id, reason },
                    };
                    let _ = ui_tx.try_send(event);
                });
            }
            BackendCommand::Shutdown => break,
        }
    }

    if let Some(load) = load_task.take() {
        load.abort();
    }
}

async fn fetch_event_image(http: &HttpClient, url: &str) -> Result<PreviewImage, String> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| err.to_string())?;
    let bytes = response.bytes().await.map_err(|err| err.to_string())?;
    decode_preview_image(&bytes)
}

pub(crate) fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let fitted = if dynamic.width() > PREVIEW_MAX_EDGE || dynamic.height() > PREVIEW_MAX_EDGE {
        dynamic.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
    } else {
        dynamic
    };
    let resized = fitted.to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
