//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker owns a tokio runtime on its own thread and processes one
//! command at a time, so the convert and artifact-fetch requests of a
//! single conversion are sequential and no two conversions overlap.

use std::sync::Arc;
use std::thread;

use client_core::{
    ConversionClient, DocumentRenderer, DocumentUpload, MissingDocumentRenderer,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    launch_with_renderer(
        server_url,
        Arc::new(MissingDocumentRenderer),
        cmd_rx,
        ui_tx,
    );
}

/// Variant used when a document renderer has been integrated; `launch`
/// wires the missing-renderer default.
pub fn launch_with_renderer(
    server_url: String,
    renderer: Arc<dyn DocumentRenderer>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = ConversionClient::new(server_url);
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Convert {
                        path,
                        filename,
                        media_type,
                    } => {
                        tracing::info!(filename = %filename, "backend: convert");
                        let bytes = match tokio::fs::read(&path).await {
                            Ok(bytes) => bytes,
                            Err(err) => {
                                tracing::error!(
                                    "backend: could not read '{}': {err}",
                                    path.display()
                                );
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Convert,
                                    format!("could not read {}: {err}", path.display()),
                                )));
                                continue;
                            }
                        };

                        match client
                            .convert(DocumentUpload {
                                filename,
                                media_type,
                                bytes,
                            })
                            .await
                        {
                            Ok(artifact) => {
                                let _ =
                                    ui_tx.try_send(UiEvent::ConversionComplete { artifact });
                            }
                            Err(err) => {
                                tracing::error!("backend: convert failed: {err}");
                                let context = if err.is_artifact_fetch() {
                                    UiErrorContext::FetchArtifact
                                } else {
                                    UiErrorContext::Convert
                                };
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    context,
                                    err.user_message(),
                                )));
                            }
                        }
                    }
                    BackendCommand::RenderPreview { bytes } => {
                        tracing::info!(size_bytes = bytes.len(), "backend: render_preview");
                        match renderer.render(&bytes).await {
                            Ok(markup) => {
                                for message in &markup.messages {
                                    tracing::warn!(message = %message, "renderer note");
                                }
                                let _ = ui_tx.try_send(UiEvent::PreviewRendered { markup });
                            }
                            Err(err) => {
                                tracing::warn!("backend: preview render failed: {err:#}");
                                let _ = ui_tx.try_send(UiEvent::PreviewFailed {
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        });
    });
}
