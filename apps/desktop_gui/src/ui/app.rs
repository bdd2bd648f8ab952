//! App shell: draws exactly one of the five upload-flow panels per frame
//! and forwards user actions to the controller and the backend worker.

use std::fs;
use std::path::Path;
use std::time::Duration;

use arboard::Clipboard;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_conversion_failure, err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{
    AcceptOutcome, FileCandidate, PreviewToggle, UiState, UploadFlowController,
};
use crate::media::markup::{flatten_markup, MarkupBlock};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            // The conversion service's development default.
            server_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    flow: UploadFlowController,
    status: String,
    server_url: String,
}

/// Only the first file of a multi-file drop is considered; files the
/// windowing layer hands over without a path are ignored.
fn first_dropped_candidate(files: &[egui::DroppedFile]) -> Option<FileCandidate> {
    let file = files.first()?;
    let path = file.path.as_ref()?;
    let mut candidate = candidate_from_path(path);
    if !file.mime.is_empty() {
        candidate.media_type = Some(file.mime.clone());
    }
    Some(candidate)
}

fn candidate_from_path(path: &Path) -> FileCandidate {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
        .to_string();
    let media_type = mime_guess::from_path(path).first_raw().map(str::to_string);
    let size_bytes = fs::metadata(path).map(|meta| meta.len()).ok();
    FileCandidate {
        name,
        path: path.to_path_buf(),
        media_type,
        size_bytes,
    }
}

fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            flow: UploadFlowController::new(),
            status: "Waiting for a document".to_string(),
            server_url: startup.server_url,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ConversionComplete { artifact } => {
                    self.status = format!("Converted to {}", artifact.output_filename);
                    self.flow.conversion_succeeded(artifact);
                }
                UiEvent::PreviewRendered { markup } => {
                    self.flow.preview_rendered(markup);
                }
                UiEvent::PreviewFailed { reason } => {
                    tracing::warn!(reason = %reason, "preview render failed");
                    self.flow.preview_failed();
                }
                UiEvent::Error(err) => {
                    if err.ends_conversion() {
                        self.status = classify_conversion_failure(err.message());
                        self.flow.conversion_failed(err.message().to_string());
                    } else {
                        self.status =
                            format!("{} error: {}", err_label(err.category()), err.message());
                    }
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        if let Some(candidate) = first_dropped_candidate(&dropped) {
            self.accept_candidate(candidate);
        }
    }

    fn accept_candidate(&mut self, candidate: FileCandidate) {
        let name = candidate.name.clone();
        match self.flow.accept_file(candidate) {
            AcceptOutcome::Accepted => {
                self.status = format!("Selected {name}");
            }
            AcceptOutcome::RejectedMediaType | AcceptOutcome::RejectedOversized => {
                self.status = format!("Rejected {name}");
            }
            AcceptOutcome::Ignored => {}
        }
    }

    fn open_file_picker(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF documents", &["pdf"])
            .pick_file()
        {
            let candidate = candidate_from_path(&path);
            self.accept_candidate(candidate);
        }
    }

    fn start_conversion(&mut self) {
        let Some(file) = self.flow.selected_file().cloned() else {
            return;
        };
        if self.flow.begin_conversion() {
            self.status = format!("Converting {}...", file.name);
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::Convert {
                    path: file.path,
                    filename: file.name,
                    media_type: Some(file.media_type),
                },
                &mut self.status,
            );
        }
    }

    fn toggle_preview(&mut self) {
        match self.flow.toggle_preview() {
            PreviewToggle::RenderRequested => {
                if let Some(artifact) = self.flow.artifact() {
                    let bytes = artifact.bytes.clone();
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::RenderPreview { bytes },
                        &mut self.status,
                    );
                }
            }
            PreviewToggle::Closed | PreviewToggle::Unavailable => {}
        }
    }

    fn save_artifact_as(&mut self) {
        let Some(artifact) = self.flow.artifact() else {
            return;
        };
        let bytes = artifact.bytes.clone();
        let suggested_name = artifact.output_filename.clone();
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&suggested_name)
            .save_file()
        {
            match fs::write(&path, bytes) {
                Ok(()) => {
                    self.status = format!("Saved document to {}", path.display());
                }
                Err(err) => {
                    self.status = format!("Failed to save document: {err}");
                }
            }
        }
    }

    fn copy_download_link(&mut self) {
        let Some(artifact) = self.flow.artifact() else {
            return;
        };
        let link = artifact.download_url.clone();
        match Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(link) {
                Ok(()) => self.status = "Copied download link to clipboard".to_string(),
                Err(err) => self.status = format!("Failed to copy download link: {err}"),
            },
            Err(err) => self.status = format!("Clipboard unavailable: {err}"),
        }
    }

    fn show_notice_banner(&mut self, ui: &mut egui::Ui) {
        let Some(notice) = self.flow.notice().map(str::to_string) else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 83, 43))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 140, 86)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&notice).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.flow.dismiss_notice();
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn panel_card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        let avail = ui.available_size();
        let card_width = avail.x.clamp(380.0, 540.0);
        ui.add_space((avail.y * 0.12).clamp(12.0, 72.0));
        ui.vertical_centered(|ui| {
            ui.set_width(card_width);
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .corner_radius(12.0)
                .stroke(egui::Stroke::new(
                    1.0,
                    ui.visuals().widgets.noninteractive.bg_stroke.color,
                ))
                .inner_margin(egui::Margin::symmetric(20, 18))
                .show(ui, |ui| {
                    ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                    add_contents(ui);
                });
        });
    }

    fn show_upload_panel(&mut self, ui: &mut egui::Ui) {
        let hovering_files = ui.ctx().input(|input| !input.raw.hovered_files.is_empty());
        let mut browse_clicked = false;
        Self::panel_card(ui, |ui| {
            let stroke_color = if hovering_files {
                ui.visuals().selection.bg_fill
            } else {
                ui.visuals().widgets.noninteractive.bg_stroke.color
            };
            egui::Frame::NONE
                .stroke(egui::Stroke::new(1.5, stroke_color))
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(16, 28))
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new("📄").size(36.0));
                        ui.heading("Drag & drop your PDF here");
                        ui.weak("or");
                        if ui.button("Browse Files").clicked() {
                            browse_clicked = true;
                        }
                    });
                });
            ui.vertical_centered(|ui| {
                ui.small("Only PDF documents up to 100 MB are accepted.");
            });
        });
        if browse_clicked {
            self.open_file_picker();
        }
    }

    fn show_file_chosen_panel(&mut self, ui: &mut egui::Ui) {
        let Some(file) = self.flow.selected_file().cloned() else {
            return;
        };
        let size_text = fs::metadata(&file.path)
            .map(|meta| human_readable_bytes(meta.len()))
            .unwrap_or_default();

        let mut remove_clicked = false;
        let mut convert_clicked = false;
        Self::panel_card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📄").size(20.0));
                ui.label(egui::RichText::new(&file.name).strong());
                if !size_text.is_empty() {
                    ui.weak(&size_text);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕").on_hover_text("Remove file").clicked() {
                        remove_clicked = true;
                    }
                });
            });
            ui.separator();
            ui.vertical_centered(|ui| {
                let convert = egui::Button::new(
                    egui::RichText::new("Convert to DOCX").strong().size(16.0),
                )
                .min_size(egui::vec2(ui.available_width(), 36.0));
                if ui.add(convert).clicked() {
                    convert_clicked = true;
                }
            });
        });

        if remove_clicked {
            self.flow.remove_file();
            self.status = "Waiting for a document".to_string();
        } else if convert_clicked {
            self.start_conversion();
        }
    }

    fn show_processing_panel(&mut self, ui: &mut egui::Ui) {
        Self::panel_card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add(egui::Spinner::new().size(28.0));
                ui.heading("Converting your document...");
                ui.weak("This may take a moment for large files.");
            });
        });
    }

    fn show_success_panel(&mut self, ui: &mut egui::Ui) {
        let Some(artifact) = self.flow.artifact() else {
            return;
        };
        let output_filename = artifact.output_filename.clone();
        let preview_blocks = self
            .flow
            .preview()
            .map(|markup| flatten_markup(&markup.value));
        let toggle_label = self.flow.preview_toggle_label();
        let preview_pending = self.flow.preview_pending();

        let mut save_clicked = false;
        let mut toggle_clicked = false;
        let mut copy_clicked = false;
        let mut reset_clicked = false;
        Self::panel_card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("✔")
                        .size(28.0)
                        .color(egui::Color32::from_rgb(97, 175, 110)),
                );
                ui.heading("Conversion complete");
                ui.label(egui::RichText::new(&output_filename).strong());
            });
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                if ui
                    .button(egui::RichText::new("Save As...").strong())
                    .clicked()
                {
                    save_clicked = true;
                }
                if ui.button(toggle_label).clicked() {
                    toggle_clicked = true;
                }
                if ui.button("Copy Link").clicked() {
                    copy_clicked = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Convert Another").clicked() {
                        reset_clicked = true;
                    }
                });
            });

            if preview_pending {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new().size(14.0));
                    ui.weak("Rendering preview...");
                });
            }

            if let Some(blocks) = &preview_blocks {
                ui.separator();
                egui::Frame::NONE
                    .fill(ui.visuals().extreme_bg_color)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                            ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                                if blocks.is_empty() {
                                    ui.weak("The document has no previewable text.");
                                }
                                for block in blocks {
                                    Self::show_markup_block(ui, block);
                                }
                            });
                        });
                    });
            }
        });

        if save_clicked {
            self.save_artifact_as();
        } else if toggle_clicked {
            self.toggle_preview();
        } else if copy_clicked {
            self.copy_download_link();
        } else if reset_clicked {
            self.flow.reset();
            self.status = "Waiting for a document".to_string();
        }
    }

    fn show_markup_block(ui: &mut egui::Ui, block: &MarkupBlock) {
        match block {
            MarkupBlock::Heading { level, text } => {
                let size = match level {
                    1 => 20.0,
                    2 => 18.0,
                    _ => 16.0,
                };
                ui.label(egui::RichText::new(text).strong().size(size));
            }
            MarkupBlock::Paragraph(text) => {
                ui.label(text);
            }
            MarkupBlock::ListItem(text) => {
                ui.label(format!("• {text}"));
            }
        }
        ui.add_space(2.0);
    }

    fn show_error_panel(&mut self, ui: &mut egui::Ui) {
        let message = self.flow.error_message().to_string();
        let mut retry_clicked = false;
        Self::panel_card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("✖")
                        .size(28.0)
                        .color(egui::Color32::from_rgb(222, 108, 108)),
                );
                ui.heading("Conversion failed");
                ui.label(&message);
                ui.add_space(4.0);
                if ui
                    .button(egui::RichText::new("Try Again").strong())
                    .clicked()
                {
                    retry_clicked = true;
                }
            });
        });
        if retry_clicked {
            self.flow.reset();
            self.status = "Waiting for a document".to_string();
        }
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(&self.server_url).weak());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.show_notice_banner(ui);
            match self.flow.state() {
                UiState::Idle => self.show_upload_panel(ui),
                UiState::FileChosen => self.show_file_chosen_panel(ui),
                UiState::Processing => self.show_processing_panel(ui),
                UiState::Success => self.show_success_panel(ui),
                UiState::Error => self.show_error_panel(ui),
            }
        });

        // Backend completions arrive between frames; poll faster while
        // work is outstanding.
        if self.flow.state() == UiState::Processing || self.flow.preview_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn only_the_first_dropped_file_is_considered() {
        let files = vec![
            egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/report.pdf")),
                ..Default::default()
            },
            egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/second.pdf")),
                ..Default::default()
            },
        ];

        let candidate = first_dropped_candidate(&files).expect("candidate");
        assert_eq!(candidate.name, "report.pdf");
        assert_eq!(candidate.media_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn declared_mime_wins_over_the_extension_guess() {
        let files = vec![egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/fake.pdf")),
            mime: "image/png".to_string(),
            ..Default::default()
        }];

        let candidate = first_dropped_candidate(&files).expect("candidate");
        assert_eq!(candidate.media_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn drops_without_a_path_are_ignored() {
        assert!(first_dropped_candidate(&[egui::DroppedFile::default()]).is_none());
        assert!(first_dropped_candidate(&[]).is_none());
    }

    #[test]
    fn byte_counts_format_compactly() {
        assert_eq!(human_readable_bytes(512), "512 B");
        assert_eq!(human_readable_bytes(2048), "2.0 KB");
        assert_eq!(human_readable_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
