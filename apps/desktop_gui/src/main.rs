mod backend_bridge;
mod controller;
mod media;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{DesktopGuiApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Desktop client for the PDF to DOCX conversion service")]
struct Args {
    /// Base URL of the conversion service.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(args.server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDF to DOCX")
            .with_inner_size([760.0, 580.0])
            .with_min_inner_size([540.0, 440.0]),
        ..Default::default()
    };
    eframe::run_native(
        "PDF to DOCX",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DesktopGuiApp::new(
                cmd_tx,
                ui_rx,
                StartupConfig {
                    server_url: args.server_url,
                },
            )))
        }),
    )
}
