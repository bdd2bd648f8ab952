//! UI layer for the desktop GUI: app shell and the upload-flow panels.

pub mod app;

pub use app::{DesktopGuiApp, StartupConfig};
