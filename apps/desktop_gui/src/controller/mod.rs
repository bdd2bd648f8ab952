//! Controller layer: UI events, the upload-flow reducer, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
