//! Bridge between the UI command queue and the backend worker runtime.

pub mod commands;
pub mod runtime;
