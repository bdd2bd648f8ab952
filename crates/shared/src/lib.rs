//! Types shared between the conversion client crate and the desktop GUI.

pub mod domain;
pub mod protocol;
