//! Display-side decoding of collaborator output for the preview region.

pub mod markup;
