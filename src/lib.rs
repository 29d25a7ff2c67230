//! mkvstrip - strip Matroska files down to one audio and subtitle language
//!
//! This library crate exposes the batch layer for integration testing; the
//! track engine itself lives in `mkvstrip-av`.

pub mod batch;
pub mod config;
pub mod listing;
pub mod report;
