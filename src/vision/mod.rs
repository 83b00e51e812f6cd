//! Image intake for the analysis pipeline.
//!
//! This module owns everything that happens to an image before it reaches
//! the vision endpoint: extension → MIME mapping, upload allow-listing and
//! size limits, filename sanitizing, magic-byte sniffing and base64 encoding
//! into Gemini's `inline_data` part.
//!
//! # Submodules
//!
//! - `models`: Image formats and validation constraints.
//! - `intake`: Upload validation, storage and encoding.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod intake;
pub mod models;

pub use intake::{encode_inline_data, sanitize_filename, store_upload, validate_upload};
pub use models::ImageFormat;
