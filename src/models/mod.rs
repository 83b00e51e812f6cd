//! Wire types for the upstream APIs.
//!
//! - `gemini`: Gemini `generateContent` request/response bodies.
//! - `translation`: MyMemory translation response body.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod gemini;
pub mod translation;
