//! Pipeline stages from picked photo to server reply.
//!
//! Each submodule implements one step and is independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! photo ──▶ encode ──▶ client
//! (decode)  (base64)   (POST + reply decode)
//! ```
//!
//! 1. [`photo`]  — load a picked image from disk or memory
//! 2. [`encode`] — PNG-encode, base64-wrap into the text the server expects
//! 3. [`client`] — one POST of the JSON body and a lenient decode of the
//!    reply; the only stage with network I/O

pub mod client;
pub mod encode;
pub mod photo;
