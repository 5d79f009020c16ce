//! Pipeline stages for one paper review.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. another analysis backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ gemini ──▶ extract ──▶ render
//! (PDF path) (base64)  (API call)  (text)     (HTML)
//! ```
//!
//! 1. [`input`]   — validate the user-supplied PDF and read its bytes
//! 2. [`encode`]  — wrap the bytes as a base64 `inline_data` request part
//! 3. [`gemini`]  — build the request and drive the single API exchange;
//!    the only stage with network I/O
//! 4. [`extract`] — walk the response structure down to the report text,
//!    degrading to fixed fallback messages instead of failing
//! 5. [`render`]  — Markdown → sanitized HTML for display
//!
//! Table extraction is not a stage here: it runs on the extracted text and
//! lives in [`crate::table`] next to the CSV encoder it feeds.

pub mod encode;
pub mod extract;
pub mod gemini;
pub mod input;
pub mod render;
