//! Pipeline stages for contract risk analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets tests replace the one
//! stage with network I/O (the model call) with a stub.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ prompts ──▶ model ──▶ validate
//! (pdf-extract) (delimited)  (Gemini)  (schema + drop policy)
//! ```
//!
//! 1. [`extract`]  — PDF bytes to plain text; runs in `spawn_blocking`
//!    because pdf-extract is synchronous and CPU-bound
//! 2. [`crate::prompts`] — embed the text in the fixed instruction template
//! 3. [`model`]    — one HTTPS call to the Gemini generation endpoint; the
//!    only stage with network I/O, and the seam tests stub out
//! 4. [`validate`] — parse the returned text as JSON and validate it
//!    field-by-field against the `{"risks": [...]}` schema

pub mod extract;
pub mod model;
pub mod validate;
