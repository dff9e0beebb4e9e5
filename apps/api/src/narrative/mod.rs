//! Narrative Generator: turns a scored record into a `NarrativeReport`,
//! answers per-platform coaching questions, and writes the cross-platform
//! `CareerReport`.
//!
//! Model output is untrusted. Every report field is validated against the
//! expected shape, and any generation or parse failure falls back to a report
//! computed from the `ScoreBreakdown` alone.

pub mod career;
pub mod chat;
pub mod fallback;
pub mod handlers;
pub mod narrator;
pub mod prompts;
pub mod report;
