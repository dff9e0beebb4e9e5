//! Aggregator: per-platform pipelines, their collaborators and the fetch API.

pub mod cache;
pub mod credentials;
pub mod handlers;
pub mod pipeline;
pub mod stage;
