//! Cross-cutting helpers: configuration and the run deadline.

pub mod config;
pub mod deadline;

pub use deadline::Deadline;
