//! Shared foundation for event-trends.
//!
//! Error types, the analytics record models, ISO-week bucketing, number
//! formatting and command-line settings used by every other crate in the
//! workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod week;

pub use error::{Result, TrendsError};
