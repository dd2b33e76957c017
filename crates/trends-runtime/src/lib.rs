//! Runtime layer for event-trends.
//!
//! Holds the login state, the analytics HTTP client and the single-shot loader
//! that turns a token into a [`trends_data::aggregator::WeeklyReport`].

pub mod client;
pub mod loader;
pub mod session;

pub use trends_core as core;
pub use trends_data as data;
