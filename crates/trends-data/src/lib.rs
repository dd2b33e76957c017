//! Data layer for event-trends.
//!
//! Decodes analytics query responses into daily records and pivots them into
//! the per-week series the chart and table views draw.

pub mod aggregator;
pub mod reader;

pub use trends_core as core;
