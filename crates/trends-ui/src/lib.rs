//! Terminal UI for event trends.
//!
//! Provides themes, the stacked weekly bar chart with its legend, the weekly
//! table, status panels and the application event loop, built on top of
//! [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use trends_core as core;
