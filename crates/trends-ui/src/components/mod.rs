//! Reusable pieces drawn around and instead of the chart.

pub mod header;
pub mod legend;
pub mod status;
