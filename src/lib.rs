//! Interactive report over the agricultural slice of a voluntary
//! carbon-credit registry workbook.
//!
//! The pipeline is a pure function per refresh cycle: the loader fetches
//! and normalizes the workbook once per process, the filter pipeline
//! reduces it by the user's facet selections, and the aggregation engine
//! turns the filtered view into a [`reports::DisplayBundle`] that any host
//! surface can render.

pub mod config;
pub mod filters;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;
