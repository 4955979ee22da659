//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the canonical `SalesRecord`
//! - selector enums (`Period`, `WeekStart`, `Metric`, `SortKey`, `SortOrder`)
//! - forecast service payloads (`ForecastResponse` and friends)

pub mod forecast;
pub mod types;

pub use forecast::*;
pub use types::*;
