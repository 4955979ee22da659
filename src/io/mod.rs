//! Input/output helpers.
//!
//! - CSV ingest + normalization (`ingest`)
//! - CSV/JSON exports and the import template (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
