//! HTTP collaborators.
//!
//! - published Google Sheets CSV download (`sheets`)
//! - external sales forecast service (`forecast`)
//!
//! Both make exactly one blocking request per call: no retry, no backoff.

pub mod forecast;
pub mod sheets;

pub use forecast::ForecastClient;
pub use sheets::SheetClient;
