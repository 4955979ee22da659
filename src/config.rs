//! Runtime settings read from the environment (and `.env`).
//!
//! | variable                  | default                      |
//! |---------------------------|------------------------------|
//! | `SALESBOARD_STORE_DIR`    | `.salesboard`                |
//! | `SALESBOARD_FORECAST_URL` | the hosted prediction service |
//! | `SALESBOARD_LOW_STOCK`    | `10`                         |
//!
//! Command-line flags override these.

use std::path::PathBuf;

use crate::data::forecast::DEFAULT_FORECAST_URL;
use crate::error::AppError;

pub const DEFAULT_STORE_DIR: &str = ".salesboard";
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store_dir: PathBuf,
    pub forecast_url: String,
    pub low_stock_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup; blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let low_stock_threshold = match get("SALESBOARD_LOW_STOCK") {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AppError::input(format!("SALESBOARD_LOW_STOCK must be a number (got '{raw}').")))?,
            None => defaults.low_stock_threshold,
        };

        Ok(Self {
            store_dir: get("SALESBOARD_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            forecast_url: get("SALESBOARD_FORECAST_URL").unwrap_or(defaults.forecast_url),
            low_stock_threshold,
        })
    }
}
