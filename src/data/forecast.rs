//! Client for the external sales forecast service.

use reqwest::blocking::Client;
use tracing::info;

use crate::domain::{ForecastResponse, SalesRecord};
use crate::error::AppError;

/// Prediction endpoint the dashboard proxied to.
pub const DEFAULT_FORECAST_URL: &str = "https://predict-sales-production.up.railway.app/predict";

pub struct ForecastClient {
    client: Client,
    url: String,
}

impl ForecastClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the canonical records as a JSON array and return the per-product forecasts.
    pub fn predict(&self, records: &[SalesRecord]) -> Result<ForecastResponse, AppError> {
        info!(url = %self.url, records = records.len(), "requesting forecast");

        let resp = self
            .client
            .post(&self.url)
            .json(records)
            .send()
            .map_err(|e| AppError::remote(format!("Forecast request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::remote(format!("API error: {}", resp.status().as_u16())));
        }

        let forecast: ForecastResponse = resp
            .json()
            .map_err(|e| AppError::remote(format!("Failed to parse forecast response: {e}")))?;

        info!(products = forecast.products.len(), "forecast received");
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_REMOTE;

    #[test]
    fn unreachable_service_is_a_remote_error() {
        // Bind then drop to get a local port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = ForecastClient::new(format!("http://127.0.0.1:{port}/predict"));
        let err = client.predict(&[SalesRecord::default()]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_REMOTE);
    }

    #[test]
    fn keeps_configured_url() {
        assert_eq!(ForecastClient::new(DEFAULT_FORECAST_URL).url(), DEFAULT_FORECAST_URL);
    }
}
