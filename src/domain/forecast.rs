//! Shapes returned by the external forecasting service.
//!
//! We do not interpret the forecast beyond display and export.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub products: Vec<ProductForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductForecast {
    pub product: String,
    #[serde(default)]
    pub forecast: Vec<f64>,
    #[serde(default)]
    pub forecast_detail: Vec<ForecastPoint>,
    #[serde(default)]
    pub trend: String,
    #[serde(default)]
    pub recommended_stock: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub predicted_sales: f64,
}

/// Display classification of a product's trend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    /// The service labels trends in Indonesian (`naik`/`turun`); English
    /// labels are accepted too. Anything else reads as stable.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "naik" | "up" | "rising" => Trend::Rising,
            "turun" | "down" | "falling" => Trend::Falling,
            _ => Trend::Stable,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Rising => "↑",
            Trend::Falling => "↓",
            Trend::Stable => "→",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_products_reads_as_empty() {
        let resp: ForecastResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(resp.products.is_empty());
    }

    #[test]
    fn parses_service_payload() {
        let body = r#"{
            "products": [{
                "product": "Kaos",
                "forecast": [13.5, 14.0],
                "forecast_detail": [
                    {"date": "2025-07-04", "predicted_sales": 13.5},
                    {"date": "2025-07-05", "predicted_sales": 14.0}
                ],
                "trend": "Naik",
                "recommended_stock": 30
            }]
        }"#;
        let resp: ForecastResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.products.len(), 1);
        let kaos = &resp.products[0];
        assert_eq!(kaos.forecast_detail[1].predicted_sales, 14.0);
        assert_eq!(kaos.recommended_stock, 30.0);
        assert_eq!(Trend::from_label(&kaos.trend), Trend::Rising);
    }

    #[test]
    fn unknown_trend_is_stable() {
        assert_eq!(Trend::from_label("turun"), Trend::Falling);
        assert_eq!(Trend::from_label("stabil"), Trend::Stable);
        assert_eq!(Trend::from_label(""), Trend::Stable);
    }
}
