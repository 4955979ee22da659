//! Download CSV text from a published spreadsheet link.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::info;

use crate::error::AppError;

pub struct SheetClient {
    client: Client,
}

impl Default for SheetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Fetch the body of `url`, expected to be CSV.
    pub fn fetch_csv(&self, url: &str) -> Result<String, AppError> {
        let url = validate_sheet_url(url)?;
        info!(%url, "fetching sheet csv");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::remote(format!("Failed to load the sheet: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::remote(format!(
                "Failed to load the sheet: server answered {}. Make sure the link is a public CSV export.",
                resp.status()
            )));
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if content_type.as_deref().is_some_and(is_html) {
            return Err(AppError::remote(
                "The link returned a web page, not CSV. Publish the sheet to the web as CSV and use that link.",
            ));
        }

        resp.text()
            .map_err(|e| AppError::remote(format!("Failed to read the sheet body: {e}")))
    }
}

/// Trimmed URL, or an input error when it is empty or not http(s).
pub fn validate_sheet_url(url: &str) -> Result<&str, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::input("Enter a published Google Sheets CSV link first."));
    }
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(AppError::input(format!("'{url}' is not an http(s) link.")));
    }
    Ok(url)
}

fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}
