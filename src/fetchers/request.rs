use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::FetchConfig;
use crate::error::ScrapeError;

/// Blocking HTTP fetcher with browser-like headers.
///
/// Performs a single GET per call with no retries; redirects are followed and the
/// final status must be 2xx.
#[derive(Debug, Clone)]
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }

    pub fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let html = response.text()?;
        debug!("RequestFetcher: {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
