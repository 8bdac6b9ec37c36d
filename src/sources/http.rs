//! Shared HTTP client for the web sources

use crate::error::FetchError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Browser user agents, used round robin
const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Async HTTP client returning response bodies as text
pub struct HttpClient {
    client: reqwest::Client,
    next_agent: AtomicUsize,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            next_agent: AtomicUsize::new(0),
        }
    }

    fn user_agent(&self) -> &'static str {
        let idx = self.next_agent.fetch_add(1, Ordering::Relaxed);
        USER_AGENTS[(idx + 1) % USER_AGENTS.len()]
    }

    /// GET a page and return its body, decoded lossily
    pub async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("User-Agent", self.user_agent())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "ja,en;q=0.9")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        Ok(response.text().await?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
