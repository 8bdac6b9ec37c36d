//! Yahoo! Shopping search (primary source, no API key needed)

use super::{downgrade, validated_median, HttpClient, PriceSource};
use crate::error::FetchError;
use crate::extract::YEN_PATTERNS;
use crate::models::{PriceCandidate, Product, SourceTag};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const YAHOO_BASE_URL: &str = "https://shopping.yahoo.co.jp";

const TIMEOUT: Duration = Duration::from_secs(15);

pub struct YahooShopping {
    http: Arc<HttpClient>,
    base_url: String,
}

impl YahooShopping {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_base_url(http, YAHOO_BASE_URL)
    }

    /// Create a client against a different host (for testing with mock servers)
    pub fn with_base_url(http: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, jan: &str) -> String {
        format!("{}/search?p={}", self.base_url, urlencoding::encode(jan))
    }

    /// Median of every validated yen amount on the search page
    async fn lookup(&self, product: &Product) -> Result<u64, FetchError> {
        let jan = product.jan().ok_or(FetchError::NoMatch)?;
        let html = self.http.get_text(&self.search_url(jan), TIMEOUT).await?;
        let prices = YEN_PATTERNS.all_matches(&html);
        validated_median(&prices, product)
    }
}

#[async_trait]
impl PriceSource for YahooShopping {
    fn tag(&self) -> SourceTag {
        SourceTag::Yahoo
    }

    async fn fetch(&self, product: &Product) -> Option<PriceCandidate> {
        downgrade(self.tag(), product, self.lookup(product).await)
    }
}

#[cfg(test)]
#[path = "yahoo_tests.rs"]
mod tests;
