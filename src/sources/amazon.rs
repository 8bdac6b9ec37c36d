//! Amazon.co.jp search, skipping used and parts listings

use super::{downgrade, validated_median, HttpClient, PriceSource};
use crate::error::FetchError;
use crate::extract::{context_window, PriceMatch, AMAZON_PATTERNS};
use crate::models::{PriceCandidate, Product, SourceTag};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const AMAZON_BASE_URL: &str = "https://www.amazon.co.jp";

const TIMEOUT: Duration = Duration::from_secs(15);

/// Characters inspected on each side of a price for used/parts markers
const CONTEXT_RADIUS: usize = 200;

/// Listing markers for used, parts-only or damaged goods
const USED_INDICATORS: [&str; 6] = ["中古", "部品", "パーツ", "ジャンク", "訳あり", "難あり"];

pub struct AmazonSearch {
    http: Arc<HttpClient>,
    base_url: String,
}

impl AmazonSearch {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_base_url(http, AMAZON_BASE_URL)
    }

    /// Create a client against a different host (for testing with mock servers)
    pub fn with_base_url(http: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, jan: &str) -> String {
        format!("{}/s?k={}", self.base_url, urlencoding::encode(jan))
    }

    async fn lookup(&self, product: &Product) -> Result<u64, FetchError> {
        let jan = product.jan().ok_or(FetchError::NoMatch)?;
        let html = self.http.get_text(&self.search_url(jan), TIMEOUT).await?;
        let prices = new_item_prices(&html);
        validated_median(&prices, product)
    }
}

/// Prices whose surrounding markup does not mention a used indicator
fn new_item_prices(html: &str) -> Vec<u64> {
    AMAZON_PATTERNS
        .matches(html)
        .filter(|m| !is_used_listing(html, m))
        .map(|m| m.price)
        .collect()
}

fn is_used_listing(html: &str, m: &PriceMatch) -> bool {
    let context = context_window(html, m.start, m.end, CONTEXT_RADIUS);
    USED_INDICATORS
        .iter()
        .any(|indicator| context.contains(indicator))
}

#[async_trait]
impl PriceSource for AmazonSearch {
    fn tag(&self) -> SourceTag {
        SourceTag::Amazon
    }

    async fn fetch(&self, product: &Product) -> Option<PriceCandidate> {
        downgrade(self.tag(), product, self.lookup(product).await)
    }
}

#[cfg(test)]
#[path = "amazon_tests.rs"]
mod tests;
