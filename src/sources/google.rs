//! Google web search for list prices (定価) in result snippets
//!
//! A lookup is a two-step state machine: first the JAN code, then a
//! shortened product name if the JAN query produced no valid price.

use super::{downgrade, HttpClient, PriceSource};
use crate::error::FetchError;
use crate::extract::LABEL_PATTERNS;
use crate::models::{truncate_chars, PriceCandidate, Product, SourceTag};
use crate::validation::validate_price;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const GOOGLE_BASE_URL: &str = "https://www.google.com";

const TIMEOUT: Duration = Duration::from_secs(20);

/// Characters of the product name used for the fallback query
const NAME_QUERY_LEN: usize = 40;

/// Query currently being tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryStep {
    Jan,
    Name,
}

impl QueryStep {
    fn next(self) -> Option<Self> {
        match self {
            QueryStep::Jan => Some(QueryStep::Name),
            QueryStep::Name => None,
        }
    }

    /// Search terms for this step, or `None` if the step does not apply
    fn query(self, jan: &str, name: &str) -> Option<String> {
        match self {
            QueryStep::Jan => Some(format!("{} 定価 メーカー希望小売価格", jan)),
            QueryStep::Name => {
                let short_name = truncate_chars(name, NAME_QUERY_LEN);
                let short_name = short_name.trim_end();
                (!short_name.is_empty()).then(|| format!("{} 定価", short_name))
            }
        }
    }
}

pub struct GoogleSearch {
    http: Arc<HttpClient>,
    base_url: String,
}

impl GoogleSearch {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_base_url(http, GOOGLE_BASE_URL)
    }

    /// Create a client against a different host (for testing with mock servers)
    pub fn with_base_url(http: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&hl=ja",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Try each query step in turn. A transport failure ends the lookup.
    async fn lookup(&self, product: &Product) -> Result<u64, FetchError> {
        let jan = product.jan().ok_or(FetchError::NoMatch)?;
        let mut outcome = FetchError::NoMatch;
        let mut step = Some(QueryStep::Jan);

        while let Some(current) = step {
            if let Some(query) = current.query(jan, &product.name) {
                let html = self.http.get_text(&self.search_url(&query), TIMEOUT).await?;
                match LABEL_PATTERNS.first_match(&html) {
                    Some(price)
                        if validate_price(price, product.buyback(), product.category()) =>
                    {
                        return Ok(price);
                    }
                    Some(price) => {
                        log::debug!("    google {:?} query: {} rejected", current, price);
                        outcome = FetchError::Rejected(1);
                    }
                    None => outcome = FetchError::NoMatch,
                }
            }
            step = current.next();
        }

        Err(outcome)
    }
}

#[async_trait]
impl PriceSource for GoogleSearch {
    fn tag(&self) -> SourceTag {
        SourceTag::Google
    }

    async fn fetch(&self, product: &Product) -> Option<PriceCandidate> {
        downgrade(self.tag(), product, self.lookup(product).await)
    }
}

#[cfg(test)]
#[path = "google_tests.rs"]
mod tests;
