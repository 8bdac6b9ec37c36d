//! Price sources: web lookups plus the buyback-ratio estimator

mod amazon;
mod estimate;
mod google;
mod http;
mod yahoo;

pub use amazon::{AmazonSearch, AMAZON_BASE_URL};
pub use estimate::{estimate_retail_from_buyback, ratio_for_category, Estimator, DEFAULT_RATIO};
pub use google::{GoogleSearch, GOOGLE_BASE_URL};
pub use http::HttpClient;
pub use yahoo::{YahooShopping, YAHOO_BASE_URL};

use crate::error::FetchError;
use crate::extract::median;
use crate::models::{PriceCandidate, Product, SourceTag};
use crate::validation::validate_price;
use async_trait::async_trait;
use std::sync::Arc;

/// A single source of retail price candidates.
///
/// Implementations never fail: every error is logged and reported as `None`.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Tag recorded for prices from this source
    fn tag(&self) -> SourceTag;

    /// Whether a lookup goes over the network (and is rate limited)
    fn uses_network(&self) -> bool {
        true
    }

    /// Look up a candidate retail price for a product
    async fn fetch(&self, product: &Product) -> Option<PriceCandidate>;
}

/// Base URLs of the web sources
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub yahoo: String,
    pub amazon: String,
    pub google: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            yahoo: YAHOO_BASE_URL.to_string(),
            amazon: AMAZON_BASE_URL.to_string(),
            google: GOOGLE_BASE_URL.to_string(),
        }
    }
}

/// Build the sources for the given priority order
pub fn build_sources(
    order: &[SourceTag],
    endpoints: &Endpoints,
    http: Arc<HttpClient>,
) -> Vec<Box<dyn PriceSource>> {
    order
        .iter()
        .map(|tag| -> Box<dyn PriceSource> {
            match tag {
                SourceTag::Yahoo => Box::new(YahooShopping::with_base_url(
                    Arc::clone(&http),
                    &endpoints.yahoo,
                )),
                SourceTag::Amazon => Box::new(AmazonSearch::with_base_url(
                    Arc::clone(&http),
                    &endpoints.amazon,
                )),
                SourceTag::Google => Box::new(GoogleSearch::with_base_url(
                    Arc::clone(&http),
                    &endpoints.google,
                )),
                SourceTag::Estimated => Box::new(Estimator),
            }
        })
        .collect()
}

/// Turn a lookup result into a candidate, logging why there is none
pub(crate) fn downgrade(
    tag: SourceTag,
    product: &Product,
    result: Result<u64, FetchError>,
) -> Option<PriceCandidate> {
    let jan = product.jan().unwrap_or("-");
    match result {
        Ok(price) => Some(PriceCandidate::new(price, tag)),
        Err(e @ (FetchError::Network(_) | FetchError::HttpStatus(_))) => {
            log::warn!("    {} error for {}: {}", tag, jan, e);
            None
        }
        Err(e) => {
            log::debug!("    {} found nothing for {}: {}", tag, jan, e);
            None
        }
    }
}

/// Keep prices that pass validation and return their median
pub(crate) fn validated_median(prices: &[u64], product: &Product) -> Result<u64, FetchError> {
    if prices.is_empty() {
        return Err(FetchError::NoMatch);
    }
    let validated: Vec<u64> = prices
        .iter()
        .copied()
        .filter(|p| validate_price(*p, product.buyback(), product.category()))
        .collect();
    median(&validated).ok_or(FetchError::Rejected(prices.len()))
}
