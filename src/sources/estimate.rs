//! Retail price estimation from the buyback price (last resort, no network)

use super::{downgrade, PriceSource};
use crate::error::FetchError;
use crate::models::{PriceCandidate, Product, SourceTag};
use async_trait::async_trait;

/// Typical buyback-to-retail ratio for categories not in the table
pub const DEFAULT_RATIO: f64 = 0.45;

/// Typical buyback-to-retail ratios per category
const CATEGORY_RATIOS: [(&str, f64); 18] = [
    ("PS5", 0.65),
    ("Nintendo Switch", 0.60),
    ("Xbox", 0.55),
    ("PC", 0.45),
    ("PC周辺機器", 0.40),
    ("オーディオ", 0.45),
    ("レコーダー/テレビ", 0.50),
    ("美容家電", 0.50),
    ("調理家電", 0.50),
    ("掃除機", 0.45),
    ("時計", 0.50),
    ("シェーバー", 0.50),
    ("季節・空調家電", 0.45),
    ("ゴルフ", 0.50),
    ("アウトドア", 0.45),
    ("電動歯ブラシ", 0.50),
    ("その他家電", 0.45),
    ("その他", 0.45),
];

pub fn ratio_for_category(category: &str) -> f64 {
    CATEGORY_RATIOS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, ratio)| *ratio)
        .unwrap_or(DEFAULT_RATIO)
}

/// Estimate a retail price as `buyback / ratio`, rounded to the nearest 100.
///
/// Returns `None` when there is no buyback price to work from, or when the
/// estimate rounds down to 0.
pub fn estimate_retail_from_buyback(buyback_price: u64, category: &str) -> Option<u64> {
    if buyback_price == 0 {
        return None;
    }
    let estimated = (buyback_price as f64 / ratio_for_category(category)).trunc();
    let rounded = ((estimated / 100.0).round_ties_even() * 100.0) as u64;
    (rounded > 0).then_some(rounded)
}

/// Price source backed by [`estimate_retail_from_buyback`]
pub struct Estimator;

#[async_trait]
impl PriceSource for Estimator {
    fn tag(&self) -> SourceTag {
        SourceTag::Estimated
    }

    fn uses_network(&self) -> bool {
        false
    }

    async fn fetch(&self, product: &Product) -> Option<PriceCandidate> {
        let result = estimate_retail_from_buyback(product.buyback(), product.category())
            .ok_or(FetchError::NoReference);
        downgrade(self.tag(), product, result)
    }
}
