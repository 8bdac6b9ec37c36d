use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept in a cached product name
pub const NAME_SNAPSHOT_LEN: usize = 80;

/// Where a resolved retail price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Yahoo! Shopping search
    Yahoo,
    /// Amazon.co.jp search
    Amazon,
    /// Google web search
    Google,
    /// Derived from the buyback price
    Estimated,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Yahoo => "yahoo",
            SourceTag::Amazon => "amazon",
            SourceTag::Google => "google",
            SourceTag::Estimated => "estimated",
        }
    }

    /// Parse a source name (e.g. "yahoo", "Amazon")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Some(SourceTag::Yahoo),
            "amazon" => Some(SourceTag::Amazon),
            "google" => Some(SourceTag::Google),
            "estimated" | "estimate" => Some(SourceTag::Estimated),
            _ => None,
        }
    }

    /// Returns all sources in default priority order
    pub fn all() -> &'static [SourceTag] {
        &[
            SourceTag::Yahoo,
            SourceTag::Amazon,
            SourceTag::Google,
            SourceTag::Estimated,
        ]
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product from the products file.
///
/// Only the fields needed for price resolution are read; everything else in
/// the file is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub jan_code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub retail_price: Option<u64>,
    #[serde(default)]
    pub buyback_price: Option<u64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// JAN code, or `None` when missing or blank
    pub fn jan(&self) -> Option<&str> {
        self.jan_code
            .as_deref()
            .map(str::trim)
            .filter(|jan| !jan.is_empty())
    }

    /// Buyback price, with a missing value treated as 0
    pub fn buyback(&self) -> u64 {
        self.buyback_price.unwrap_or(0)
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// A price proposed by a single source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCandidate {
    pub price: u64,
    pub source: SourceTag,
}

impl PriceCandidate {
    pub fn new(price: u64, source: SourceTag) -> Self {
        Self { price, source }
    }
}

/// A cached retail price record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub retail_price: u64,
    pub source: SourceTag,
    pub product_name: String,
}

impl ResolvedPrice {
    pub fn new(candidate: PriceCandidate, product_name: &str) -> Self {
        Self {
            retail_price: candidate.price,
            source: candidate.source,
            product_name: truncate_chars(product_name, NAME_SNAPSHOT_LEN),
        }
    }
}

/// Take the first `max` characters of a string (not bytes)
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_with_nulls_and_extra_fields() {
        let json = r#"{
            "jan_code": "4948872415934",
            "name": "PlayStation 5",
            "retail_price": null,
            "buyback_price": null,
            "category": "PS5",
            "diff": null,
            "return_rate": null,
            "shop": "example"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.jan(), Some("4948872415934"));
        assert_eq!(product.retail_price, None);
        assert_eq!(product.buyback(), 0);
        assert_eq!(product.category(), "PS5");
    }

    #[test]
    fn product_blank_jan_is_missing() {
        let product = Product {
            jan_code: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(product.jan(), None);
        assert_eq!(product.category(), "");
    }

    #[test]
    fn resolved_price_serializes_cache_field_names() {
        let record = ResolvedPrice::new(PriceCandidate::new(54_978, SourceTag::Yahoo), "PS5");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "retail_price": 54978,
                "source": "yahoo",
                "product_name": "PS5"
            })
        );
    }

    #[test]
    fn resolved_price_truncates_name_by_characters() {
        let name = "ソニー".repeat(40);
        let record = ResolvedPrice::new(PriceCandidate::new(5000, SourceTag::Google), &name);
        assert_eq!(record.product_name.chars().count(), NAME_SNAPSHOT_LEN);
    }

    #[test]
    fn source_tag_parse() {
        assert_eq!(SourceTag::parse("Yahoo"), Some(SourceTag::Yahoo));
        assert_eq!(SourceTag::parse(" estimated "), Some(SourceTag::Estimated));
        assert_eq!(SourceTag::parse("kakaku"), None);
    }
}
