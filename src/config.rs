//! Run configuration for the fetch pipeline

use crate::error::{Error, Result};
use crate::models::SourceTag;
use std::time::Duration;

/// Delay after every network lookup (Yahoo allows about 1 request/second)
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_MAX_PRODUCTS: usize = 2000;
pub const DEFAULT_SAVE_EVERY: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Sources in priority order
    pub source_order: Vec<SourceTag>,
    /// Pause after each network lookup
    pub delay: Duration,
    pub max_products: usize,
    /// Number of target products to skip
    pub start: usize,
    /// Never fall back to the buyback-ratio estimate
    pub skip_estimate: bool,
    /// Save the cache after this many processed products
    pub save_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_order: SourceTag::all().to_vec(),
            delay: DEFAULT_DELAY,
            max_products: DEFAULT_MAX_PRODUCTS,
            start: 0,
            skip_estimate: false,
            save_every: DEFAULT_SAVE_EVERY,
        }
    }
}

impl RunConfig {
    /// Check the source order and batch size
    pub fn validate(&self) -> Result<()> {
        if self.source_order.is_empty() {
            return Err(Error::Config("at least one source is required".to_string()));
        }
        for (i, tag) in self.source_order.iter().enumerate() {
            if self.source_order[..i].contains(tag) {
                return Err(Error::Config(format!("source '{}' listed twice", tag)));
            }
        }
        if let Some(pos) = self
            .source_order
            .iter()
            .position(|tag| *tag == SourceTag::Estimated)
        {
            if pos + 1 != self.source_order.len() {
                return Err(Error::Config(
                    "'estimated' must be the last source".to_string(),
                ));
            }
        }
        if self.save_every == 0 {
            return Err(Error::Config("save interval must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Parse a comma-separated source list, e.g. "yahoo,amazon,google,estimated"
pub fn parse_source_order(list: &str) -> Result<Vec<SourceTag>> {
    list.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            SourceTag::parse(name)
                .ok_or_else(|| Error::Config(format!("unknown source '{}'", name.trim())))
        })
        .collect()
}
