//! Fallback-chain price resolution and the run driver

use crate::cache::PriceCache;
use crate::config::RunConfig;
use crate::error::Result;
use crate::models::{truncate_chars, PriceCandidate, Product, ResolvedPrice, SourceTag};
use crate::sources::PriceSource;
use crate::validation::validate_price;
use std::collections::BTreeMap;
use std::time::Duration;

/// Characters of the product name shown in progress logs
const LOG_NAME_LEN: usize = 55;

/// Tries sources in priority order until one yields a valid price
pub struct Resolver {
    sources: Vec<Box<dyn PriceSource>>,
    delay: Duration,
    skip_estimate: bool,
}

impl Resolver {
    pub fn new(sources: Vec<Box<dyn PriceSource>>, config: &RunConfig) -> Self {
        Self {
            sources,
            delay: config.delay,
            skip_estimate: config.skip_estimate,
        }
    }

    /// Resolve one product. Every candidate is validated again here, even
    /// when the source already validated it. Network sources are followed
    /// by the rate-limit delay whatever their outcome.
    pub async fn resolve(&self, product: &Product) -> Option<PriceCandidate> {
        for source in &self.sources {
            let tag = source.tag();
            if tag == SourceTag::Estimated && self.skip_estimate {
                continue;
            }

            let candidate = source.fetch(product).await;
            if source.uses_network() {
                tokio::time::sleep(self.delay).await;
            }

            match candidate {
                Some(c) if validate_price(c.price, product.buyback(), product.category()) => {
                    return Some(c);
                }
                Some(c) => {
                    log::debug!("  {} price {} rejected", tag, c.price);
                }
                None => {}
            }
        }
        None
    }
}

/// Counters for a fetch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub by_source: BTreeMap<SourceTag, usize>,
    pub new_found: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Successful cache saves, periodic and final
    pub saves: usize,
    pub total_cached: usize,
}

impl RunSummary {
    /// Prices found from a given source
    pub fn found(&self, tag: SourceTag) -> usize {
        self.by_source.get(&tag).copied().unwrap_or(0)
    }

    fn record_success(&mut self, tag: SourceTag) {
        *self.by_source.entry(tag).or_insert(0) += 1;
        self.new_found += 1;
    }

    pub fn log(&self) {
        log::info!("========================================");
        log::info!("  Run summary");
        log::info!("========================================");
        log::info!("  New prices:   {}", self.new_found);
        log::info!("  Total cached: {}", self.total_cached);
        log::info!("  Skipped:      {}", self.skipped);
        log::info!("  Failed:       {}", self.failed);
        log::info!("  By source:");
        for tag in SourceTag::all() {
            log::info!("    {:<10} {}", tag.as_str(), self.found(*tag));
        }
    }
}

/// Resolve every target product and record results in the cache.
///
/// Products without a JAN code or already cached are skipped without
/// touching any source. The cache is saved after every `save_every`
/// resolved products and once more at the end.
pub async fn run(
    resolver: &Resolver,
    targets: &[Product],
    cache: &mut PriceCache,
    save_every: usize,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut processed = 0usize;
    let total = targets.len();

    for (i, product) in targets.iter().enumerate() {
        let Some(jan) = product.jan() else {
            summary.skipped += 1;
            continue;
        };
        if cache.contains(jan) {
            summary.skipped += 1;
            continue;
        }

        log::info!(
            "[{}/{}] {}",
            i + 1,
            total,
            truncate_chars(&product.name, LOG_NAME_LEN)
        );
        log::info!(
            "  JAN: {}, buyback: {}, category: {}",
            jan,
            product.buyback(),
            product.category()
        );

        match resolver.resolve(product).await {
            Some(candidate) => {
                log::info!("  found via {}: {}", candidate.source, candidate.price);
                cache.insert(jan, ResolvedPrice::new(candidate, &product.name));
                summary.record_success(candidate.source);
            }
            None => {
                log::warn!("  no retail price found for {}", jan);
                summary.failed += 1;
            }
        }

        processed += 1;
        if processed % save_every == 0 {
            match cache.save() {
                Ok(()) => {
                    summary.saves += 1;
                    log::info!("Saved {} entries", cache.len());
                }
                Err(e) => log::warn!("Failed to save price cache: {}", e),
            }
        }
    }

    cache.save()?;
    summary.saves += 1;
    summary.total_cached = cache.len();

    Ok(summary)
}
