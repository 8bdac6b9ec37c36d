//! Persistent JSON cache of resolved retail prices, keyed by JAN code

use crate::error::Result;
use crate::models::{Product, ResolvedPrice};
use crate::validation::validate_price;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved prices stored in a JSON file.
///
/// The file is a flat object mapping JAN code to [`ResolvedPrice`].
#[derive(Debug)]
pub struct PriceCache {
    path: PathBuf,
    entries: BTreeMap<String, ResolvedPrice>,
}

impl PriceCache {
    /// Create an empty cache that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache from disk. A missing file gives an empty cache; an
    /// unreadable or malformed file is an error so it never gets overwritten.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            log::info!("No existing price cache at {}", path.display());
            return Ok(Self::empty(path));
        }

        let content = std::fs::read_to_string(&path)?;
        let entries: BTreeMap<String, ResolvedPrice> = serde_json::from_str(&content)?;
        log::info!(
            "Loaded price cache with {} entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self { path, entries })
    }

    /// Save cache to disk
    pub fn save(&self) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;

        log::debug!("Saved price cache with {} entries", self.entries.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, jan: &str) -> bool {
        self.entries.contains_key(jan)
    }

    pub fn get(&self, jan: &str) -> Option<&ResolvedPrice> {
        self.entries.get(jan)
    }

    /// Insert a record. Existing entries are never overwritten; returns
    /// whether the record was stored.
    pub fn insert(&mut self, jan: &str, record: ResolvedPrice) -> bool {
        if self.entries.contains_key(jan) {
            return false;
        }
        self.entries.insert(jan.to_string(), record);
        true
    }

    pub fn remove(&mut self, jan: &str) -> Option<ResolvedPrice> {
        self.entries.remove(jan)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Remove cached prices that no longer pass validation against the
/// products' buyback prices. Returns the removed JAN codes.
pub fn prune_invalid(cache: &mut PriceCache, products: &[Product]) -> Vec<String> {
    let mut removed = Vec::new();

    for product in products {
        let Some(jan) = product.jan() else {
            continue;
        };
        let buyback = product.buyback();
        if buyback == 0 {
            continue;
        }
        let Some(entry) = cache.get(jan) else {
            continue;
        };
        if validate_price(entry.retail_price, buyback, product.category()) {
            continue;
        }

        log::info!(
            "Removing {} ({}): buyback {}, retail {} ({})",
            jan,
            entry.product_name,
            buyback,
            entry.retail_price,
            entry.source
        );
        cache.remove(jan);
        removed.push(jan.to_string());
    }

    removed
}
