//! Products file loading and target selection

use crate::error::Result;
use crate::models::Product;
use std::path::Path;

/// Read the products file (a JSON array of products)
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    log::info!("Loading products from: {}", path.display());

    let content = std::fs::read_to_string(path)?;
    let products: Vec<Product> = serde_json::from_str(&content)?;

    log::info!("Loaded {} products", products.len());
    Ok(products)
}

/// Pick the products to resolve: those without a retail price, highest
/// buyback price first, then `start` skipped and at most `max` kept.
pub fn select_targets(products: &[Product], start: usize, max: usize) -> Vec<Product> {
    let mut targets: Vec<Product> = products
        .iter()
        .filter(|p| p.retail_price.is_none())
        .cloned()
        .collect();
    targets.sort_by(|a, b| b.buyback().cmp(&a.buyback()));

    log::info!("Products without retail price: {}", targets.len());
    if start > 0 {
        log::info!("Starting at #{}", start);
    }

    let targets: Vec<Product> = targets.into_iter().skip(start).take(max).collect();
    log::info!("Processing: {}", targets.len());
    targets
}
