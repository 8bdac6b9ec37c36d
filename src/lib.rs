//! Retail Price Fetch - reference retail prices for buyback products
//!
//! Resolves the retail price of products identified by JAN code by trying
//! several web sources in turn, validating each candidate against the known
//! buyback price, and falling back to an estimate from the buyback price.
//! Results are kept in a JSON cache so interrupted runs can resume.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod products;
pub mod sources;
pub mod validation;

pub use cache::{prune_invalid, PriceCache};
pub use config::{parse_source_order, RunConfig};
pub use error::{Error, FetchError, Result};
pub use models::{PriceCandidate, Product, ResolvedPrice, SourceTag};
pub use pipeline::{run, Resolver, RunSummary};
pub use products::{load_products, select_targets};
pub use sources::{build_sources, Endpoints, HttpClient, PriceSource};
pub use validation::validate_price;
