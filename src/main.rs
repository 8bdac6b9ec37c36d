//! Retail Price Fetch - reference retail prices for buyback products
//!
//! Looks up retail prices for products without one and stores them in a
//! JSON cache for merging into the products file.

use clap::{Parser, Subcommand};
use retail_price_fetch::{
    build_sources, load_products, parse_source_order, prune_invalid, run, select_targets,
    Endpoints, HttpClient, PriceCache, Resolver, RunConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_PRODUCTS: &str = "data/json/products.json";
const DEFAULT_OUTPUT: &str = "data/json/retail_prices_found.json";

/// Fetch reference retail prices by JAN code from web sources
#[derive(Parser, Debug)]
#[command(name = "retail_price_fetch")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve retail prices for products that have none
    Fetch(FetchArgs),
    /// Remove cached prices that fail validation against buyback prices
    Prune(FileArgs),
}

#[derive(clap::Args, Debug)]
struct FileArgs {
    /// Path to the products JSON file
    #[arg(short, long, default_value = DEFAULT_PRODUCTS)]
    products: PathBuf,

    /// Path to the retail price cache
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    #[command(flatten)]
    files: FileArgs,

    /// Process at most N products (0 = default limit)
    #[arg(long, default_value_t = 0)]
    test: usize,

    /// Skip the first N target products
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Do not fall back to estimating from the buyback price
    #[arg(long, default_value_t = false)]
    no_estimate: bool,

    /// Delay after each web request in milliseconds
    #[arg(long, default_value_t = 1500)]
    delay_ms: u64,

    /// Save the cache after this many processed products
    #[arg(long, default_value_t = 20)]
    save_every: usize,

    /// Sources in priority order
    #[arg(long, default_value = "yahoo,amazon,google,estimated")]
    sources: String,

    /// Override the Yahoo! Shopping base URL
    #[arg(long)]
    yahoo_url: Option<String>,

    /// Override the Amazon base URL
    #[arg(long)]
    amazon_url: Option<String>,

    /// Override the Google base URL
    #[arg(long)]
    google_url: Option<String>,
}

impl FetchArgs {
    fn run_config(&self) -> retail_price_fetch::Result<RunConfig> {
        let defaults = RunConfig::default();
        let config = RunConfig {
            source_order: parse_source_order(&self.sources)?,
            delay: Duration::from_millis(self.delay_ms),
            max_products: if self.test > 0 {
                self.test
            } else {
                defaults.max_products
            },
            start: self.start,
            skip_estimate: self.no_estimate,
            save_every: self.save_every,
        };
        config.validate()?;
        Ok(config)
    }

    fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            yahoo: self.yahoo_url.clone().unwrap_or(defaults.yahoo),
            amazon: self.amazon_url.clone().unwrap_or(defaults.amazon),
            google: self.google_url.clone().unwrap_or(defaults.google),
        }
    }
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=retail_price_fetch=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let result = match args.command {
        Command::Fetch(fetch) => run_fetch(fetch).await,
        Command::Prune(files) => run_prune(files),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run_fetch(args: FetchArgs) -> retail_price_fetch::Result<()> {
    let config = args.run_config()?;
    let products = load_products(&args.files.products)?;
    let mut cache = PriceCache::load(&args.files.output)?;

    let targets = select_targets(&products, config.start, config.max_products);

    let sources = build_sources(
        &config.source_order,
        &args.endpoints(),
        Arc::new(HttpClient::new()),
    );
    for source in &sources {
        log::info!("Source enabled: {}", source.tag());
    }
    if config.skip_estimate {
        log::info!("Estimation fallback disabled");
    }

    let resolver = Resolver::new(sources, &config);
    let summary = run(&resolver, &targets, &mut cache, config.save_every).await?;

    summary.log();
    log::info!("Output: {}", cache.path().display());
    Ok(())
}

fn run_prune(args: FileArgs) -> retail_price_fetch::Result<()> {
    let products = load_products(&args.products)?;
    let mut cache = PriceCache::load(&args.output)?;

    let removed = prune_invalid(&mut cache, &products);
    cache.save()?;

    log::info!(
        "Removed {} invalid entries, {} remaining",
        removed.len(),
        cache.len()
    );
    Ok(())
}
