//! One-shot CLI: runs a single refresh cycle and prints the result.
//!
//! Usage: `market-bottom [--json] [--offline] [--seed N]`

use dotenvy::dotenv;
use market_bottom::config::Config;
use market_bottom::core::pipeline::SignalPipeline;
use market_bottom::error::DataError;
use market_bottom::logging;
use market_bottom::models::snapshot::MarketSnapshot;
use market_bottom::models::universe::Universe;
use market_bottom::services::{AlphaVantageProvider, MarketDataProvider, StaticMarketDataProvider};
use market_bottom::signals::Category;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::sync::Arc;

#[derive(Debug, Default)]
struct CliArgs {
    json: bool,
    offline: bool,
    seed: Option<u64>,
}

fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    let mut args = CliArgs::default();
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--offline" => args.offline = true,
            "--seed" => {
                let raw = iter.next().ok_or("--seed requires a value")?;
                args.seed = Some(raw.parse()?);
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let provider: Arc<dyn MarketDataProvider + Send + Sync> = if args.offline {
        Arc::new(StaticMarketDataProvider::failing(DataError::InsufficientData(
            "offline mode".to_string(),
        )))
    } else {
        Arc::new(AlphaVantageProvider::from_config(&config))
    };

    let pipeline = SignalPipeline::new(provider, config.fetch_timeout);
    let universe = Universe::new(config.watchlist.clone(), config.sectors.clone());
    let mut rng = match args.seed.or(config.jitter_seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let snapshot = pipeline.run_cycle(&universe, &mut rng).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    Ok(())
}

fn print_snapshot(snapshot: &MarketSnapshot) {
    println!("Market Bottom Signal: {}%", snapshot.overall_percent);
    println!("  {}", snapshot.level.label());
    println!("  {}", snapshot.level.guidance());
    println!("  Data source: {}", snapshot.provenance.source.as_str());
    if let Some(reason) = &snapshot.provenance.fallback_reason {
        println!("  Fallback reason: {} ({})", reason.message, reason.kind);
    }
    println!("  Category scores:");
    for category in Category::ALL {
        let score = snapshot.scores.get(category);
        println!(
            "    {:<12} {}/3 ({})",
            category.display_name(),
            score,
            snapshot.scores.strength(category).description()
        );
    }
    println!(
        "  VIX: {:.2} (yesterday {:.2}, 30d avg {:.2}, 90d avg {:.2})",
        snapshot.volatility.current,
        snapshot.volatility.yesterday,
        snapshot.volatility.avg30,
        snapshot.volatility.avg90
    );
    println!(
        "  SPY: ${:.2} (RSI {:.1}, SMA50 {:.2}, SMA200 {:.2})",
        snapshot.technical.spy_price,
        snapshot.technical.rsi,
        snapshot.technical.sma50,
        snapshot.technical.sma200
    );
}
