//! Unit tests for the fallback generator

use market_bottom::indicators::{MockGenerator, MockRanges};
use market_bottom::models::Universe;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn universe() -> Universe {
    Universe::new(
        vec!["AAPL".to_string(), "TSLA".to_string()],
        vec!["Healthcare".to_string()],
    )
}

#[test]
fn generated_bundle_is_complete_and_finite() {
    let generator = MockGenerator::new();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let bundle = generator.generate(&universe(), &mut rng);

        assert!(bundle.is_finite(), "seed {seed} produced a non-finite value");
        assert_eq!(bundle.volatility.daily_series.len(), 90);
        assert_eq!(bundle.watchlist.len(), 2);
        assert_eq!(bundle.sectors.len(), 1);
    }
}

#[test]
fn values_respect_default_ranges() {
    let generator = MockGenerator::new();
    let r = generator.ranges().clone();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let bundle = generator.generate(&universe(), &mut rng);

        assert!(r.vix.contains(&bundle.volatility.current));
        assert!(r.put_call_ratio.contains(&bundle.sentiment.put_call_ratio));
        assert!(r.fear_greed_index.contains(&bundle.sentiment.fear_greed_index));
        assert!(r.spy_price.contains(&bundle.technical.spy_price));
        assert!(r.rsi.contains(&bundle.technical.rsi));
        assert!(bundle.technical.bullish_reversal_count <= r.max_reversal_patterns);
        assert!(r.average_pe.contains(&bundle.valuation.average_pe));
        assert!(r.historical_pe.contains(&bundle.valuation.historical_pe));
        assert!(r.percent_above_50dma.contains(&bundle.breadth.percent_above_50dma));

        let yesterday = bundle.volatility.yesterday;
        let current = bundle.volatility.current;
        assert!(yesterday >= current * 0.9 - 1e-9 && yesterday <= current * 1.1 + 1e-9);
    }
}

#[test]
fn averages_are_consistent_with_the_series() {
    let mut rng = StdRng::seed_from_u64(17);
    let v = MockGenerator::new().generate(&universe(), &mut rng).volatility;

    assert_eq!(v.daily_series[0], v.current);
    assert_eq!(v.daily_series[1], v.yesterday);

    let first30 = &v.daily_series[..30];
    let min = first30.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = first30.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(v.avg30 >= min && v.avg30 <= max);

    let mean90 = v.daily_series.iter().sum::<f64>() / 90.0;
    assert!((v.avg90 - mean90).abs() < 1e-9);
}

#[test]
fn technical_flags_agree_with_values() {
    let generator = MockGenerator::new();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let bundle = generator.generate(&universe(), &mut rng);
        let v = &bundle.volatility;
        let t = &bundle.technical;

        assert_eq!(t.macd_divergence, v.current > 25.0 && v.yesterday > v.current);
        assert_eq!(t.rsi_oversold, t.rsi < 30.0);
    }
}

#[test]
fn inverted_and_degenerate_ranges_are_tolerated() {
    let ranges = MockRanges {
        vix: 35.0..=20.0,
        put_call_ratio: 1.0..=1.0,
        ..MockRanges::default()
    };
    let generator = MockGenerator::with_ranges(ranges);
    let mut rng = StdRng::seed_from_u64(3);
    let bundle = generator.generate(&universe(), &mut rng);

    assert!((20.0..=35.0).contains(&bundle.volatility.current));
    assert_eq!(bundle.sentiment.put_call_ratio, 1.0);
}

#[test]
fn empty_universe_yields_empty_rows() {
    let mut rng = StdRng::seed_from_u64(5);
    let bundle = MockGenerator::new().generate(&Universe::default(), &mut rng);
    assert!(bundle.watchlist.is_empty());
    assert!(bundle.sectors.is_empty());
    assert!(bundle.is_finite());
}

#[test]
fn same_seed_gives_identical_bundles() {
    let generator = MockGenerator::new();
    let a = generator.generate(&universe(), &mut StdRng::seed_from_u64(99));
    let b = generator.generate(&universe(), &mut StdRng::seed_from_u64(99));
    assert_eq!(a, b);
}
