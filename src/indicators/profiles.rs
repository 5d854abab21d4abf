//! Static reference profiles for sectors and watchlist tickers.
//!
//! `beta` is sensitivity to volatility stress; the other fields anchor the
//! estimated rows when VIX sits at its long-run norm.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorProfile {
    pub name: &'static str,
    pub beta: f64,
    pub ytd_base: f64,
}

pub const SECTOR_PROFILES: [SectorProfile; 5] = [
    SectorProfile {
        name: "Technology",
        beta: 1.25,
        ytd_base: 0.0,
    },
    SectorProfile {
        name: "Healthcare",
        beta: 0.75,
        ytd_base: 0.0,
    },
    SectorProfile {
        name: "Financials",
        beta: 1.15,
        ytd_base: 0.0,
    },
    SectorProfile {
        name: "Consumer Cyclical",
        beta: 1.1,
        ytd_base: 0.0,
    },
    SectorProfile {
        name: "Energy",
        beta: 0.9,
        ytd_base: 15.0,
    },
];

const DEFAULT_SECTOR: SectorProfile = SectorProfile {
    name: "",
    beta: 1.0,
    ytd_base: 0.0,
};

/// Profile for a sector name (case-insensitive); unknown sectors track the market.
pub fn sector_profile(name: &str) -> SectorProfile {
    SECTOR_PROFILES
        .iter()
        .copied()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .unwrap_or(DEFAULT_SECTOR)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerProfile {
    pub ticker: &'static str,
    pub base_price: f64,
    pub pe: f64,
    pub historical_avg_pe: f64,
    pub avg_volume: f64,
    pub beta: f64,
}

pub const TICKER_PROFILES: [TickerProfile; 5] = [
    TickerProfile {
        ticker: "AAPL",
        base_price: 170.0,
        pe: 25.0,
        historical_avg_pe: 28.0,
        avg_volume: 80_000_000.0,
        beta: 1.2,
    },
    TickerProfile {
        ticker: "MSFT",
        base_price: 340.0,
        pe: 30.0,
        historical_avg_pe: 32.0,
        avg_volume: 65_000_000.0,
        beta: 1.1,
    },
    TickerProfile {
        ticker: "AMZN",
        base_price: 180.0,
        pe: 40.0,
        historical_avg_pe: 45.0,
        avg_volume: 55_000_000.0,
        beta: 1.3,
    },
    TickerProfile {
        ticker: "GOOGL",
        base_price: 140.0,
        pe: 22.0,
        historical_avg_pe: 25.0,
        avg_volume: 48_000_000.0,
        beta: 1.1,
    },
    TickerProfile {
        ticker: "META",
        base_price: 480.0,
        pe: 20.0,
        historical_avg_pe: 22.0,
        avg_volume: 42_000_000.0,
        beta: 1.4,
    },
];

const DEFAULT_TICKER: TickerProfile = TickerProfile {
    ticker: "",
    base_price: 100.0,
    pe: 20.0,
    historical_avg_pe: 20.0,
    avg_volume: 5_000_000.0,
    beta: 1.0,
};

pub fn ticker_profile(ticker: &str) -> TickerProfile {
    TICKER_PROFILES
        .iter()
        .copied()
        .find(|p| p.ticker.eq_ignore_ascii_case(ticker))
        .unwrap_or(DEFAULT_TICKER)
}
