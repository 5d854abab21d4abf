//! The indicator bundle consumed by the scorers and the presentation layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityIndicators {
    pub current: f64,
    pub yesterday: f64,
    pub avg30: f64,
    pub avg90: f64,
    /// Up to 90 daily closes, newest first.
    pub daily_series: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AaiiSurvey {
    pub bullish: f64,
    pub bearish: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentIndicators {
    pub put_call_ratio: f64,
    pub bull_bear_spread: f64,
    pub fear_greed_index: f64,
    pub aaii: AaiiSurvey,
    pub institutional_flows: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    pub spy_price: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub rsi: f64,
    pub macd_divergence: bool,
    pub rsi_oversold: bool,
    pub bullish_reversal_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationIndicators {
    #[serde(rename = "averagePE")]
    pub average_pe: f64,
    #[serde(rename = "historicalPE")]
    pub historical_pe: f64,
    #[serde(rename = "averagePB")]
    pub average_pb: f64,
    #[serde(rename = "historicalPB")]
    pub historical_pb: f64,
    pub earnings_yield: f64,
    pub historical_earnings_yield: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadthIndicators {
    pub advance_decline_ratio: f64,
    /// Fraction in [0, 1].
    #[serde(rename = "percentAbove50DMA")]
    pub percent_above_50dma: f64,
    /// Fraction in [0, 1].
    #[serde(rename = "percentAbove200DMA")]
    pub percent_above_200dma: f64,
    pub new_highs_vs_lows: f64,
    pub mc_clellan_oscillator: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorPerformance {
    pub name: String,
    pub daily_change: f64,
    pub weekly_change: f64,
    pub monthly_change: f64,
    pub year_to_date_change: f64,
    pub relative_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub ticker: String,
    pub price: f64,
    pub daily_change: f64,
    pub weekly_change: f64,
    pub monthly_change: f64,
    pub year_to_date_change: f64,
    pub pe: f64,
    #[serde(rename = "historicalAvgPE")]
    pub historical_avg_pe: f64,
    pub volume: f64,
    pub avg_volume: f64,
    pub rsi: f64,
}

/// Full set of indicators for one refresh cycle. Rebuilt every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    pub volatility: VolatilityIndicators,
    pub sentiment: SentimentIndicators,
    pub technical: TechnicalIndicators,
    pub valuation: ValuationIndicators,
    pub breadth: BreadthIndicators,
    pub sectors: Vec<SectorPerformance>,
    pub watchlist: Vec<WatchlistEntry>,
}

impl IndicatorBundle {
    /// Whether every numeric field in the bundle is finite.
    pub fn is_finite(&self) -> bool {
        let v = &self.volatility;
        let s = &self.sentiment;
        let t = &self.technical;
        let val = &self.valuation;
        let b = &self.breadth;

        let scalars = [
            v.current,
            v.yesterday,
            v.avg30,
            v.avg90,
            s.put_call_ratio,
            s.bull_bear_spread,
            s.fear_greed_index,
            s.aaii.bullish,
            s.aaii.bearish,
            s.aaii.neutral,
            s.institutional_flows,
            t.spy_price,
            t.sma50,
            t.sma200,
            t.rsi,
            val.average_pe,
            val.historical_pe,
            val.average_pb,
            val.historical_pb,
            val.earnings_yield,
            val.historical_earnings_yield,
            b.advance_decline_ratio,
            b.percent_above_50dma,
            b.percent_above_200dma,
            b.new_highs_vs_lows,
            b.mc_clellan_oscillator,
        ];

        scalars.iter().all(|x| x.is_finite())
            && v.daily_series.iter().all(|x| x.is_finite())
            && self.sectors.iter().all(|sector| {
                [
                    sector.daily_change,
                    sector.weekly_change,
                    sector.monthly_change,
                    sector.year_to_date_change,
                    sector.relative_strength,
                ]
                .iter()
                .all(|x| x.is_finite())
            })
            && self.watchlist.iter().all(|entry| {
                [
                    entry.price,
                    entry.daily_change,
                    entry.weekly_change,
                    entry.monthly_change,
                    entry.year_to_date_change,
                    entry.pe,
                    entry.historical_avg_pe,
                    entry.volume,
                    entry.avg_volume,
                    entry.rsi,
                ]
                .iter()
                .all(|x| x.is_finite())
            })
    }
}
