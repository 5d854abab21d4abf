use serde::{Deserialize, Serialize};

/// Tickers and sectors the dashboard tracks besides the core indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub watchlist: Vec<String>,
    pub sectors: Vec<String>,
}

impl Universe {
    pub fn new(watchlist: Vec<String>, sectors: Vec<String>) -> Self {
        Self { watchlist, sectors }
    }

    /// Add a ticker, upper-cased. Returns `false` when it was already tracked
    /// or is blank.
    pub fn add_ticker(&mut self, ticker: &str) -> bool {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() || self.watchlist.contains(&ticker) {
            return false;
        }
        self.watchlist.push(ticker);
        true
    }

    /// Remove a ticker (case-insensitive). Returns `false` when it was not tracked.
    pub fn remove_ticker(&mut self, ticker: &str) -> bool {
        let ticker = ticker.trim().to_uppercase();
        let before = self.watchlist.len();
        self.watchlist.retain(|t| *t != ticker);
        self.watchlist.len() != before
    }
}
