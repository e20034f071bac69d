//! Per-symbol price files, loaded on first use.

use crate::domain::Timestamp;
use crate::engine::parse_price_payload;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::warn;

/// Lazily loaded `daily_prices_<SYMBOL>.json` files from one directory.
#[derive(Debug)]
pub struct PriceBook {
    dir: PathBuf,
    cache: HashMap<String, BTreeMap<Timestamp, f64>>,
}

impl PriceBook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn price_file(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("daily_prices_{}.json", symbol))
    }

    /// Number of symbols looked up so far, including ones with no file.
    pub fn symbols_loaded(&self) -> usize {
        self.cache.len()
    }

    /// Closing prices for `symbol`. A missing or unreadable file is an empty
    /// series.
    pub fn prices(&mut self, symbol: &str) -> &BTreeMap<Timestamp, f64> {
        if !self.cache.contains_key(symbol) {
            let loaded = self.load(symbol);
            self.cache.insert(symbol.to_string(), loaded);
        }
        &self.cache[symbol]
    }

    fn load(&self, symbol: &str) -> BTreeMap<Timestamp, f64> {
        let path = self.price_file(symbol);
        if !path.exists() {
            return BTreeMap::new();
        }
        let payload = std::fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                serde_json::from_slice::<serde_json::Value>(&bytes).map_err(|e| e.to_string())
            });
        match payload {
            Ok(payload) => parse_price_payload(&payload)
                .into_iter()
                .map(|p| (p.date, p.close))
                .collect(),
            Err(e) => {
                warn!("Failed to load prices for {} from {}: {}", symbol, path.display(), e);
                BTreeMap::new()
            }
        }
    }

    /// Price of `symbol` at `date`: exact timestamp, else the latest price on
    /// the same calendar day, else 0.
    pub fn price_at(&mut self, symbol: &str, date: &str) -> f64 {
        let prices = self.prices(symbol);
        if let Some(price) = prices.get(date) {
            return *price;
        }
        let day = crate::domain::timestamp::date_part(date);
        prices
            .iter()
            .filter(|(ts, _)| ts.date_part() == day)
            .last()
            .map_or(0.0, |(_, price)| *price)
    }
}
