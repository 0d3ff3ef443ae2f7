//! Deterministic synthetic prices for offline use and demos.
//!
//! Produces a simple random walk from a starting price of 100.0, seeded from
//! the symbol name so the same request always yields the same frame. The
//! frame uses flat column names, unlike Yahoo's grouped output.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::frame::RawFrame;
use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};

#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Weekday bars from `start` through `end`, seeded by `symbol`.
pub fn generate_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(RawBar {
            date: current,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            adj_close: Some(close),
            volume: Some(volume),
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = generate_bars(symbol, start, end);
        Ok(FetchResult {
            symbol: symbol.to_string(),
            frame: RawFrame::flat(&bars),
            source: DataSource::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_symbol_same_bars() {
        let a = generate_bars("AAPL", d(2024, 1, 1), d(2024, 3, 1));
        let b = generate_bars("AAPL", d(2024, 1, 1), d(2024, 3, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn different_symbols_differ() {
        let a = generate_bars("AAPL", d(2024, 1, 1), d(2024, 3, 1));
        let b = generate_bars("MSFT", d(2024, 1, 1), d(2024, 3, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn weekends_are_absent() {
        let bars = generate_bars("SPY", d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(bars.len(), 23);
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn weekend_only_range_is_empty() {
        let result = SyntheticProvider::new()
            .fetch("SPY", d(2024, 1, 6), d(2024, 1, 7))
            .unwrap();
        assert!(result.frame.is_empty());
        assert_eq!(result.source, DataSource::Synthetic);
    }
}
