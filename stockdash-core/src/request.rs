//! User input: ticker symbol and date range, validated before any fetch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::memo::RequestKey;
use crate::data::provider::DataError;

/// Default lookback when no start date is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// A validated request. Constructing one is the only way to reach the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    ticker: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl DashboardRequest {
    /// Validate raw input against `today`.
    ///
    /// Rejects start after end and either date in the future, then an empty
    /// ticker. The ticker is trimmed and upper-cased.
    pub fn new(
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, DataError> {
        if start > end || start > today || end > today {
            return Err(DataError::InvalidDateRange { start, end, today });
        }
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(DataError::EmptyTicker);
        }
        Ok(Self { ticker, start, end })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            ticker: self.ticker.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

/// Trimmed, upper-cased symbol.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// `(today - lookback_days, today)`.
///
/// A negative lookback counts as zero; one reaching past the calendar
/// clamps to the earliest representable date.
pub fn default_range(today: NaiveDate, lookback_days: i64) -> (NaiveDate, NaiveDate) {
    let start = chrono::Duration::try_days(lookback_days.max(0))
        .and_then(|lookback| today.checked_sub_signed(lookback))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn ticker_is_trimmed_and_uppercased() {
        let req = DashboardRequest::new("  aapl ", d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1))
            .unwrap();
        assert_eq!(req.ticker(), "AAPL");
        assert_eq!(req.key().ticker, "AAPL");
    }

    #[test]
    fn start_after_end_is_rejected() {
        let err = DashboardRequest::new("AAPL", d(2024, 2, 2), d(2024, 2, 1), d(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidDateRange { .. }));
    }

    #[test]
    fn future_dates_are_rejected() {
        let today = d(2024, 3, 1);
        assert!(DashboardRequest::new("AAPL", d(2024, 3, 2), d(2024, 3, 3), today).is_err());
        assert!(DashboardRequest::new("AAPL", d(2024, 2, 1), d(2024, 3, 2), today).is_err());
    }

    #[test]
    fn single_day_range_ending_today_is_valid() {
        let today = d(2024, 3, 1);
        assert!(DashboardRequest::new("AAPL", today, today, today).is_ok());
    }

    #[test]
    fn blank_ticker_is_rejected() {
        let err = DashboardRequest::new("   ", d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, DataError::EmptyTicker));
    }

    #[test]
    fn default_range_spans_lookback() {
        let (start, end) = default_range(d(2024, 3, 1), DEFAULT_LOOKBACK_DAYS);
        assert_eq!(end, d(2024, 3, 1));
        assert_eq!(start, d(2023, 3, 2));
    }

    #[test]
    fn default_range_out_of_calendar_clamps() {
        let (start, end) = default_range(d(2024, 6, 28), 100_000_000_000);
        assert_eq!(start, NaiveDate::MIN);
        assert_eq!(end, d(2024, 6, 28));
    }

    #[test]
    fn negative_lookback_starts_today() {
        let today = d(2024, 6, 28);
        let (start, end) = default_range(today, -30);
        assert_eq!((start, end), (today, today));
        assert!(DashboardRequest::new("AAPL", start, end, today).is_ok());
    }
}
