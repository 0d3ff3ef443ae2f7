//! Raw tabular response as delivered by a provider.
//!
//! Columns are addressed either by a flat name or by a two-level
//! `(field, ticker)` key when the source groups its output by ticker. The
//! two-level form is a transport artifact; `ColumnKey::flatten` collapses it
//! before anything downstream looks at column names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::provider::{DataError, RawBar};

/// Price fields in the order providers emit them.
pub const PRICE_FIELDS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Separator used when joining the levels of a grouped column key.
pub const LEVEL_SEPARATOR: &str = "_";

/// Address of a column in a raw response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    Flat(String),
    Grouped { field: String, ticker: String },
}

impl ColumnKey {
    pub fn flat(name: impl Into<String>) -> Self {
        ColumnKey::Flat(name.into())
    }

    pub fn grouped(field: impl Into<String>, ticker: impl Into<String>) -> Self {
        ColumnKey::Grouped {
            field: field.into(),
            ticker: ticker.into(),
        }
    }

    /// Single flat name: non-empty levels joined with `_`.
    ///
    /// `(Close, AAPL)` becomes `Close_AAPL`, `(Close, "")` becomes `Close`.
    pub fn flatten(&self) -> String {
        match self {
            ColumnKey::Flat(name) => name.clone(),
            ColumnKey::Grouped { field, ticker } => [field.as_str(), ticker.as_str()]
                .into_iter()
                .filter(|level| !level.is_empty())
                .collect::<Vec<_>>()
                .join(LEVEL_SEPARATOR),
        }
    }
}

/// One column of nullable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub key: ColumnKey,
    pub values: Vec<Option<f64>>,
}

impl RawColumn {
    pub fn new(key: ColumnKey, values: Vec<Option<f64>>) -> Self {
        Self { key, values }
    }
}

/// Unprocessed response for one ticker over one date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<RawColumn>,
}

impl RawFrame {
    /// Build a frame, checking that every column has one value per date.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<RawColumn>) -> Result<Self, DataError> {
        for column in &columns {
            if column.values.len() != dates.len() {
                return Err(DataError::Validation(format!(
                    "column '{}' has {} values for {} dates",
                    column.key.flatten(),
                    column.values.len(),
                    dates.len()
                )));
            }
        }
        Ok(Self { dates, columns })
    }

    /// A frame with no rows and no columns (unknown ticker, empty range).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Frame with two-level `(field, ticker)` columns, as a grouped-by-ticker
    /// download produces.
    pub fn grouped(ticker: &str, bars: &[RawBar]) -> Self {
        Self::from_bars(bars, |field| ColumnKey::grouped(field, ticker))
    }

    /// Frame with plain field-name columns.
    pub fn flat(bars: &[RawBar]) -> Self {
        Self::from_bars(bars, |field| ColumnKey::flat(field))
    }

    fn from_bars(bars: &[RawBar], key: impl Fn(&str) -> ColumnKey) -> Self {
        let dates = bars.iter().map(|b| b.date).collect();
        let columns = PRICE_FIELDS
            .iter()
            .map(|field| {
                let values = bars.iter().map(|b| bar_field(b, field)).collect();
                RawColumn::new(key(field), values)
            })
            .collect();
        Self { dates, columns }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// True if any column uses the two-level key form.
    pub fn is_grouped(&self) -> bool {
        self.columns
            .iter()
            .any(|c| matches!(c.key, ColumnKey::Grouped { .. }))
    }

    /// Flattened column names in column order.
    pub fn flat_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.flatten()).collect()
    }
}

fn bar_field(bar: &RawBar, field: &str) -> Option<f64> {
    match field {
        "Open" => bar.open,
        "High" => bar.high,
        "Low" => bar.low,
        "Close" => bar.close,
        "Adj Close" => bar.adj_close,
        "Volume" => bar.volume.map(|v| v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: Some(close - 1.0),
            high: Some(close + 1.0),
            low: Some(close - 2.0),
            close: Some(close),
            adj_close: Some(close * 0.99),
            volume: Some(1_000),
        }
    }

    #[test]
    fn grouped_key_joins_levels() {
        assert_eq!(ColumnKey::grouped("Close", "AAPL").flatten(), "Close_AAPL");
        assert_eq!(ColumnKey::grouped("Adj Close", "MSFT").flatten(), "Adj Close_MSFT");
    }

    #[test]
    fn grouped_key_skips_blank_level() {
        assert_eq!(ColumnKey::grouped("Close", "").flatten(), "Close");
        assert_eq!(ColumnKey::grouped("", "AAPL").flatten(), "AAPL");
    }

    #[test]
    fn flat_key_is_unchanged() {
        assert_eq!(ColumnKey::flat("Adj_Close").flatten(), "Adj_Close");
    }

    #[test]
    fn grouped_frame_names_follow_field_order() {
        let frame = RawFrame::grouped("AAPL", &[bar(1, 100.0), bar(4, 101.0)]);
        assert!(frame.is_grouped());
        assert_eq!(frame.height(), 2);
        assert_eq!(
            frame.flat_names(),
            vec![
                "Open_AAPL",
                "High_AAPL",
                "Low_AAPL",
                "Close_AAPL",
                "Adj Close_AAPL",
                "Volume_AAPL"
            ]
        );
    }

    #[test]
    fn flat_frame_carries_values() {
        let frame = RawFrame::flat(&[bar(1, 100.0)]);
        assert!(!frame.is_grouped());
        let close = frame
            .columns()
            .iter()
            .find(|c| c.key == ColumnKey::flat("Close"))
            .unwrap();
        assert_eq!(close.values, vec![Some(100.0)]);
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let dates = vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
        let columns = vec![RawColumn::new(ColumnKey::flat("Close"), vec![Some(1.0), Some(2.0)])];
        let err = RawFrame::new(dates, columns).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn empty_frame_has_no_rows() {
        let frame = RawFrame::empty();
        assert!(frame.is_empty());
        assert!(frame.flat_names().is_empty());
    }
}
