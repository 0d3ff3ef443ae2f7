//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, the
//! synthetic generator) so the dashboard can swap implementations and mock
//! them in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frame::RawFrame;

/// Raw daily bar from a data provider, before it is shaped into a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

/// Structured error types for a dashboard request.
///
/// Every variant is terminal for the current request only; both the CLI and
/// the TUI turn them into a message and accept the next request.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid date range: {start} .. {end} (today is {today})")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    },

    #[error("ticker symbol is empty")]
    EmptyTicker,

    #[error("no data found for {ticker}")]
    NoDataFound { ticker: String },

    #[error("response has no recognizable '{0}' column")]
    MissingField(String),

    #[error("error fetching data: {0}")]
    Fetch(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("frame error: {0}")]
    Frame(String),
}

impl DataError {
    /// Short category label for status lines and error history.
    pub fn category(&self) -> &'static str {
        match self {
            DataError::InvalidDateRange { .. } | DataError::EmptyTicker => "INPUT",
            DataError::NoDataFound { .. } => "EMPTY",
            DataError::MissingField(_) | DataError::Validation(_) | DataError::Frame(_) => "DATA",
            DataError::Fetch(_) => "NET",
        }
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(e: polars::error::PolarsError) -> Self {
        DataError::Frame(e.to_string())
    }
}

/// Result of a fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub frame: RawFrame,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

/// Trait for price providers.
///
/// A provider returns whatever shape its source produces; an unknown symbol or
/// an empty date range yields an empty frame rather than an error. The memo
/// sits above this trait, providers don't know about it.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily price fields for a symbol over an inclusive date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        (**self).fetch(symbol, start, end)
    }
}
