//! Presentation models for the chart, metric cards and returns table.
//!
//! These are data contracts only. Rendering belongs to the UI surfaces; the
//! mapping here never mutates the derived values, and display intent (tone)
//! is kept apart from number formatting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::normalize::NormalizedSeries;
use crate::metrics::SummaryMetrics;

/// Default chart height.
pub const DEFAULT_CHART_HEIGHT: u16 = 500;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PresentError {
    #[error("close price is missing on {date}; refusing to plot gaps")]
    NullClose { date: NaiveDate },
}

// ─── Chart ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverMode {
    /// One tooltip for all series at the hovered x.
    XUnified,
    Closest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Everything a charting surface needs to draw the closing-price line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub hover: HoverMode,
    pub range_slider: bool,
    pub height: u16,
    pub points: Vec<ChartPoint>,
}

impl ChartModel {
    pub fn for_series(series: &NormalizedSeries, height: u16) -> Result<Self, PresentError> {
        Ok(Self {
            title: format!("{} Closing Price", series.ticker()),
            x_title: "Date".into(),
            y_title: "Price (USD)".into(),
            hover: HoverMode::XUnified,
            range_slider: true,
            height,
            points: chart_points(series)?,
        })
    }

    /// `(min, max)` close, or `None` for an empty chart.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut closes = self.points.iter().map(|p| p.close);
        let first = closes.next()?;
        Some(closes.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))))
    }
}

/// Ordered `(date, close)` pairs; fails on the first null close.
pub fn chart_points(series: &NormalizedSeries) -> Result<Vec<ChartPoint>, PresentError> {
    series
        .dates()
        .iter()
        .zip(series.close())
        .map(|(&date, close)| match close {
            Some(close) => Ok(ChartPoint { date, close: *close }),
            None => Err(PresentError::NullClose { date }),
        })
        .collect()
}

// ─── Metric cards ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    TotalReturn,
    AvgDailyReturn,
    Volatility,
    MaxDrawdown,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::TotalReturn,
        MetricKind::AvgDailyReturn,
        MetricKind::Volatility,
        MetricKind::MaxDrawdown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::TotalReturn => "Total Return",
            MetricKind::AvgDailyReturn => "Avg Daily Return",
            MetricKind::Volatility => "Volatility",
            MetricKind::MaxDrawdown => "Max Drawdown",
        }
    }

    /// Percentage decimals: headline figures get 2, per-day figures 3.
    pub fn decimals(self) -> usize {
        match self {
            MetricKind::TotalReturn | MetricKind::MaxDrawdown => 2,
            MetricKind::AvgDailyReturn | MetricKind::Volatility => 3,
        }
    }

    fn value(self, m: &SummaryMetrics) -> Option<f64> {
        match self {
            MetricKind::TotalReturn => m.total_return,
            MetricKind::AvgDailyReturn => m.avg_daily_return,
            MetricKind::Volatility => m.volatility,
            MetricKind::MaxDrawdown => m.max_drawdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub kind: MetricKind,
    pub label: &'static str,
    pub value: Option<f64>,
    pub formatted: String,
}

pub fn metric_cards(metrics: &SummaryMetrics) -> [MetricCard; 4] {
    MetricKind::ALL.map(|kind| {
        let value = kind.value(metrics);
        MetricCard {
            kind,
            label: kind.label(),
            value,
            formatted: value
                .map(|v| format_percent(v, kind.decimals()))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    })
}

// ─── Returns table ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub daily_return: Option<f64>,
}

impl TableRow {
    pub fn close_text(&self) -> String {
        self.close.map(format_currency).unwrap_or_default()
    }

    pub fn return_text(&self) -> String {
        self.daily_return
            .map(|r| format_percent(r, 2))
            .unwrap_or_default()
    }

    pub fn tone(&self) -> ReturnTone {
        ReturnTone::of(self.daily_return)
    }
}

pub fn table_rows(series: &NormalizedSeries) -> Vec<TableRow> {
    series
        .dates()
        .iter()
        .zip(series.close())
        .zip(series.daily_return())
        .map(|((&date, &close), &daily_return)| TableRow {
            date,
            close,
            daily_return,
        })
        .collect()
}

/// Display intent for a return cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnTone {
    Positive,
    Negative,
    Neutral,
}

impl ReturnTone {
    /// Non-negative is positive, negative is negative, absent is neutral.
    pub fn of(value: Option<f64>) -> Self {
        match value {
            None => ReturnTone::Neutral,
            Some(v) if v.is_nan() => ReturnTone::Neutral,
            Some(v) if v >= 0.0 => ReturnTone::Positive,
            Some(_) => ReturnTone::Negative,
        }
    }
}

// ─── Formatting ─────────────────────────────────────────────────────

pub const NOT_AVAILABLE: &str = "n/a";

/// `0.0123` with 2 decimals → `1.23%`.
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// `$185.60`
pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}
