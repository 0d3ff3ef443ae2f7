//! Summary metrics: pure functions over the derived columns.
//!
//! Every statistic is `Option<f64>`: `None` means "not computable" for the
//! series at hand and is never replaced by a fabricated zero.

use serde::{Deserialize, Serialize};

use crate::data::normalize::NormalizedSeries;

/// The four headline statistics for a series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Last cumulative return.
    pub total_return: Option<f64>,
    /// Mean of the defined daily returns.
    pub avg_daily_return: Option<f64>,
    /// Sample standard deviation (n - 1) of the defined daily returns.
    pub volatility: Option<f64>,
    /// Most negative drawdown.
    pub max_drawdown: Option<f64>,
}

impl SummaryMetrics {
    /// True when every statistic could be computed.
    pub fn is_complete(&self) -> bool {
        self.total_return.is_some()
            && self.avg_daily_return.is_some()
            && self.volatility.is_some()
            && self.max_drawdown.is_some()
    }
}

/// Compute the summary for a normalized series.
pub fn summarize(series: &NormalizedSeries) -> SummaryMetrics {
    let returns = defined(series.daily_return());
    SummaryMetrics {
        total_return: series.cumulative_return().last().copied().flatten(),
        avg_daily_return: mean(&returns),
        volatility: sample_std(&returns),
        max_drawdown: min_value(series.max_drawdown()),
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// Values that are present, in order.
pub fn defined(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation; `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Minimum over the present values.
pub fn min_value(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::min)
}
