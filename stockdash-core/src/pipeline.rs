//! One synchronous request pipeline: validate → memo → fetch → normalize → view.
//!
//! `Dashboard` owns the provider and the response memo. A UI surface calls
//! [`Dashboard::render_model`] once per interaction and renders either the
//! complete [`DashboardView`] or the error, never a partial result.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::data::memo::ResponseMemo;
use crate::data::normalize::{normalize, NormalizedSeries};
use crate::data::provider::{DataError, DataProvider};
use crate::metrics::{summarize, SummaryMetrics};
use crate::present::{metric_cards, table_rows, ChartModel, MetricCard, PresentError, TableRow};
use crate::request::DashboardRequest;

/// Any failure that ends a dashboard request.
#[derive(Debug, Error)]
pub enum DashboardFailure {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Present(#[from] PresentError),
}

impl DashboardFailure {
    pub fn category(&self) -> &'static str {
        match self {
            DashboardFailure::Data(e) => e.category(),
            DashboardFailure::Present(_) => "DATA",
        }
    }
}

/// Everything the chart, cards and table need for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Raw column that supplied `Close`.
    pub close_source: String,
    pub summary: SummaryMetrics,
    pub cards: [MetricCard; 4],
    pub chart: ChartModel,
    pub table: Vec<TableRow>,
    #[serde(skip)]
    pub series: Arc<NormalizedSeries>,
}

/// Build the view for an already-normalized series.
pub fn build_view(
    request: &DashboardRequest,
    series: Arc<NormalizedSeries>,
    chart_height: u16,
) -> Result<DashboardView, PresentError> {
    let chart = ChartModel::for_series(&series, chart_height)?;
    let summary = summarize(&series);
    Ok(DashboardView {
        ticker: request.ticker().to_string(),
        start: request.start(),
        end: request.end(),
        close_source: series.close_source().to_string(),
        summary,
        cards: metric_cards(&summary),
        chart,
        table: table_rows(&series),
        series,
    })
}

pub struct Dashboard<P> {
    provider: P,
    memo: ResponseMemo<Arc<NormalizedSeries>>,
    chart_height: u16,
}

impl<P: DataProvider> Dashboard<P> {
    pub fn new(provider: P, ttl: Duration, chart_height: u16) -> Self {
        Self {
            provider,
            memo: ResponseMemo::new(ttl),
            chart_height,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Forget every memoized response.
    pub fn clear_memo(&mut self) {
        self.memo.clear();
    }

    /// Normalized series for a validated request, from the memo when live.
    pub fn load(&mut self, request: &DashboardRequest) -> Result<Arc<NormalizedSeries>, DataError> {
        let key = request.key();
        if let Some(series) = self.memo.get(&key) {
            tracing::debug!(ticker = %key.ticker, start = %key.start, end = %key.end, "memo hit");
            return Ok(series);
        }
        tracing::debug!(ticker = %key.ticker, start = %key.start, end = %key.end, "memo miss");

        let fetched = self
            .provider
            .fetch(request.ticker(), request.start(), request.end())
            .map_err(|e| {
                tracing::warn!(provider = self.provider.name(), ticker = %key.ticker, error = %e, "fetch failed");
                e
            })?;
        tracing::info!(
            provider = self.provider.name(),
            ticker = %fetched.symbol,
            rows = fetched.frame.height(),
            "fetched prices"
        );

        let series = Arc::new(normalize(&fetched.frame, request.ticker())?);
        self.memo.insert(key, Arc::clone(&series));
        Ok(series)
    }

    /// Full view for a validated request.
    pub fn render_model(
        &mut self,
        request: &DashboardRequest,
    ) -> Result<DashboardView, DashboardFailure> {
        let series = self.load(request)?;
        Ok(build_view(request, series, self.chart_height)?)
    }

    /// Validate raw input against `today`, then render. Invalid input never
    /// reaches the provider.
    pub fn run(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<DashboardView, DashboardFailure> {
        let request = DashboardRequest::new(ticker, start, end, today)?;
        self.render_model(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::SyntheticProvider;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn synthetic_view_is_complete() {
        let mut dash = Dashboard::new(SyntheticProvider::new(), Duration::from_secs(60), 500);
        let view = dash
            .run("msft", d(2024, 1, 1), d(2024, 1, 31), d(2024, 3, 1))
            .unwrap();
        assert_eq!(view.ticker, "MSFT");
        assert_eq!(view.chart.title, "MSFT Closing Price");
        assert_eq!(view.table.len(), 23);
        assert_eq!(view.chart.points.len(), 23);
        assert!(view.summary.is_complete());
        assert_eq!(dash.memo_len(), 1);
    }

    #[test]
    fn weekend_range_is_no_data() {
        let mut dash = Dashboard::new(SyntheticProvider::new(), Duration::from_secs(60), 500);
        let err = dash
            .run("MSFT", d(2024, 1, 6), d(2024, 1, 7), d(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardFailure::Data(DataError::NoDataFound { .. })
        ));
        assert_eq!(err.category(), "EMPTY");
        assert_eq!(dash.memo_len(), 0);
    }

    #[test]
    fn json_view_omits_series_handle() {
        let mut dash = Dashboard::new(SyntheticProvider::new(), Duration::from_secs(60), 300);
        let view = dash
            .run("IBM", d(2024, 1, 2), d(2024, 1, 5), d(2024, 3, 1))
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("series").is_none());
        assert_eq!(json["chart"]["height"], 300);
        assert_eq!(json["cards"].as_array().unwrap().len(), 4);
    }
}
