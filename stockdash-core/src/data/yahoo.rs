//! Yahoo Finance data provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API and hands them back as a
//! grouped `(field, ticker)` frame. One request per fetch: no retry, no
//! client timeout. Failures come back as `DataError::Fetch`.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::frame::RawFrame;
use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Exchange metadata; `gmtoffset` is the exchange's UTC offset in seconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart API URL for a symbol and inclusive date range.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            self.base_url
        )
    }
}

/// Parse the chart API response into bars.
///
/// A `Not Found` error or a result with no timestamps is an empty response,
/// not a failure: the ticker is unknown or the range has no trading days.
fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
    let result = match (resp.chart.result, resp.chart.error) {
        (_, Some(err)) if err.code == "Not Found" => return Ok(Vec::new()),
        (_, Some(err)) => {
            return Err(DataError::Fetch(format!("{}: {}", err.code, err.description)))
        }
        (Some(result), None) => result,
        (None, None) => return Ok(Vec::new()),
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };
    // Session dates are calendar days at the exchange, not in UTC.
    let utc_offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut bars: Vec<RawBar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = ts
            .checked_add(utc_offset)
            .and_then(|local| chrono::DateTime::from_timestamp(local, 0))
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::Fetch(format!("invalid timestamp for {symbol}: {ts}")))?;

        let bar = RawBar {
            date,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close: quote.close.get(i).copied().flatten(),
            adj_close: adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
            volume: quote.volume.get(i).copied().flatten(),
        };

        // Skip rows where every field is null (holidays, halted sessions)
        if bar.open.is_none()
            && bar.high.is_none()
            && bar.low.is_none()
            && bar.close.is_none()
            && bar.volume.is_none()
        {
            continue;
        }

        // Yahoo repeats the current session with a live timestamp; keep the latest
        match bars.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => bars.push(bar),
        }
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    Ok(bars)
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let url = self.chart_url(symbol, start, end);
        info!(symbol, %start, %end, "fetching daily bars");

        let resp = self.client.get(&url).send().map_err(|e| {
            warn!(symbol, error = %e, "request failed");
            DataError::Fetch(e.to_string())
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(symbol, "provider reports unknown symbol");
            return Ok(FetchResult {
                symbol: symbol.to_string(),
                frame: RawFrame::empty(),
                source: DataSource::YahooFinance,
            });
        }
        if !status.is_success() {
            warn!(symbol, %status, "provider returned error status");
            return Err(DataError::Fetch(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::Fetch(format!("failed to parse response for {symbol}: {e}"))
        })?;
        let bars = parse_response(symbol, chart)?;
        debug!(symbol, bars = bars.len(), "parsed chart response");

        Ok(FetchResult {
            symbol: symbol.to_string(),
            frame: RawFrame::grouped(symbol, &bars),
            source: DataSource::YahooFinance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RawBar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        parse_response("AAPL", resp)
    }

    #[test]
    fn parses_quotes_and_adjclose() {
        let bars = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200],
            "indicators":{"quote":[{"open":[187.1,184.2],"high":[188.4,185.8],
            "low":[183.8,183.4],"close":[185.6,184.2],"volume":[82488700,58414500]}],
            "adjclose":[{"adjclose":[184.7,183.3]}]}}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, Some(185.6));
        assert_eq!(bars[1].adj_close, Some(183.3));
        assert_eq!(bars[1].volume, Some(58_414_500));
    }

    #[test]
    fn skips_all_null_rows() {
        let bars = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200],
            "indicators":{"quote":[{"open":[null,184.2],"high":[null,185.8],
            "low":[null,183.4],"close":[null,184.2],"volume":[null,1]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(bars.len(), 1);
        assert!(bars[0].adj_close.is_none());
    }

    #[test]
    fn keeps_latest_bar_for_repeated_date() {
        let bars = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704207600],
            "indicators":{"quote":[{"open":[1.0,1.0],"high":[2.0,2.0],
            "low":[0.5,0.5],"close":[1.5,1.7],"volume":[10,20]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, Some(1.7));
    }

    #[test]
    fn dates_use_exchange_offset() {
        // 2024-01-02 10:00 AEDT is 2024-01-01 23:00 UTC.
        let bars = parse(
            r#"{"chart":{"result":[{"meta":{"gmtoffset":39600},"timestamp":[1704150000],
            "indicators":{"quote":[{"open":[7.5],"high":[7.6],
            "low":[7.4],"close":[7.55],"volume":[1000]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn not_found_is_empty() {
        let bars = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn missing_timestamps_is_empty() {
        let bars = parse(
            r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#,
        )
        .unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn other_provider_errors_are_fetch_errors() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request",
            "description":"Invalid input"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Fetch(ref m) if m.contains("Bad Request")));
    }

    #[test]
    fn chart_url_covers_whole_end_day() {
        let provider = YahooProvider::new("https://example.test/", DEFAULT_USER_AGENT).unwrap();
        let url = provider.chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert!(url.starts_with("https://example.test/v8/finance/chart/AAPL?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704239999"));
    }
}
