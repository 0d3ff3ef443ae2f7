//! Column normalization and derived return/drawdown series.
//!
//! `normalize` collapses whatever column shape a provider returned into one
//! flat table with a single authoritative `Close` column, then derives the
//! daily return, cumulative return and drawdown columns from it. The function
//! is pure: fetching happens in the caller.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

use super::frame::RawFrame;
use super::provider::DataError;

pub const DATE: &str = "Date";
pub const CLOSE: &str = "Close";
pub const DAILY_RETURN: &str = "Daily Return";
pub const CUMULATIVE_RETURN: &str = "Cumulative Return";
pub const MAX_DRAWDOWN: &str = "Max Drawdown";

/// Days from 0001-01-01 (CE) to 1970-01-01, for polars `Date` encoding.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Outcome of locating the authoritative close column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseColumn {
    Found { name: String, position: usize },
    NotFound,
}

/// Locate the close column among flattened names.
///
/// Case-insensitive substring match on `close`; the first match in column
/// order wins, so `Close_AAPL` beats a later `Adj Close_AAPL`.
pub fn resolve_close(names: &[String]) -> CloseColumn {
    names
        .iter()
        .position(|name| name.to_lowercase().contains("close"))
        .map(|position| CloseColumn::Found {
            name: names[position].clone(),
            position,
        })
        .unwrap_or(CloseColumn::NotFound)
}

/// Flat, date-indexed table with one canonical close column plus derived columns.
///
/// Invariants: dates strictly increasing, at least one row, exactly one
/// `Close` column in `frame`.
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    ticker: String,
    dates: Vec<NaiveDate>,
    close_source: String,
    close: Vec<Option<f64>>,
    daily_return: Vec<Option<f64>>,
    cumulative_return: Vec<Option<f64>>,
    max_drawdown: Vec<Option<f64>>,
    frame: DataFrame,
}

impl NormalizedSeries {
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Flattened name of the raw column `Close` was copied from.
    pub fn close_source(&self) -> &str {
        &self.close_source
    }

    pub fn close(&self) -> &[Option<f64>] {
        &self.close
    }

    /// `None` on the first row and wherever either neighbouring close is null.
    pub fn daily_return(&self) -> &[Option<f64>] {
        &self.daily_return
    }

    pub fn cumulative_return(&self) -> &[Option<f64>] {
        &self.cumulative_return
    }

    pub fn max_drawdown(&self) -> &[Option<f64>] {
        &self.max_drawdown
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value columns (original flattened columns, `Close`, derived columns).
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    /// The table with the date index materialized as a leading `Date` column.
    pub fn to_frame(&self) -> Result<DataFrame, DataError> {
        let days: Vec<i32> = self
            .dates
            .iter()
            .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let date = Column::new(DATE.into(), days).cast(&DataType::Date)?;

        let mut columns = Vec::with_capacity(self.frame.width() + 1);
        columns.push(date);
        columns.extend(self.frame.get_columns().iter().cloned());
        Ok(DataFrame::new(columns)?)
    }
}

/// Normalize a raw response into a `NormalizedSeries`.
pub fn normalize(raw: &RawFrame, ticker: &str) -> Result<NormalizedSeries, DataError> {
    if raw.is_empty() {
        return Err(DataError::NoDataFound {
            ticker: ticker.to_string(),
        });
    }
    check_dates(raw.dates())?;

    let names = raw.flat_names();
    let (close_source, close_pos) = match resolve_close(&names) {
        CloseColumn::Found { name, position } => (name, position),
        CloseColumn::NotFound => return Err(DataError::MissingField("close".into())),
    };
    debug!(
        ticker,
        close_source = %close_source,
        grouped = raw.is_grouped(),
        rows = raw.height(),
        "resolved close column"
    );

    let close = raw.columns()[close_pos].values.clone();
    let daily_return = daily_returns(&close);
    let cumulative_return = cumulative_returns(&daily_return);
    let max_drawdown = drawdowns(&close);

    let frame = build_frame(
        raw,
        &names,
        close_pos,
        &close,
        &daily_return,
        &cumulative_return,
        &max_drawdown,
    )?;

    Ok(NormalizedSeries {
        ticker: ticker.to_string(),
        dates: raw.dates().to_vec(),
        close_source,
        close,
        daily_return,
        cumulative_return,
        max_drawdown,
        frame,
    })
}

fn check_dates(dates: &[NaiveDate]) -> Result<(), DataError> {
    if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
        return Err(DataError::Validation(format!(
            "dates must be strictly increasing: {} followed by {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

/// Assemble the flat table. Original columns keep their values; a raw column
/// whose name clashes with a canonical one is kept under a `_raw` suffix.
fn build_frame(
    raw: &RawFrame,
    names: &[String],
    close_pos: usize,
    close: &[Option<f64>],
    daily_return: &[Option<f64>],
    cumulative_return: &[Option<f64>],
    max_drawdown: &[Option<f64>],
) -> Result<DataFrame, DataError> {
    let reuse_close = names[close_pos] == CLOSE;
    let mut taken: HashSet<String> = [CLOSE, DAILY_RETURN, CUMULATIVE_RETURN, MAX_DRAWDOWN]
        .into_iter()
        .map(String::from)
        .collect();

    let mut columns = Vec::with_capacity(names.len() + 4);
    for (i, (name, raw_col)) in names.iter().zip(raw.columns()).enumerate() {
        let name = if reuse_close && i == close_pos {
            CLOSE.to_string()
        } else {
            unique_name(&mut taken, name)
        };
        columns.push(Column::new(name.into(), raw_col.values.clone()));
    }
    if !reuse_close {
        columns.push(Column::new(CLOSE.into(), close.to_vec()));
    }
    columns.push(Column::new(DAILY_RETURN.into(), daily_return.to_vec()));
    columns.push(Column::new(CUMULATIVE_RETURN.into(), cumulative_return.to_vec()));
    columns.push(Column::new(MAX_DRAWDOWN.into(), max_drawdown.to_vec()));

    Ok(DataFrame::new(columns)?)
}

fn unique_name(taken: &mut HashSet<String>, name: &str) -> String {
    let mut candidate = name.to_string();
    let mut n = 1;
    while taken.contains(&candidate) {
        candidate = if n == 1 {
            format!("{name}_raw")
        } else {
            format!("{name}_raw_{n}")
        };
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

// ─── Derived series ─────────────────────────────────────────────────

/// Close[t] / Close[t-1] - 1; the first row has no return.
pub fn daily_returns(close: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(close.len());
    for t in 0..close.len() {
        let r = match (t.checked_sub(1).and_then(|p| close[p]), close[t]) {
            (Some(prev), Some(cur)) => Some(cur / prev - 1.0),
            _ => None,
        };
        out.push(r);
    }
    out
}

/// Compounded product of (1 + daily return) minus one. Absent returns are
/// skipped by the product and stay absent in the output.
pub fn cumulative_returns(daily: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut growth = 1.0_f64;
    daily
        .iter()
        .map(|r| {
            r.map(|r| {
                growth *= 1.0 + r;
                growth - 1.0
            })
        })
        .collect()
}

/// Close[t] / running max of Close up to t, minus one. Always <= 0.
pub fn drawdowns(close: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut peak: Option<f64> = None;
    close
        .iter()
        .map(|c| {
            c.map(|c| {
                let p = peak.map_or(c, |p: f64| p.max(c));
                peak = Some(p);
                c / p - 1.0
            })
        })
        .collect()
}
