//! stockdash core: price fetching, normalization, metrics and presentation models.
//!
//! - Providers (Yahoo Finance chart API, deterministic synthetic walk)
//! - Raw frames with flat or `field × ticker` columns
//! - Normalization to one canonical `Close` plus derived return columns
//! - Summary metrics and the chart/card/table data contracts
//! - The request pipeline with its time-bounded response memo

pub mod config;
pub mod data;
pub mod metrics;
pub mod pipeline;
pub mod present;
pub mod request;

pub use config::{ConfigError, DashboardConfig, ProviderKind};
pub use data::{DataError, DataProvider, NormalizedSeries, RawFrame};
pub use metrics::{summarize, SummaryMetrics};
pub use pipeline::{Dashboard, DashboardFailure, DashboardView};
pub use present::{ChartModel, MetricCard, PresentError, ReturnTone, TableRow};
pub use request::DashboardRequest;
