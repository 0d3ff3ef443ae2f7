//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here, including the dashboard pipeline. A load runs
//! synchronously on the UI thread right after the frame that announces it; the
//! screen either shows a complete view or nothing.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use stockdash_core::config::DashboardConfig;
use stockdash_core::data::DataProvider;
use stockdash_core::pipeline::{Dashboard, DashboardFailure, DashboardView};
use stockdash_core::request::{default_range, normalize_ticker};

/// Maximum number of records kept in the error history.
pub const ERROR_HISTORY_CAP: usize = 50;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which input field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Ticker,
    Start,
    End,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Ticker => "Ticker",
            FormField::Start => "Start",
            FormField::End => "End",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Ticker => FormField::Start,
            FormField::Start => FormField::End,
            FormField::End => FormField::Ticker,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Ticker => FormField::End,
            FormField::Start => FormField::Ticker,
            FormField::End => FormField::Start,
        }
    }
}

/// Raw text of the three input fields.
#[derive(Debug, Clone)]
pub struct InputForm {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub focus: FormField,
    /// Keys go to the focused field while editing.
    pub editing: bool,
}

impl InputForm {
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_string(),
            start: start.format(DATE_FORMAT).to_string(),
            end: end.format(DATE_FORMAT).to_string(),
            focus: FormField::Ticker,
            editing: true,
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Ticker => &self.ticker,
            FormField::Start => &self.start,
            FormField::End => &self.end,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Ticker => &mut self.ticker,
            FormField::Start => &mut self.start,
            FormField::End => &mut self.end,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    NoData,
    Data,
    Network,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Input => "INPUT",
            ErrorCategory::NoData => "EMPTY",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Network => "NET",
        }
    }

    /// Category of a pipeline failure, keyed on its `category()` label.
    pub fn of(failure: &DashboardFailure) -> Self {
        match failure.category() {
            "INPUT" => ErrorCategory::Input,
            "EMPTY" => ErrorCategory::NoData,
            "NET" => ErrorCategory::Network,
            _ => ErrorCategory::Data,
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub form: InputForm,
    pub dashboard: Dashboard<Box<dyn DataProvider>>,
    pub view: Option<DashboardView>,
    pub table_scroll: usize,
    /// Set on Enter; the load runs after the next frame so "Loading" is visible.
    pub load_pending: bool,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub help_dismissed: bool,

    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        config: &DashboardConfig,
        dashboard: Dashboard<Box<dyn DataProvider>>,
        today: NaiveDate,
        state_path: PathBuf,
    ) -> Self {
        let (start, end) = default_range(today, config.lookback_days);
        Self {
            running: true,
            form: InputForm::new(&config.default_ticker, start, end),
            dashboard,
            view: None,
            table_scroll: 0,
            load_pending: false,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            help_dismissed: false,
            state_path,
        }
    }

    /// Queue a load of the current form contents.
    pub fn request_load(&mut self) {
        self.load_pending = true;
        self.set_status(format!("Loading {}...", normalize_ticker(&self.form.ticker)));
    }

    /// Run a queued load, if any.
    pub fn run_pending(&mut self, today: NaiveDate) {
        if std::mem::take(&mut self.load_pending) {
            self.submit(today);
        }
    }

    /// Run the pipeline for the current form contents.
    ///
    /// On failure the previous view is cleared so a stale dashboard is never
    /// shown next to an error.
    pub fn submit(&mut self, today: NaiveDate) {
        let ticker = normalize_ticker(&self.form.ticker);
        let (start, end) = match (parse_field(&self.form.start), parse_field(&self.form.end)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(raw), _) | (_, Err(raw)) => {
                self.view = None;
                self.push_error(
                    ErrorCategory::Input,
                    format!("'{raw}' is not a date (expected YYYY-MM-DD)"),
                    ticker,
                );
                return;
            }
        };

        let context = format!("{ticker} {start}..{end}");
        match self.dashboard.run(&ticker, start, end, today) {
            Ok(view) => {
                tracing::info!(ticker = %view.ticker, rows = view.table.len(), "dashboard loaded");
                self.set_status(format!(
                    "{}: {} trading days, close from '{}'",
                    view.ticker,
                    view.table.len(),
                    view.close_source
                ));
                self.form.ticker = view.ticker.clone();
                self.table_scroll = view.table.len().saturating_sub(1);
                self.view = Some(view);
            }
            Err(e) => {
                tracing::warn!(%context, error = %e, "dashboard load failed");
                self.view = None;
                self.table_scroll = 0;
                self.push_error(ErrorCategory::of(&e), e.to_string(), context);
            }
        }
    }

    /// Number of rows in the returns table.
    pub fn table_len(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.table.len())
    }

    pub fn scroll_table(&mut self, delta: isize) {
        let len = self.table_len();
        if len == 0 {
            self.table_scroll = 0;
            return;
        }
        let next = self.table_scroll.saturating_add_signed(delta);
        self.table_scroll = next.min(len - 1);
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

fn parse_field(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| raw.trim().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;
    use stockdash_core::data::SyntheticProvider;

    pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    pub(crate) fn test_app() -> AppState {
        let config = DashboardConfig::default();
        let provider: Box<dyn DataProvider> = Box::new(SyntheticProvider::new());
        let dashboard = Dashboard::new(provider, Duration::from_secs(60), 500);
        AppState::new(&config, dashboard, d(2024, 6, 28), PathBuf::from("."))
    }

    fn fill(app: &mut AppState, ticker: &str, start: &str, end: &str) {
        app.form.ticker = ticker.into();
        app.form.start = start.into();
        app.form.end = end.into();
    }

    #[test]
    fn field_cycle() {
        assert_eq!(FormField::Ticker.next(), FormField::Start);
        assert_eq!(FormField::End.next(), FormField::Ticker);
        assert_eq!(FormField::Ticker.prev(), FormField::End);
    }

    #[test]
    fn form_defaults_from_config() {
        let app = test_app();
        assert_eq!(app.form.ticker, "AAPL");
        assert_eq!(app.form.end, "2024-06-28");
        assert_eq!(app.form.start, "2023-06-29");
        assert!(app.form.editing);
    }

    #[test]
    fn submit_loads_view() {
        let mut app = test_app();
        fill(&mut app, "msft", "2024-01-01", "2024-01-31");
        app.submit(d(2024, 6, 28));
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.ticker, "MSFT");
        assert_eq!(app.form.ticker, "MSFT");
        assert_eq!(app.table_scroll, 22);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Info))));
    }

    #[test]
    fn failed_submit_clears_previous_view() {
        let mut app = test_app();
        fill(&mut app, "MSFT", "2024-01-01", "2024-01-31");
        app.submit(d(2024, 6, 28));
        assert!(app.view.is_some());

        fill(&mut app, "MSFT", "2024-02-01", "2024-01-01");
        app.submit(d(2024, 6, 28));
        assert!(app.view.is_none());
        assert_eq!(app.error_history[0].category, ErrorCategory::Input);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Error))));
    }

    #[test]
    fn unparsable_date_is_input_error() {
        let mut app = test_app();
        fill(&mut app, "MSFT", "last week", "2024-01-31");
        app.submit(d(2024, 6, 28));
        assert!(app.view.is_none());
        assert!(app.error_history[0].message.contains("last week"));
        assert_eq!(app.dashboard.memo_len(), 0);
    }

    #[test]
    fn weekend_only_range_is_no_data() {
        let mut app = test_app();
        fill(&mut app, "MSFT", "2024-01-06", "2024-01-07");
        app.submit(d(2024, 6, 28));
        assert_eq!(app.error_history[0].category, ErrorCategory::NoData);
    }

    #[test]
    fn queued_load_runs_once() {
        let mut app = test_app();
        fill(&mut app, "MSFT", "2024-01-02", "2024-01-05");
        app.request_load();
        assert!(app.view.is_none());
        assert!(matches!(&app.status_message, Some((m, _)) if m == "Loading MSFT..."));
        app.run_pending(d(2024, 6, 28));
        assert!(app.view.is_some());
        assert!(!app.load_pending);
    }

    #[test]
    fn table_scroll_is_clamped() {
        let mut app = test_app();
        app.scroll_table(5);
        assert_eq!(app.table_scroll, 0);

        fill(&mut app, "MSFT", "2024-01-02", "2024-01-05");
        app.submit(d(2024, 6, 28));
        app.scroll_table(10);
        assert_eq!(app.table_scroll, 3);
        app.scroll_table(-10);
        assert_eq!(app.table_scroll, 0);
    }

    #[test]
    fn category_labels_match_failures() {
        use stockdash_core::data::DataError;
        use stockdash_core::present::PresentError;

        let failures = [
            DashboardFailure::Data(DataError::EmptyTicker),
            DashboardFailure::Data(DataError::NoDataFound {
                ticker: "ZZZZ".into(),
            }),
            DashboardFailure::Data(DataError::Fetch("timed out".into())),
            DashboardFailure::Data(DataError::MissingField("Close".into())),
            DashboardFailure::Present(PresentError::NullClose { date: d(2024, 1, 3) }),
        ];
        for failure in &failures {
            assert_eq!(ErrorCategory::of(failure).label(), failure.category());
        }
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Network, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), ERROR_HISTORY_CAP);
        assert!(app.error_history[0].message.contains("59"));
    }
}
