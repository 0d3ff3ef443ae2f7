//! stockdash CLI: price chart data, summary metrics and daily returns for one ticker.
//!
//! Commands:
//! - `show`: fetch, normalize and print the cards and returns table (or JSON)
//! - `config`: print the effective configuration as TOML

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use stockdash_core::config::{DashboardConfig, ProviderKind};
use stockdash_core::pipeline::{Dashboard, DashboardView};
use stockdash_core::present::TableRow;
use stockdash_core::request::default_range;

#[derive(Parser)]
#[command(
    name = "stockdash",
    about = "stockdash: daily price, return and drawdown dashboard"
)]
struct Cli {
    /// Config file. Defaults to {config_dir}/stockdash/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a ticker and print its metric cards and returns table.
    Show {
        /// Ticker symbol (e.g., AAPL).
        ticker: String,

        /// Start date (YYYY-MM-DD). Defaults to the configured lookback before today.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Use the offline synthetic provider instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Print the full view as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the returns table to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Number of most recent table rows to print.
        #[arg(long, default_value_t = 20)]
        rows: usize,

        /// Print the normalized frame and its column names before the cards.
        #[arg(long, default_value_t = false, conflicts_with = "json")]
        preview: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Show {
            ticker,
            start,
            end,
            synthetic,
            json,
            csv,
            rows,
            preview,
        } => run_show(
            config,
            ShowArgs {
                ticker,
                start,
                end,
                synthetic,
                json,
                csv,
                rows,
                preview,
            },
        ),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<DashboardConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match DashboardConfig::default_path() {
            Some(path) => path,
            None => return Ok(DashboardConfig::default()),
        },
    };
    DashboardConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

struct ShowArgs {
    ticker: String,
    start: Option<String>,
    end: Option<String>,
    synthetic: bool,
    json: bool,
    csv: Option<PathBuf>,
    rows: usize,
    preview: bool,
}

fn run_show(mut config: DashboardConfig, args: ShowArgs) -> Result<()> {
    if args.synthetic {
        config.provider = ProviderKind::Synthetic;
    }

    let today = chrono::Local::now().date_naive();
    let (default_start, default_end) = default_range(today, config.lookback_days);
    let start = parse_date(args.start.as_deref(), "--start")?.unwrap_or(default_start);
    let end = parse_date(args.end.as_deref(), "--end")?.unwrap_or(default_end);

    let provider = config.build_provider().context("building price provider")?;
    let mut dashboard = Dashboard::new(provider, config.memo_ttl(), config.chart_height);
    let view = dashboard
        .run(&args.ticker, start, end, today)
        .with_context(|| format!("loading {}", args.ticker.trim().to_uppercase()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &view)?;
        writeln!(out)?;
    } else {
        if args.preview {
            write_preview(&mut out, &view)?;
        }
        write_view(&mut out, &view, args.rows)?;
    }

    if let Some(path) = &args.csv {
        write_csv(path, &view.table)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = view.table.len(), "wrote returns table");
    }
    Ok(())
}

fn parse_date(raw: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    raw.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("{flag} expects YYYY-MM-DD"))
}

fn write_preview(out: &mut impl Write, view: &DashboardView) -> Result<()> {
    let frame = view.series.to_frame()?;
    writeln!(out, "{frame}")?;
    writeln!(out, "Columns: {}", view.series.column_names().join(", "))?;
    writeln!(out)?;
    Ok(())
}

fn write_view(out: &mut impl Write, view: &DashboardView, rows: usize) -> Result<()> {
    writeln!(out, "{}", view.chart.title)?;
    writeln!(
        out,
        "{} to {} | {} trading days | close from '{}'",
        view.start,
        view.end,
        view.table.len(),
        view.close_source
    )?;
    if let Some((lo, hi)) = view.chart.price_bounds() {
        writeln!(out, "Range: ${lo:.2} .. ${hi:.2}")?;
    }
    writeln!(out)?;

    for card in &view.cards {
        writeln!(out, "  {:>18}: {}", card.label, card.formatted)?;
    }
    writeln!(out)?;

    writeln!(out, "{:<12} {:>12} {:>12}", "Date", "Close", "Daily Return")?;
    writeln!(out, "{}", "-".repeat(38))?;
    let skip = view.table.len().saturating_sub(rows);
    for row in view.table.iter().skip(skip) {
        writeln!(
            out,
            "{:<12} {:>12} {:>12}",
            row.date.to_string(),
            row.close_text(),
            row.return_text()
        )?;
    }
    if skip > 0 {
        writeln!(out, "({skip} earlier rows not shown)")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Daily Return")]
    daily_return: Option<f64>,
}

fn write_csv(path: &Path, table: &[TableRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in table {
        writer.serialize(CsvRow {
            date: row.date,
            close: row.close,
            daily_return: row.daily_return,
        })?;
    }
    writer.flush()?;
    Ok(())
}
