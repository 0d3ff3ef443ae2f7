//! Closing-price line chart.

use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use stockdash_core::pipeline::DashboardView;
use stockdash_core::present::ChartModel;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView) {
    let model = &view.chart;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {} ", model.title))
        .title_style(theme::accent_bold());

    let Some(origin) = model.points.first().map(|p| p.date) else {
        f.render_widget(block, area);
        return;
    };
    let data = plot_data(model, origin);
    let (y_min, y_max) = y_bounds(model);
    let x_max = data.last().map_or(1.0, |p| p.0.max(1.0));

    let dataset = Dataset::default()
        .name(view.ticker.as_str())
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled(model.x_title.as_str(), theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(date_labels(model)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(model.y_title.as_str(), theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), theme::muted()),
                    Span::styled(format!("{:.2}", (y_min + y_max) / 2.0), theme::muted()),
                    Span::styled(format!("{y_max:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

/// `(days since first point, close)` pairs.
fn plot_data(model: &ChartModel, origin: NaiveDate) -> Vec<(f64, f64)> {
    model.points
        .iter()
        .map(|p| ((p.date - origin).num_days() as f64, p.close))
        .collect()
}

/// Price bounds padded by 5% so the line never touches the frame.
fn y_bounds(model: &ChartModel) -> (f64, f64) {
    let (lo, hi) = model.price_bounds().unwrap_or((0.0, 1.0));
    let padding = ((hi - lo).abs() * 0.05).max(0.01);
    (lo - padding, hi + padding)
}

/// First, middle and last date.
fn date_labels(model: &ChartModel) -> Vec<Span<'static>> {
    let n = model.points.len();
    let picks: Vec<usize> = match n {
        0..=2 => (0..n).collect(),
        _ => vec![0, n / 2, n - 1],
    };
    picks
        .into_iter()
        .map(|i| Span::styled(model.points[i].date.to_string(), theme::muted()))
        .collect()
}
