//! Top-level UI layout: form, chart, metric cards, returns table, status bar.

pub mod chart_panel;
pub mod form;
pub mod metrics_panel;
pub mod overlays;
pub mod status_bar;
pub mod table_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let form_area = chunks[0];
    let main_area = chunks[1];
    let status_area = chunks[2];

    form::render(f, form_area, app);

    match &app.view {
        Some(view) => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(55),
                    Constraint::Length(4),
                    Constraint::Min(4),
                ])
                .split(main_area);
            chart_panel::render(f, body[0], view);
            metrics_panel::render(f, body[1], view);
            table_panel::render(f, body[2], view, app.table_scroll);
        }
        None => render_empty(f, main_area),
    }

    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Enter a ticker and date range, then press Enter to load.",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "Errors appear in the status bar; press Esc then e for the history.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
