//! Scrollable daily returns table with colored return cells.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use stockdash_core::pipeline::DashboardView;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView, cursor: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(
            " Daily Returns ({}/{}) [j/k]scroll ",
            (cursor + 1).min(view.table.len()),
            view.table.len()
        ))
        .title_style(theme::accent_bold());

    // Border (2) + header (1).
    let visible = area.height.saturating_sub(3) as usize;
    let start = window_start(cursor, visible, view.table.len());
    let end = (start + visible).min(view.table.len());

    let rows: Vec<Row> = view.table[start..end]
        .iter()
        .enumerate()
        .map(|(offset, row)| {
            let selected = start + offset == cursor;
            let base = if selected {
                theme::accent().add_modifier(Modifier::REVERSED)
            } else {
                theme::muted()
            };
            let return_style = if selected {
                base
            } else {
                theme::tone(row.tone())
            };
            Row::new(vec![
                Cell::from(Span::styled(row.date.to_string(), base)),
                Cell::from(Span::styled(row.close_text(), base)),
                Cell::from(Span::styled(row.return_text(), return_style)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Date", "Close", "Daily Return"]).style(theme::accent_bold());
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

/// First visible row so that `cursor` stays on screen.
fn window_start(cursor: usize, visible: usize, len: usize) -> usize {
    if visible == 0 || len <= visible {
        return 0;
    }
    let max_start = len - visible;
    cursor.saturating_sub(visible - 1).min(max_start)
}
