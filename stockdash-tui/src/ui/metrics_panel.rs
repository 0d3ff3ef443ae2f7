//! Row of four metric cards.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use stockdash_core::pipeline::DashboardView;
use stockdash_core::present::{MetricCard, MetricKind, ReturnTone};

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (card, column) in view.cards.iter().zip(columns.iter()) {
        render_card(f, *column, card);
    }
}

fn render_card(f: &mut Frame, area: Rect, card: &MetricCard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(Span::styled(format!(" {} ", card.label), theme::muted()));

    let value = Line::from(Span::styled(
        card.formatted.as_str(),
        theme::tone(card_tone(card)).add_modifier(ratatui::style::Modifier::BOLD),
    ))
    .alignment(Alignment::Center);

    f.render_widget(Paragraph::new(value).block(block), area);
}

/// Returns are colored by sign; volatility is a magnitude and stays neutral.
fn card_tone(card: &MetricCard) -> ReturnTone {
    match card.kind {
        MetricKind::Volatility => ReturnTone::Neutral,
        _ => ReturnTone::of(card.value),
    }
}
