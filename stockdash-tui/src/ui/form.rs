//! Input form: ticker, start date, end date.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, FormField};
use crate::theme;

const FIELDS: [FormField; 3] = [FormField::Ticker, FormField::Start, FormField::End];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.form;
    let title = if form.editing {
        " Input [Tab]next field [Enter]load [Esc]browse "
    } else {
        " Input [i]edit [Enter]reload "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(form.editing))
        .title(title)
        .title_style(theme::panel_title(form.editing));

    let mut spans: Vec<Span> = Vec::new();
    for field in FIELDS {
        let focused = form.editing && form.focus == field;
        spans.push(Span::styled(format!(" {}: ", field.label()), theme::muted()));
        let value_style = if focused {
            theme::accent_bold().add_modifier(Modifier::UNDERLINED)
        } else {
            theme::accent()
        };
        spans.push(Span::styled(form.field(field).to_string(), value_style));
        if focused {
            spans.push(Span::styled("_", theme::accent()));
        }
        spans.push(Span::raw("  "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
