//! Overlay widgets: key help, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

const KEYS: [(&str, &str); 10] = [
    ("Tab / Shift-Tab", "next / previous input field"),
    ("Enter", "load the ticker and date range"),
    ("Esc", "leave the form (browse mode)"),
    ("i or /", "back to the form"),
    ("j / k, Up / Down", "scroll the returns table"),
    ("g / G", "first / last row"),
    ("e", "error history"),
    ("r", "forget memoized responses"),
    ("?", "this help"),
    ("q, Ctrl-C", "quit"),
];

/// Key reference, shown on first run and on `?`.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" stockdash ")
        .title_style(theme::accent_bold());

    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("Keys", theme::accent_bold())),
        Line::from(""),
    ];
    for (keys, action) in KEYS {
        text.push(Line::from(vec![
            Span::styled(format!("  {keys:>18}  "), theme::accent()),
            Span::styled(action, theme::muted()),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Dates are YYYY-MM-DD and may not lie in the future.",
        theme::muted(),
    )));
    text.push(Line::from(Span::styled(
        "Press any key to dismiss...",
        theme::neutral(),
    )));

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().skip(app.error_scroll) {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
        if lines.len() >= inner.height as usize {
            break;
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
