//! Keyboard input dispatch: overlays → global keys → form or browse mode.
//!
//! While editing, printable keys go to the focused field. Esc leaves editing
//! so the single-letter commands (scroll, help, errors, quit) become active.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            app.help_dismissed = true;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Keys shared by both modes.
    match key.code {
        KeyCode::Enter => {
            app.form.editing = false;
            app.request_load();
            return;
        }
        KeyCode::Tab => {
            app.form.focus = app.form.focus.next();
            app.form.editing = true;
            return;
        }
        KeyCode::BackTab => {
            app.form.focus = app.form.focus.prev();
            app.form.editing = true;
            return;
        }
        KeyCode::Up => {
            app.scroll_table(-1);
            return;
        }
        KeyCode::Down => {
            app.scroll_table(1);
            return;
        }
        KeyCode::PageUp => {
            app.scroll_table(-10);
            return;
        }
        KeyCode::PageDown => {
            app.scroll_table(10);
            return;
        }
        _ => {}
    }

    // 3. Mode-specific keys.
    if app.form.editing {
        handle_form_key(app, key);
    } else {
        handle_browse_key(app, key);
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.form.editing = false,
        KeyCode::Backspace => {
            app.form.focused_mut().pop();
        }
        KeyCode::Char(c) => app.form.focused_mut().push(c),
        _ => {}
    }
}

fn handle_browse_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('j') => app.scroll_table(1),
        KeyCode::Char('k') => app.scroll_table(-1),
        KeyCode::Char('g') => app.table_scroll = 0,
        KeyCode::Char('G') => app.scroll_table(isize::MAX),
        KeyCode::Char('i') | KeyCode::Char('/') => app.form.editing = true,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
        }
        KeyCode::Char('r') => {
            app.dashboard.clear_memo();
            app.set_warning("Response memo cleared; next load refetches");
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{d, test_app};
    use crate::app::FormField;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
        app.run_pending(d(2024, 6, 28));
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn clear_field(app: &mut AppState) {
        for _ in 0..20 {
            press(app, KeyCode::Backspace);
        }
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut app = test_app();
        clear_field(&mut app);
        type_text(&mut app, "qqq");
        assert_eq!(app.form.ticker, "qqq");
        assert!(app.running);
    }

    #[test]
    fn tab_cycles_fields() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, FormField::Start);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, FormField::End);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, FormField::Ticker);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.form.focus, FormField::End);
    }

    #[test]
    fn enter_loads_and_j_k_scroll() {
        let mut app = test_app();
        clear_field(&mut app);
        type_text(&mut app, "ibm");
        press(&mut app, KeyCode::Tab);
        clear_field(&mut app);
        type_text(&mut app, "2024-01-02");
        press(&mut app, KeyCode::Tab);
        clear_field(&mut app);
        type_text(&mut app, "2024-01-12");
        press(&mut app, KeyCode::Enter);

        assert!(!app.form.editing);
        assert_eq!(app.table_len(), 9);
        assert_eq!(app.table_scroll, 8);
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.table_scroll, 6);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.table_scroll, 7);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.table_scroll, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.table_scroll, 8);
    }

    #[test]
    fn q_quits_only_outside_the_form() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn help_overlay_dismisses_on_any_key() {
        let mut app = test_app();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay, Overlay::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.help_dismissed);
    }

    #[test]
    fn error_overlay_scrolls_and_closes() {
        let mut app = test_app();
        app.push_error(crate::app::ErrorCategory::Input, "a".into(), String::new());
        app.push_error(crate::app::ErrorCategory::Input, "b".into(), String::new());
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.error_scroll, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = test_app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(!app.running);
    }
}
