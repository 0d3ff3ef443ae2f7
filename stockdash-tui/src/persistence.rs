//! UI state persistence: JSON save/load across restarts.
//!
//! Only UI state is stored here, never fetched prices.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_ticker: Option<String>,
    pub help_dismissed: bool,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt UI state");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    let ticker = app.form.ticker.trim();
    PersistedState {
        last_ticker: (!ticker.is_empty()).then(|| ticker.to_uppercase()),
        help_dismissed: app.help_dismissed,
    }
}

/// Apply persisted state to AppState. First run opens the help overlay.
pub fn apply(app: &mut AppState, state: PersistedState) {
    if let Some(ticker) = state.last_ticker {
        app.form.ticker = ticker;
    }
    app.help_dismissed = state.help_dismissed;
    if !state.help_dismissed {
        app.overlay = Overlay::Help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            last_ticker: Some("NVDA".into()),
            help_dismissed: true,
        };
        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.last_ticker.as_deref(), Some("NVDA"));
        assert!(loaded.help_dismissed);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert!(loaded.last_ticker.is_none());
        assert!(!loaded.help_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.last_ticker.is_none());
    }

    #[test]
    fn first_run_shows_help() {
        let mut app = test_app();
        apply(&mut app, PersistedState::default());
        assert_eq!(app.overlay, Overlay::Help);
        assert_eq!(app.form.ticker, "AAPL");
    }

    #[test]
    fn apply_then_extract() {
        let mut app = test_app();
        apply(
            &mut app,
            PersistedState {
                last_ticker: Some("TSLA".into()),
                help_dismissed: true,
            },
        );
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.form.ticker, "TSLA");

        app.form.ticker = " amd ".into();
        let extracted = extract(&app);
        assert_eq!(extracted.last_ticker.as_deref(), Some("AMD"));
        assert!(extracted.help_dismissed);
    }
}
