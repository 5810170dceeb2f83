//! App state persistence — JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_file: Option<PathBuf>,
    pub row_limit: Option<usize>,
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            last_file: None,
            row_limit: None,
            active_panel: Panel::Overview,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
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

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_file: app
            .session
            .as_ref()
            .and_then(|s| s.dataset().source().map(Path::to_path_buf)),
        row_limit: app.row_limit(),
        active_panel: app.active_panel,
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state. The last upload is re-read only when no file was
/// given on the command line.
pub fn apply(app: &mut AppState, state: PersistedState, reopen: bool) {
    app.active_panel = state.active_panel;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
    if !reopen {
        return;
    }
    if let Some(path) = state.last_file.filter(|p| p.exists()) {
        if app.load_file(&path) {
            if let Some(limit) = state.row_limit {
                app.set_row_limit(limit);
            }
        }
    }
}
