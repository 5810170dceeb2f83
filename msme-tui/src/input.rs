//! Keyboard input dispatch — overlays → global keys → panel-specific handlers.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

const PAGE: usize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::OpenFile => {
            handle_open_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(panel) = c.to_digit(10).and_then(|d| Panel::from_index(d as usize - 1)) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('o') => {
            app.path_input = app
                .session
                .as_ref()
                .and_then(|s| s.dataset().source())
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            app.overlay = Overlay::OpenFile;
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        KeyCode::Char('x') => {
            app.export();
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left => {
            app.step_row_limit(false);
            return;
        }
        KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right => {
            app.step_row_limit(true);
            return;
        }
        KeyCode::Home => {
            app.set_row_limit(0);
            return;
        }
        KeyCode::End => {
            app.set_row_limit(usize::MAX);
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    if app.active_panel == Panel::Data {
        handle_data_key(app, key);
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

fn handle_open_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.path_input.clear();
        }
        KeyCode::Enter => {
            let raw = app.path_input.trim().to_string();
            app.overlay = Overlay::None;
            app.path_input.clear();
            if raw.is_empty() {
                app.set_warning("No file path entered");
            } else {
                app.load_file(&PathBuf::from(raw));
            }
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            app.path_input.push(c);
        }
        _ => {}
    }
}

fn handle_data_key(app: &mut AppState, key: KeyEvent) {
    let last = app.data_rows().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.data_scroll = (app.data_scroll + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.data_scroll = app.data_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => {
            app.data_scroll = (app.data_scroll + PAGE).min(last);
        }
        KeyCode::PageUp => {
            app.data_scroll = app.data_scroll.saturating_sub(PAGE);
        }
        KeyCode::Char('g') => app.data_scroll = 0,
        KeyCode::Char('G') => app.data_scroll = last,
        _ => {}
    }
}
