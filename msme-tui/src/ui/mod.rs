//! Top-level UI layout — six-panel frame with status bar.

pub mod collections_panel;
pub mod data_panel;
pub mod dpd_panel;
pub mod help_panel;
pub mod overlays;
pub mod overview_panel;
pub mod segments_panel;
pub mod status_bar;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    match &app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::OpenFile => overlays::render_open_file(f, main_area, &app.path_input),
        Overlay::None => {}
    }
}

/// Draw a single panel with its border. Analysis panels get the row-limit
/// slider across the top.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if panel == Panel::Help {
        help_panel::render(f, inner, app);
        return;
    }

    let (Some(session), Some(report)) = (&app.session, &app.report) else {
        render_no_data(f, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);
    widgets::slider::render(f, chunks[0], session.bounds(), session.row_limit());
    let body = chunks[1];

    match panel {
        Panel::Overview => {
            overview_panel::render(f, body, report, app.report_generated_at)
        }
        Panel::Segments => segments_panel::render(f, body, report, &session.snapshot()),
        Panel::Collections => collections_panel::render(f, body, report),
        Panel::Dpd => dpd_panel::render(f, body, report),
        Panel::Data => data_panel::render(f, body, &session.snapshot(), app.data_scroll),
        Panel::Help => {}
    }
}

fn render_no_data(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No portfolio loaded.", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Press o and enter the path of a loan CSV to analyze it.",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "Press 6 for the expected columns and key bindings.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::loaded_app;
    use msme_core::AnalyzerConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::path::PathBuf;

    fn render(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn empty_app_prompts_for_upload() {
        let app = AppState::new(AnalyzerConfig::default(), PathBuf::from("."));
        let screen = render(&app);
        assert!(screen.contains("No portfolio loaded."));
        assert!(screen.contains("Overview [1]"));
    }

    #[test]
    fn every_panel_renders_with_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = loaded_app(dir.path());
        for i in 0..6 {
            app.active_panel = Panel::from_index(i).unwrap();
            let screen = render(&app);
            assert!(screen.contains(app.active_panel.label()), "panel {i}");
        }
    }

    #[test]
    fn overview_shows_scope_and_kpis() {
        let dir = tempfile::tempdir().unwrap();
        let app = loaded_app(dir.path());
        let screen = render(&app);
        assert!(screen.contains("Using first 4 rows out of 4"));
        assert!(screen.contains("Current NPA"));
        assert!(screen.contains("25.0%"));
        assert!(screen.contains("Report generated at"));
    }

    #[test]
    fn data_panel_shows_raw_cells() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = loaded_app(dir.path());
        app.active_panel = Panel::Data;
        let screen = render(&app);
        assert!(screen.contains("customer_id"));
        assert!(screen.contains("Business loss"));
    }

    #[test]
    fn overlays_render_on_top() {
        let mut app = AppState::new(AnalyzerConfig::default(), PathBuf::from("."));
        app.overlay = Overlay::Welcome;
        assert!(render(&app).contains("Welcome"));
        app.overlay = Overlay::OpenFile;
        app.path_input = "book.csv".into();
        assert!(render(&app).contains("book.csv"));
        app.overlay = Overlay::ErrorHistory;
        assert!(render(&app).contains("No errors recorded."));
    }
}
