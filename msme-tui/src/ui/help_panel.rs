//! Panel 6 — Help: keyboard shortcuts, upload format and risk bands.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use msme_core::analyzer::RiskBand;
use msme_core::data::{required_columns, Column};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-6", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "o", "Open a loan CSV");
    key(&mut lines, "r", "Reload the current CSV from disk");
    key(&mut lines, "x", "Export in-scope rows as CSV");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Row Limit Slider");
    key(&mut lines, "[ / ]  h / l", "Analyze fewer / more rows");
    key(&mut lines, "Home / End", "Jump to minimum / all rows");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 5 — Data");
    key(&mut lines, "j / k", "Scroll rows");
    key(&mut lines, "PgUp / PgDn", "Scroll ten rows");
    key(&mut lines, "g / G", "Jump to first / last row");
    lines.push(Line::from(""));

    section(&mut lines, "Upload Format");
    key(&mut lines, "Required", &required_columns().join(", "));
    let optional: Vec<&str> = Column::ALL
        .into_iter()
        .filter(|c| !c.is_required())
        .map(Column::name)
        .collect();
    key(&mut lines, "Optional", &optional.join(", "));
    lines.push(Line::from(""));

    section(&mut lines, "Risk Bands");
    for (band, range) in [
        (RiskBand::Low, "score below 30"),
        (RiskBand::Moderate, "30 to 60"),
        (RiskBand::High, "60 and above"),
    ] {
        key(&mut lines, band.label(), range);
    }
    key(
        &mut lines,
        "Reference",
        &format!("gauge marker at {:.1}", RiskBand::REFERENCE_THRESHOLD),
    );
    key(
        &mut lines,
        "Regular payer",
        &format!("DPD at or below {}", app.config.regular_dpd_threshold),
    );

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>20}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
