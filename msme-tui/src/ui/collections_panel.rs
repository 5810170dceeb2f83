//! Panel 3 — Collections: profession behaviour, payment mix, legal notice
//! and visit coverage per segment.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use msme_core::PortfolioReport;

use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, report: &PortfolioReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    render_professions(f, rows[0], report);
    render_payment_mix(f, bottom[0], report);
    render_coverage(f, bottom[1], report);
}

fn titled(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(title.to_string())
        .title_style(theme::accent_bold())
}

fn pct_cell(value: Option<f64>) -> Cell<'static> {
    match value {
        Some(v) => Cell::from(format!("{v:.1}%")).style(theme::fg(Theme::default().coverage_color(v))),
        None => Cell::from("-").style(theme::muted()),
    }
}

fn render_professions(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let header = Row::new(["Profession", "Customers", "Mean DPD", "Regular %", "Pays Regularly %"])
        .style(theme::accent_bold());
    let body: Vec<Row> = r
        .profession_breakdown
        .iter()
        .map(|(profession, s)| {
            Row::new(vec![
                Cell::from(profession.label()),
                Cell::from(s.customers.to_string()),
                Cell::from(s.mean_dpd.map_or("-".to_string(), |d| format!("{d:.1}"))),
                pct_cell(Some(s.regular_payer_pct)),
                pct_cell(s.payment_regular_pct),
            ])
        })
        .collect();
    let table = Table::new(
        body,
        [
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(17),
        ],
    )
    .header(header)
    .block(titled(" Profession-wise Payment Behaviour "));
    f.render_widget(table, area);
}

fn render_payment_mix(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let total = r.total_customers.max(1) as f64;
    let mut lines = Vec::new();
    for (method, count) in &r.payment_method_mix {
        let share = *count as f64 * 100.0 / total;
        let style = if method.is_digital() {
            theme::positive()
        } else {
            theme::warning()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>8}: ", method.label()), theme::muted()),
            Span::styled(format!("{count:>6}"), style),
            Span::styled(format!("  ({share:.1}%)"), theme::muted()),
        ]));
    }
    f.render_widget(Paragraph::new(lines).block(titled(" Payment Method Mix ")), area);
}

fn render_coverage(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let header = Row::new(["Segment", "Legal Notice %", "Visited %"]).style(theme::accent_bold());
    let body: Vec<Row> = r
        .visit_coverage_by_segment
        .keys()
        .map(|segment| {
            Row::new(vec![
                Cell::from(segment.label()).style(theme::fg(Theme::default().segment_color(*segment))),
                pct_cell(r.legal_notice_coverage_by_segment.get(segment).copied()),
                pct_cell(r.visit_coverage_by_segment.get(segment).copied()),
            ])
        })
        .collect();
    let table = Table::new(
        body,
        [Constraint::Length(14), Constraint::Length(15), Constraint::Length(10)],
    )
    .header(header)
    .block(titled(" Coverage by Segment "));
    f.render_widget(table, area);
}
