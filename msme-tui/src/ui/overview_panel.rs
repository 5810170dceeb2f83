//! Panel 1 — Overview: headline KPIs, exposure, risk gauge, quick summary.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use chrono::NaiveDateTime;

use msme_core::analyzer::RiskBand;
use msme_core::reporting::quick_summary;
use msme_core::PortfolioReport;

use crate::theme::{self, Theme};

pub fn render(
    f: &mut Frame,
    area: Rect,
    report: &PortfolioReport,
    generated_at: Option<NaiveDateTime>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_kpis(f, top[0], report);
    render_exposure(f, top[1], report);
    render_gauge(f, rows[1], report);
    render_summary(f, rows[2], report, generated_at);
}

fn render_kpis(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let t = Theme::default();
    let mut lines = vec![Line::from(Span::styled("Key Metrics", theme::accent_bold()))];
    kpi(&mut lines, "Total Customers", r.total_customers.to_string(), theme::accent());
    kpi(
        &mut lines,
        "Regular Payers",
        format!("{:.1}%", r.regular_payer_pct),
        theme::fg(t.coverage_color(r.regular_payer_pct)),
    );
    kpi(&mut lines, "Current NPA", format!("{:.1}%", r.current_npa_pct), theme::negative());
    kpi(&mut lines, "Upcoming NPA", format!("{:.1}%", r.upcoming_npa_pct), theme::warning());
    kpi(
        &mut lines,
        "Visit Coverage",
        format!("{:.1}%", r.visit_coverage_pct),
        theme::fg(t.coverage_color(r.visit_coverage_pct)),
    );
    kpi(
        &mut lines,
        "Digital Adoption",
        format!("{:.1}%", r.digital_adoption_pct),
        theme::fg(t.coverage_color(r.digital_adoption_pct)),
    );
    f.render_widget(Paragraph::new(lines), area);
}

fn render_exposure(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let e = &r.exposure;
    let mut lines = vec![Line::from(Span::styled("Exposure", theme::accent_bold()))];
    kpi(&mut lines, "Total Loan Amount", format!("{:.0}", e.total_loan_amount), theme::accent());
    kpi(&mut lines, "Avg Loan Amount", format!("{:.0}", e.avg_loan_amount), theme::accent());
    kpi(&mut lines, "Total EMI", format!("{:.0}", e.total_emi_amount), theme::accent());
    kpi(
        &mut lines,
        "Avg EMIs Paid",
        e.avg_paid_emis.map_or("-".to_string(), |p| format!("{p:.1}")),
        theme::accent(),
    );
    let unclassified = r.segment_count(msme_core::domain::Segment::Unclassified);
    kpi(&mut lines, "Unclassified", unclassified.to_string(), theme::muted());
    kpi(
        &mut lines,
        "DPD Missing",
        r.dpd_distribution.missing.to_string(),
        theme::muted(),
    );
    f.render_widget(Paragraph::new(lines), area);
}

fn render_gauge(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let band = r.risk_band();
    let color = Theme::default().band_color(band);
    let title = format!(
        " Portfolio Risk Score — Low <30 · Moderate 30-60 · High ≥60 · reference {} ",
        RiskBand::REFERENCE_THRESHOLD
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(Span::styled(title, theme::muted())),
        )
        .gauge_style(theme::fg(color).add_modifier(Modifier::BOLD))
        .ratio((r.portfolio_risk_score / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{:.1} ({})", r.portfolio_risk_score, band.label()),
            theme::accent_bold(),
        ));
    f.render_widget(gauge, area);

    // Reference marker on the gauge's bottom border.
    let inner_width = area.width.saturating_sub(2);
    if inner_width > 0 && area.height >= 3 {
        let x = area.x + 1 + (f64::from(inner_width - 1) * RiskBand::REFERENCE_THRESHOLD / 100.0) as u16;
        let marker = Rect::new(x, area.y + area.height - 1, 1, 1);
        f.render_widget(Paragraph::new(Span::styled("▲", theme::neutral())), marker);
    }
}

fn render_summary(
    f: &mut Frame,
    area: Rect,
    r: &PortfolioReport,
    generated_at: Option<NaiveDateTime>,
) {
    let mut lines = vec![Line::from(Span::styled("Quick Summary", theme::accent_bold()))];
    for line in quick_summary(r) {
        lines.push(Line::from(vec![
            Span::styled("  • ", theme::neutral()),
            Span::styled(line, theme::muted()),
        ]));
    }
    if let Some(at) = generated_at {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Report generated at {}", at.format("%Y-%m-%d %H:%M:%S")),
            theme::muted(),
        )));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn kpi<'a>(lines: &mut Vec<Line<'a>>, label: &str, value: String, style: ratatui::style::Style) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:>18}: "), theme::muted()),
        Span::styled(value, style.add_modifier(Modifier::BOLD)),
    ]));
}
