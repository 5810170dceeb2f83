//! Panel 4 — DPD: days-past-due histogram and irregular payment reasons.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use msme_core::analyzer::DpdBin;
use msme_core::PortfolioReport;

use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, report: &PortfolioReport) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_histogram(f, cols[0], report);
    render_reasons(f, cols[1], report);
}

fn bin_color(bin: &DpdBin) -> ratatui::style::Color {
    let t = Theme::default();
    match bin.upper {
        Some(0) => t.positive,
        Some(u) if u <= 30 => t.caution,
        Some(u) if u <= 90 => t.warning,
        _ => t.negative,
    }
}

fn render_histogram(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let h = &r.dpd_distribution;
    let title = format!(
        " DPD Distribution ({} known, {} missing) ",
        h.total(),
        h.missing
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(title)
        .title_style(theme::accent_bold());

    if h.bins.is_empty() {
        let para = Paragraph::new(Span::styled("No records with a known DPD.", theme::muted()))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let n = h.bins.len() as u16;
    let bar_width = (inner_width / n.max(1)).saturating_sub(1).clamp(1, 9);
    let bar_gap = u16::from(bar_width > 2);

    let bars: Vec<Bar> = h
        .bins
        .iter()
        .map(|bin| {
            let color = bin_color(bin);
            Bar::default()
                .label(Line::from(bin.label.clone()))
                .value(bin.count as u64)
                .style(theme::fg(color))
                .value_style(theme::fg(color).add_modifier(Modifier::REVERSED))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap);
    f.render_widget(chart, area);
}

fn render_reasons(f: &mut Frame, area: Rect, r: &PortfolioReport) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Irregular Payment Reasons ")
        .title_style(theme::accent_bold());

    let reasons = &r.irregular_reason_distribution;
    if reasons.is_empty() {
        let para = Paragraph::new(Span::styled("No irregular payers.", theme::muted())).block(block);
        f.render_widget(para, area);
        return;
    }

    let mut sorted: Vec<(&String, &usize)> = reasons.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let max = sorted.first().map_or(1, |(_, c)| **c).max(1);

    let label_width = 16usize;
    let bar_room = (area.width as usize).saturating_sub(label_width + 12).max(1);

    let lines: Vec<Line> = sorted
        .into_iter()
        .map(|(reason, count)| {
            let filled = (*count * bar_room).div_ceil(max);
            let mut label: String = reason.chars().take(label_width).collect();
            if reason.chars().count() > label_width {
                label.pop();
                label.push('…');
            }
            Line::from(vec![
                Span::styled(format!(" {label:<label_width$} "), theme::muted()),
                Span::styled("█".repeat(filled), theme::warning()),
                Span::styled(format!(" {count}"), theme::accent()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
