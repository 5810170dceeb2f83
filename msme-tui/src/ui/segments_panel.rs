//! Panel 2 — Segments: customer counts and shares per segment and per risk
//! zone, plus paid EMIs against loan amount by segment.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
};
use ratatui::Frame;

use msme_core::analyzer::{emi_vs_loan, pct};
use msme_core::{PortfolioReport, Snapshot};

use crate::theme::{self, Theme};

const BAR_WIDTH: u16 = 12;

pub fn render(f: &mut Frame, area: Rect, report: &PortfolioReport, snapshot: &Snapshot<'_>) {
    let t = Theme::default();
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[0]);

    let total = report.total_customers;
    let segment_bars: Vec<Bar> = report
        .segment_distribution
        .iter()
        .map(|(segment, count)| {
            bar(segment.label(), *count, total, t.segment_color(*segment))
        })
        .collect();
    render_bars(f, top[0], " Portfolio by Segment ", segment_bars);

    let zone_bars: Vec<Bar> = report
        .risk_zone_distribution
        .iter()
        .map(|(zone, count)| bar(zone.label(), *count, total, t.zone_color(*zone)))
        .collect();
    render_bars(f, top[1], " Risk Zone Distribution ", zone_bars);

    render_emi_scatter(f, halves[1], snapshot, &t);
}

fn bar(label: &'static str, count: usize, total: usize, color: Color) -> Bar<'static> {
    Bar::default()
        .label(Line::from(label))
        .value(count as u64)
        .text_value(format!("{count} ({:.0}%)", pct(count, total)))
        .style(theme::fg(color))
        .value_style(theme::fg(color).add_modifier(Modifier::REVERSED))
}

fn render_bars(f: &mut Frame, area: Rect, title: &str, bars: Vec<Bar>) {
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(title.to_string())
                .title_style(theme::accent_bold()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(2);
    f.render_widget(chart, area);
}

fn render_emi_scatter(f: &mut Frame, area: Rect, snapshot: &Snapshot<'_>, t: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" EMIs Paid vs Loan Amount ")
        .title_style(theme::accent_bold());

    let points = emi_vs_loan(snapshot.records());
    if points.is_empty() {
        let para = Paragraph::new(Span::styled(
            "No records with both loan_amount and paid_emis.",
            theme::muted(),
        ))
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let (max_loan, max_paid) = points
        .values()
        .flatten()
        .fold((0.0_f64, 0.0_f64), |(x, y), (loan, paid)| {
            (x.max(*loan), y.max(*paid))
        });
    let max_loan = max_loan.max(1.0);
    let max_paid = max_paid.max(1.0);

    let datasets: Vec<Dataset> = points
        .iter()
        .map(|(segment, pts)| {
            Dataset::default()
                .name(segment.label())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(theme::fg(t.segment_color(*segment)))
                .data(pts)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Loan Amount", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, max_loan])
                .labels(axis_labels(max_loan)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Paid EMIs", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, max_paid])
                .labels(axis_labels(max_paid)),
        );
    f.render_widget(chart, area);
}

fn axis_labels(max: f64) -> Vec<Span<'static>> {
    vec![
        Span::styled("0", theme::muted()),
        Span::styled(format!("{:.0}", max / 2.0), theme::muted()),
        Span::styled(format!("{max:.0}"), theme::muted()),
    ]
}
