//! Panel 5 — Data: the raw in-scope rows exactly as uploaded.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use msme_core::Snapshot;

use crate::theme;

const MAX_COL_WIDTH: usize = 18;

pub fn render(f: &mut Frame, area: Rect, snapshot: &Snapshot<'_>, scroll: usize) {
    let rows = snapshot.rows();
    if rows.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            "The upload has a header but no rows.",
            theme::muted(),
        )));
        f.render_widget(para, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(area);

    let headers = snapshot.headers();
    let start = scroll.min(rows.len().saturating_sub(1));
    let visible = (chunks[0].height as usize).saturating_sub(1).max(1);
    let window = &rows[start..(start + visible).min(rows.len())];

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in window {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let constraints: Vec<Constraint> = std::iter::once(Constraint::Length(6))
        .chain(
            widths
                .iter()
                .map(|w| Constraint::Length((*w).min(MAX_COL_WIDTH) as u16)),
        )
        .collect();

    let header = Row::new(
        std::iter::once(Cell::from("#"))
            .chain(headers.iter().map(|h| Cell::from(h.to_string()))),
    )
    .style(theme::accent_bold());

    let body: Vec<Row> = window
        .iter()
        .enumerate()
        .map(|(offset, row)| {
            let index = Cell::from(format!("{}", start + offset + 1)).style(theme::muted());
            Row::new(std::iter::once(index).chain(row.iter().map(|c| Cell::from(c.to_string()))))
        })
        .collect();

    let table = Table::new(body, constraints)
        .header(header)
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    let footer = Line::from(Span::styled(
        footer_text(start, window.len(), rows.len()),
        theme::muted(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

fn footer_text(start: usize, shown: usize, total: usize) -> String {
    format!(
        "rows {}-{} of {total}  [j/k]scroll [PgUp/PgDn]page [g/G]top/bottom",
        start + 1,
        start + shown
    )
}
