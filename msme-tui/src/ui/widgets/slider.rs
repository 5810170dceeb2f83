//! Row-limit slider.
//!
//! Two lines: the "Using first N rows out of M" scope line and a horizontal
//! track with the knob placed proportionally between the bounds.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use msme_core::RowLimitBounds;

use crate::theme;

const TRACK: &str = "━";
const REST: &str = "─";
const KNOB: &str = "●";

pub fn render(f: &mut Frame, area: Rect, bounds: RowLimitBounds, value: usize) {
    let hint = format!("  [/] step {}  Home/End min/max", bounds.step);
    let label = format!(" {value:>6} ");
    let track_width = (area.width as usize).saturating_sub(hint.len() + label.len() + 2);

    let knob = knob_position(bounds, value, track_width);
    let mut track = Vec::with_capacity(5);
    track.push(Span::raw(" "));
    track.push(Span::styled(TRACK.repeat(knob), theme::accent()));
    if track_width > 0 {
        track.push(Span::styled(KNOB, theme::accent_bold()));
        track.push(Span::styled(
            REST.repeat(track_width.saturating_sub(knob + 1)),
            theme::muted(),
        ));
    }
    track.push(Span::styled(label, theme::accent_bold()));
    track.push(Span::styled(hint, theme::muted()));

    let lines = vec![
        Line::from(vec![
            Span::styled(" Rows: ", theme::muted()),
            Span::styled(scope_line(bounds, value), theme::accent()),
        ]),
        Line::from(track),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

pub fn scope_line(bounds: RowLimitBounds, value: usize) -> String {
    format!("Using first {value} rows out of {}", bounds.max)
}

/// Knob cell in `[0, width)`; 0 when the track has no room or no range.
pub fn knob_position(bounds: RowLimitBounds, value: usize, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let span = bounds.max.saturating_sub(bounds.min);
    if span == 0 {
        return width - 1;
    }
    let offset = bounds.clamp(value) - bounds.min;
    offset * (width - 1) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_spans_track() {
        let b = RowLimitBounds::for_rows(1100);
        assert_eq!(knob_position(b, 100, 41), 0);
        assert_eq!(knob_position(b, 1100, 41), 40);
        assert_eq!(knob_position(b, 600, 41), 20);
    }

    #[test]
    fn degenerate_tracks() {
        let b = RowLimitBounds::for_rows(1);
        assert_eq!(knob_position(b, 1, 10), 9);
        assert_eq!(knob_position(b, 1, 0), 0);
        assert_eq!(knob_position(RowLimitBounds::for_rows(0), 0, 5), 4);
    }

    #[test]
    fn scope_text() {
        let b = RowLimitBounds::for_rows(500);
        assert_eq!(scope_line(b, 250), "Using first 250 rows out of 500");
    }
}
