//! Quick-action chips offered under the latest assistant message.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::models::QuickAction;

use super::theme::Theme;

/// Gap between chips on one row.
const CHIP_GAP: usize = 1;

fn chip_label(index: usize, option: &QuickAction) -> String {
    if index < 9 {
        format!(" {} {} ", index + 1, option.label)
    } else {
        format!(" {} ", option.label)
    }
}

/// Flow chips left to right, wrapping onto new rows. Returns the chip
/// indices on each row.
fn flow(options: &[QuickAction], width: usize) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut used = 0;

    for (i, option) in options.iter().enumerate() {
        let w = chip_label(i, option).width();
        let fits = used == 0 || used + CHIP_GAP + w <= width;
        if !fits || rows.is_empty() {
            rows.push(Vec::new());
            used = 0;
        }
        used += if used == 0 { w } else { CHIP_GAP + w };
        if let Some(row) = rows.last_mut() {
            row.push(i);
        }
    }
    rows
}

/// Rows the chip bar needs at this width (0 when nothing is offered).
pub fn height(options: &[QuickAction], width: u16) -> u16 {
    flow(options, width as usize).len() as u16
}

pub struct ActionsView<'a> {
    pub options: &'a [QuickAction],
    pub selected: usize,
    pub focused: bool,
    /// Chips are inert while a reply is pending
    pub enabled: bool,
    pub theme: Theme,
}

pub fn render(area: Rect, buf: &mut Buffer, view: &ActionsView) {
    if area.height == 0 || view.options.is_empty() {
        return;
    }

    let rows = flow(view.options, area.width as usize);
    for (row_idx, row) in rows.iter().take(area.height as usize).enumerate() {
        let mut spans = Vec::new();
        for (n, &i) in row.iter().enumerate() {
            if n > 0 {
                spans.push(Span::raw(" ".repeat(CHIP_GAP)));
            }
            spans.push(Span::styled(
                chip_label(i, &view.options[i]),
                chip_style(view, i),
            ));
        }
        let row_area = Rect::new(area.x, area.y + row_idx as u16, area.width, 1);
        Paragraph::new(Line::from(spans)).render(row_area, buf);
    }
}

fn chip_style(view: &ActionsView, index: usize) -> Style {
    if !view.enabled {
        return Style::default().fg(Color::DarkGray);
    }
    if view.focused && index == view.selected {
        Style::default()
            .fg(view.theme.on_surface)
            .bg(view.theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(view.theme.accent)
            .add_modifier(Modifier::REVERSED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(labels: &[&str]) -> Vec<QuickAction> {
        labels
            .iter()
            .map(|l| QuickAction::to(&l.to_lowercase(), l))
            .collect()
    }

    #[test]
    fn test_flow_wraps_rows() {
        // " 1 Pricing " = 11, " 2 Financing " = 13, " 3 Book " = 8
        let opts = options(&["Pricing", "Financing", "Book"]);
        assert_eq!(flow(&opts, 80), vec![vec![0, 1, 2]]);
        assert_eq!(flow(&opts, 25), vec![vec![0, 1], vec![2]]);
        assert_eq!(flow(&opts, 10), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_height_is_zero_without_options() {
        assert_eq!(height(&[], 80), 0);
        assert_eq!(height(&options(&["A", "B"]), 80), 1);
    }

    #[test]
    fn test_chip_numbering_stops_after_nine() {
        let opt = QuickAction::to("x", "X");
        assert_eq!(chip_label(0, &opt), " 1 X ");
        assert_eq!(chip_label(9, &opt), " X ");
    }
}
