//! Help popup: key bindings grouped by where they apply.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const POPUP_WIDTH: u16 = 72;
const POPUP_HEIGHT: u16 = 20;

struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

struct Category {
    title: &'static str,
    shortcuts: &'static [Shortcut],
}

const WIDGET: Category = Category {
    title: "WIDGET",
    shortcuts: &[
        Shortcut {
            key: "Enter / c",
            desc: "Open chat (launcher)",
        },
        Shortcut {
            key: "Esc",
            desc: "Close chat",
        },
        Shortcut {
            key: "Tab",
            desc: "Actions <-> compose",
        },
        Shortcut {
            key: "PgUp/PgDn",
            desc: "Scroll transcript",
        },
    ],
};

const ACTIONS: Category = Category {
    title: "QUICK ACTIONS",
    shortcuts: &[
        Shortcut {
            key: "Left/Right",
            desc: "Move selection",
        },
        Shortcut {
            key: "Enter",
            desc: "Choose option",
        },
        Shortcut {
            key: "1-9",
            desc: "Choose by number",
        },
    ],
};

const COMPOSE: Category = Category {
    title: "COMPOSE",
    shortcuts: &[
        Shortcut {
            key: "Enter",
            desc: "Send message",
        },
        Shortcut {
            key: "Ctrl+U",
            desc: "Clear draft",
        },
    ],
};

const MISC: Category = Category {
    title: "MISC",
    shortcuts: &[
        Shortcut {
            key: "F1 / ?",
            desc: "Toggle this help",
        },
        Shortcut {
            key: "Ctrl+D",
            desc: "Toggle log pane",
        },
        Shortcut {
            key: "q",
            desc: "Quit (launcher)",
        },
        Shortcut {
            key: "Ctrl+C",
            desc: "Quit",
        },
    ],
};

/// Centered overlay with every binding in two columns.
pub fn render_help_popup(frame: &mut Frame, accent: Color) {
    let area = frame.area();
    let popup_area = centered_rect(
        POPUP_WIDTH.min(area.width.saturating_sub(2)),
        POPUP_HEIGHT.min(area.height.saturating_sub(2)),
        area,
    );

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            " HELP ",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(Color::Gray),
        )));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    frame.render_widget(
        Paragraph::new(column_lines(&[&WIDGET, &ACTIONS])),
        inset(left, 1, 1),
    );
    frame.render_widget(
        Paragraph::new(column_lines(&[&COMPOSE, &MISC])),
        inset(right, 1, 1),
    );
}

fn column_lines(categories: &[&Category]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, cat) in categories.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            cat.title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "\u{2500}".repeat(30),
            Style::default().fg(Color::DarkGray),
        )));
        for sc in cat.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", sc.key), Style::default().fg(Color::Yellow)),
                Span::styled(sc.desc, Style::default().fg(Color::Gray)),
            ]));
        }
    }

    lines
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn inset(area: Rect, h: u16, v: u16) -> Rect {
    Rect::new(
        area.x + h,
        area.y + v,
        area.width.saturating_sub(h * 2),
        area.height.saturating_sub(v * 2),
    )
}
