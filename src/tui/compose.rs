//! Compose box: edits the session's draft text and shows the send state.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

/// Cursor over the session's draft. The text itself lives in the session.
#[derive(Default)]
pub struct ComposeCursor {
    /// Character offset into the draft
    pub pos: usize,
}

impl ComposeCursor {
    pub fn insert_char(&mut self, draft: &mut String, c: char) {
        let at = byte_offset(draft, self.pos);
        draft.insert(at, c);
        self.pos += 1;
    }

    pub fn backspace(&mut self, draft: &mut String) {
        if self.pos == 0 {
            return;
        }
        let end = byte_offset(draft, self.pos);
        let start = byte_offset(draft, self.pos - 1);
        draft.drain(start..end);
        self.pos -= 1;
    }

    pub fn delete(&mut self, draft: &mut String) {
        if self.pos < draft.chars().count() {
            let start = byte_offset(draft, self.pos);
            let end = byte_offset(draft, self.pos + 1);
            draft.drain(start..end);
        }
    }

    pub fn left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn right(&mut self, draft: &str) {
        self.pos = (self.pos + 1).min(draft.chars().count());
    }

    pub fn home(&mut self) {
        self.pos = 0;
    }

    pub fn end(&mut self, draft: &str) {
        self.pos = draft.chars().count();
    }

    /// Keep the cursor inside the draft after the session changed it.
    pub fn clamp(&mut self, draft: &str) {
        self.pos = self.pos.min(draft.chars().count());
    }
}

fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Border + input line + hint line + border.
pub const COMPOSE_HEIGHT: u16 = 4;

/// What the compose box needs from the app.
pub struct ComposeView<'a> {
    pub draft: &'a str,
    pub cursor: &'a ComposeCursor,
    pub placeholder: &'a str,
    pub can_send: bool,
    pub typing: bool,
    pub focused: bool,
    pub theme: Theme,
}

pub fn render(area: Rect, frame: &mut Frame, view: &ComposeView) {
    let border_style = if view.focused {
        Style::default().fg(view.theme.accent)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if view.focused {
            BorderType::Rounded
        } else {
            BorderType::Plain
        })
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let width = input_area.width as usize;

    if view.draft.is_empty() {
        let placeholder: String = format!(" {}", view.placeholder).chars().take(width).collect();
        frame.render_widget(
            Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray))),
            input_area,
        );
        if view.focused {
            frame.set_cursor_position((input_area.x + 1, input_area.y));
        }
    } else {
        let visible = visible_window(view.draft, view.cursor.pos, width);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", visible.text),
                Style::default().fg(Color::White),
            )),
            input_area,
        );
        if view.focused {
            frame.set_cursor_position((input_area.x + 1 + visible.cursor_col as u16, input_area.y));
        }
    }

    if inner.height >= 2 {
        let hint_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
        render_hint(hint_area, frame, view);
    }
}

/// Status line under the input: typing indicator on the left, send state
/// on the right.
fn render_hint(area: Rect, frame: &mut Frame, view: &ComposeView) {
    let left = if view.typing {
        Span::styled(
            " Typing...",
            Style::default()
                .fg(view.theme.accent_soft)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(" Enter to send", Style::default().fg(Color::DarkGray))
    };

    let send_label = "[ Send > ]";
    let send_style = if view.can_send {
        Style::default()
            .fg(view.theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let used = left.width() + send_label.width() + 1;
    let padding = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        left,
        Span::raw(" ".repeat(padding)),
        Span::styled(send_label, send_style),
        Span::raw(" "),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

struct VisibleWindow {
    text: String,
    /// Cursor column within `text`
    cursor_col: usize,
}

/// Slice of the draft that fits on one line with the cursor in view.
/// Newlines show as `" | "`.
fn visible_window(draft: &str, cursor: usize, width: usize) -> VisibleWindow {
    let avail = width.saturating_sub(1);
    if avail == 0 {
        return VisibleWindow {
            text: String::new(),
            cursor_col: 0,
        };
    }

    let mut flat: Vec<char> = Vec::with_capacity(draft.len());
    let mut flat_cursor = 0;
    for (i, ch) in draft.chars().enumerate() {
        if i == cursor {
            flat_cursor = flat.len();
        }
        if ch == '\n' {
            flat.extend([' ', '|', ' ']);
        } else {
            flat.push(ch);
        }
    }
    if cursor >= draft.chars().count() {
        flat_cursor = flat.len();
    }

    let start = if flat_cursor < avail {
        0
    } else {
        flat_cursor + 1 - avail
    };
    let end = (start + avail).min(flat.len());

    VisibleWindow {
        text: flat[start..end].iter().collect(),
        cursor_col: flat_cursor - start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte_draft() {
        let mut draft = String::new();
        let mut cursor = ComposeCursor::default();
        for c in "héllo".chars() {
            cursor.insert_char(&mut draft, c);
        }
        assert_eq!(draft, "héllo");

        cursor.home();
        cursor.right(&draft);
        cursor.delete(&mut draft);
        assert_eq!(draft, "hllo");

        cursor.end(&draft);
        cursor.backspace(&mut draft);
        assert_eq!(draft, "hll");
        assert_eq!(cursor.pos, 3);
    }

    #[test]
    fn test_clamp_after_session_clears_draft() {
        let mut draft = "sent text".to_string();
        let mut cursor = ComposeCursor::default();
        cursor.end(&draft);
        draft.clear();
        cursor.clamp(&draft);
        assert_eq!(cursor.pos, 0);
    }

    #[test]
    fn test_visible_window_scrolls_to_cursor() {
        let window = visible_window("abcdefghij", 10, 5);
        assert_eq!(window.text, "hij");
        assert_eq!(window.cursor_col, 3);

        let start = visible_window("abcdefghij", 0, 5);
        assert_eq!(start.text, "abcd");
        assert_eq!(start.cursor_col, 0);
    }

    #[test]
    fn test_visible_window_flattens_newlines() {
        let window = visible_window("a\nb", 3, 20);
        assert_eq!(window.text, "a | b");
        assert_eq!(window.cursor_col, 5);
    }
}
