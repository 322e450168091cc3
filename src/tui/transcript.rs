//! Transcript pane: message cards, newest at the bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::{Message, Origin};

use super::theme::Theme;

/// Cards never get wider than this share of the pane (percent).
const CARD_WIDTH_PCT: usize = 85;

/// Scroll position of the transcript.
#[derive(Default)]
pub struct TranscriptScroll {
    /// Lines scrolled back from the bottom (0 = following the newest)
    pub back: usize,
    /// Message count at the last render, used to snap back on new messages
    seen: usize,
}

impl TranscriptScroll {
    /// Snap to the newest entry whenever the transcript grew.
    pub fn observe(&mut self, message_count: usize) {
        if message_count != self.seen {
            self.seen = message_count;
            self.back = 0;
        }
    }

    pub fn page_up(&mut self, n: usize) {
        self.back = self.back.saturating_add(n);
    }

    pub fn page_down(&mut self, n: usize) {
        self.back = self.back.saturating_sub(n);
    }
}

pub struct TranscriptView<'a> {
    pub title: &'a str,
    pub messages: &'a [Message],
    pub typing: bool,
    pub theme: Theme,
}

pub fn render(area: Rect, buf: &mut Buffer, view: &TranscriptView, scroll: &TranscriptScroll) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default()
                .fg(view.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let lines = build_lines(view, inner.width as usize);
    let height = inner.height as usize;
    let max_back = lines.len().saturating_sub(height);
    let back = scroll.back.min(max_back);
    let end = lines.len() - back;
    let start = end.saturating_sub(height);

    for (row, line) in lines[start..end].iter().enumerate() {
        let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        Paragraph::new(line.clone()).render(line_area, buf);
    }

    let marker_x = inner.x + inner.width.saturating_sub(1);
    if start > 0 {
        buf[(marker_x, inner.y)]
            .set_char('^')
            .set_style(Style::default().fg(Color::DarkGray));
    }
    if back > 0 {
        buf[(marker_x, inner.y + inner.height - 1)]
            .set_char('v')
            .set_style(Style::default().fg(Color::DarkGray));
    }
}

/// Flatten every message (plus the typing bubble) into display lines.
fn build_lines(view: &TranscriptView, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let card_width = (width * CARD_WIDTH_PCT / 100).max(12).min(width);

    for msg in view.messages {
        push_card(&mut lines, msg, width, card_width, view.theme);
        lines.push(Line::from(""));
    }

    if view.typing {
        lines.push(Line::from(Span::styled(
            " Typing . . .",
            Style::default()
                .fg(view.theme.accent_soft)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// One bordered card. Visitor cards hug the right edge, assistant cards
/// the left.
fn push_card(
    lines: &mut Vec<Line<'static>>,
    msg: &Message,
    width: usize,
    card_width: usize,
    theme: Theme,
) {
    let text_width = card_width.saturating_sub(4);
    if text_width < 4 {
        return;
    }

    let (indent, border, who) = match msg.origin {
        Origin::User => (
            " ".repeat(width.saturating_sub(card_width)),
            Style::default().fg(theme.accent_soft),
            "You",
        ),
        Origin::Assistant => (
            String::new(),
            Style::default().fg(theme.accent),
            "Assistant",
        ),
    };

    let time = msg.created_at.format("%H:%M").to_string();
    let header_pad = text_width.saturating_sub(who.width() + time.width());
    let rule = "-".repeat(card_width.saturating_sub(2));

    lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(format!("+{}+", rule), border),
    ]));
    lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled("| ", border),
        Span::styled(
            who.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(header_pad)),
        Span::styled(time, Style::default().fg(Color::DarkGray)),
        Span::styled(" |", border),
    ]));

    for text_line in wrap_text(&msg.text, text_width) {
        let pad = text_width.saturating_sub(text_line.width());
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled("| ", border),
            Span::raw(format!("{}{}", text_line, " ".repeat(pad))),
            Span::styled(" |", border),
        ]));
    }

    lines.push(Line::from(vec![
        Span::raw(indent),
        Span::styled(format!("+{}+", rule), border),
    ]));
}

/// Wrap on whitespace by display width; explicit newlines are kept and
/// blank lines survive. Words longer than the width are split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for raw in text.split('\n') {
        if raw.width() <= max_width {
            out.push(raw.to_string());
            continue;
        }

        let mut current = String::new();
        for word in raw.split_whitespace() {
            let needed = if current.is_empty() {
                word.width()
            } else {
                current.width() + 1 + word.width()
            };
            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }

            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current.width() + w > max_width {
                    out.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_blank_lines() {
        let wrapped = wrap_text("Key Benefits:\n\n- No downtime", 40);
        assert_eq!(wrapped, vec!["Key Benefits:", "", "- No downtime"]);
    }

    #[test]
    fn test_wrap_long_line_on_words() {
        let wrapped = wrap_text("one two three four", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let wrapped = wrap_text("www.aboutfaceaesthetics.com/book", 10);
        assert_eq!(
            wrapped,
            vec!["www.aboutf", "aceaesthet", "ics.com/bo", "ok"]
        );
    }

    #[test]
    fn test_scroll_snaps_to_bottom_on_new_message() {
        let mut scroll = TranscriptScroll::default();
        scroll.observe(1);
        scroll.page_up(10);
        assert_eq!(scroll.back, 10);

        scroll.observe(1);
        assert_eq!(scroll.back, 10);

        scroll.observe(2);
        assert_eq!(scroll.back, 0);
    }

    #[test]
    fn test_user_cards_are_right_aligned() {
        let messages = vec![
            Message::assistant("Hi", vec![]),
            Message::user("Hello"),
        ];
        let view = TranscriptView {
            title: "AboutFace",
            messages: &messages,
            typing: true,
            theme: Theme::for_site(crate::models::Site::AboutFace),
        };
        let lines = build_lines(&view, 40);

        let first = lines[0].spans[0].content.to_string();
        assert!(first.is_empty(), "assistant card starts at the left edge");

        // Assistant card is 4 lines + blank separator.
        let user_top = lines[5].spans[0].content.to_string();
        assert_eq!(user_top.len(), 40 - 34);

        let last = lines.last().unwrap().spans[0].content.to_string();
        assert!(last.contains("Typing"));
    }
}
