//! In-app log capture.
//!
//! While the alternate screen is up, tracing output goes into a shared ring
//! instead of stderr. The log pane drains the ring on every frame and keeps
//! a longer history for scrolling.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use tracing_subscriber::fmt::MakeWriter;

/// Lines held between drains.
const RING_CAPACITY: usize = 500;

/// Lines the pane keeps for scrollback.
const HISTORY_LIMIT: usize = 1000;

/// Shared line ring that tracing-subscriber writes into.
#[derive(Clone, Default)]
pub struct LogRing {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, evicting the oldest when full. A poisoned lock is
    /// recovered rather than propagated.
    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() >= RING_CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Take everything buffered so far, oldest first.
    pub fn take(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.drain(..).collect()
    }
}

/// Per-event writer: collects bytes and forwards whole lines.
pub struct RingWriter {
    ring: LogRing,
    partial: Vec<u8>,
}

impl RingWriter {
    fn forward_complete_lines(&mut self) {
        while let Some(end) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=end).collect();
            self.ring
                .push(String::from_utf8_lossy(&line[..end]).into_owned());
        }
    }
}

impl Write for RingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.partial.extend_from_slice(buf);
        self.forward_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.partial.is_empty() {
            let rest = std::mem::take(&mut self.partial);
            self.ring.push(String::from_utf8_lossy(&rest).into_owned());
        }
        Ok(())
    }
}

impl Drop for RingWriter {
    fn drop(&mut self) {
        let _ = Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for LogRing {
    type Writer = RingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RingWriter {
            ring: self.clone(),
            partial: Vec::new(),
        }
    }
}

/// Toggleable log pane state.
pub struct LogPane {
    ring: LogRing,
    history: Vec<String>,
    pub visible: bool,
    /// Lines scrolled back from the newest (0 = following)
    scroll_back: usize,
}

impl LogPane {
    pub fn new(ring: LogRing) -> Self {
        Self {
            ring,
            history: Vec::new(),
            visible: false,
            scroll_back: 0,
        }
    }

    /// Pull new lines out of the ring. Call once per frame.
    pub fn refresh(&mut self) {
        let fresh = self.ring.take();
        if fresh.is_empty() {
            return;
        }
        self.history.extend(fresh);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
            self.scroll_back = self.scroll_back.saturating_sub(excess);
        }
    }

    /// Show or hide; showing jumps back to the newest line.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_back = 0;
        }
    }

    pub fn scroll_up(&mut self, n: usize) {
        let max = self.history.len().saturating_sub(1);
        self.scroll_back = (self.scroll_back + n).min(max);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(n);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.history.len()
    }
}

pub fn render(area: Rect, buf: &mut Buffer, pane: &LogPane) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Log (Ctrl+D) ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let end = pane.history.len().saturating_sub(pane.scroll_back);
    let start = end.saturating_sub(inner.height as usize);
    let lines: Vec<Line> = pane.history[start..end]
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), level_style(l))))
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

/// Color a fmt-layer line by its level column.
fn level_style(line: &str) -> Style {
    let color = if line.contains(" ERROR ") {
        Color::Red
    } else if line.contains(" WARN ") {
        Color::Yellow
    } else if line.contains(" INFO ") {
        Color::Green
    } else if line.contains(" DEBUG ") || line.contains(" TRACE ") {
        Color::DarkGray
    } else {
        Color::White
    };
    Style::default().fg(color)
}
