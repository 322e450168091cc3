//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::actions::{self, ActionsView};
use super::app::{App, Focus};
use super::compose::{self, ComposeView};
use super::help;
use super::log_pane;
use super::transcript::{self, TranscriptView};

/// Returns status indicator symbol and color for the assistant
fn status_indicator(typing: bool) -> (&'static str, &'static str, Color) {
    if typing {
        ("~", "Typing", Color::Yellow)
    } else {
        ("*", "Online", Color::Green)
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    let widget_area = if app.log.visible {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(main_area);
        log_pane::render(bottom, frame.buffer_mut(), &app.log);
        top
    } else {
        main_area
    };

    if app.session.is_open() {
        render_widget(widget_area, frame, app);
    } else {
        render_launcher(widget_area, frame.buffer_mut(), app);
    }

    render_status(status_area, frame.buffer_mut(), app);

    if app.show_help {
        help::render_help_popup(frame, app.theme.accent);
    }
}

/// Open widget: transcript, quick actions, compose box.
fn render_widget(area: Rect, frame: &mut Frame, app: &App) {
    let options = app.session.current_options();
    let actions_height = actions::height(options, area.width);

    let [transcript_area, actions_area, compose_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(actions_height),
        Constraint::Length(compose::COMPOSE_HEIGHT),
    ])
    .areas(area);

    transcript::render(
        transcript_area,
        frame.buffer_mut(),
        &TranscriptView {
            title: app.site.assistant_name(),
            messages: app.session.messages(),
            typing: app.session.is_typing(),
            theme: app.theme,
        },
        &app.transcript,
    );

    actions::render(
        actions_area,
        frame.buffer_mut(),
        &ActionsView {
            options,
            selected: app.selected,
            focused: app.focus == Focus::Actions,
            enabled: !app.session.is_typing(),
            theme: app.theme,
        },
    );

    compose::render(
        compose_area,
        frame,
        &ComposeView {
            draft: app.session.draft(),
            cursor: &app.cursor,
            placeholder: "Type your message...",
            can_send: app.session.can_submit(),
            typing: app.session.is_typing(),
            focused: app.focus == Focus::Compose,
            theme: app.theme,
        },
    );
}

/// Closed widget: a floating launcher card in the lower right.
fn render_launcher(area: Rect, buf: &mut Buffer, app: &App) {
    let site = app.site;
    let lines = vec![
        Line::from(Span::styled(
            site.assistant_name(),
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            site.assistant_tagline(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" chat with us", Style::default().fg(Color::Gray)),
        ]),
    ];

    let content_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let width = (content_width + 4).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let card = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height),
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.accent));
    let inner = block.inner(card);
    block.render(card, buf);
    Paragraph::new(lines).render(inset(inner, 1), buf);
}

fn inset(area: Rect, h: u16) -> Rect {
    Rect::new(area.x + h, area.y, area.width.saturating_sub(h * 2), area.height)
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let surface = Style::default()
        .fg(app.theme.on_surface)
        .bg(app.theme.surface);

    let title = format!(" {}", app.site.display_name());
    let subtitle = format!("  {}", app.site.assistant_name());

    let (symbol, label, color) = status_indicator(app.session.is_typing());
    let right = format!(" {} {} ", symbol, label);
    let help_hint = " [?] Help ";

    let used = title.width() + subtitle.width() + help_hint.width() + right.width();
    let padding = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(title, surface.add_modifier(Modifier::BOLD)),
        Span::styled(subtitle, surface),
        Span::raw(" ".repeat(padding)),
        Span::styled(help_hint, surface),
        Span::styled(right, Style::default().fg(color).bg(app.theme.surface)),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(app.theme.surface))
        .render(area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    let sep = Span::styled(" | ", Style::default().fg(Color::Gray));
    let hint = |s: &'static str| Span::styled(s, Style::default().fg(Color::Gray));

    let mut spans = vec![Span::styled(
        format!(" {} ", app.site.host()),
        Style::default().fg(Color::Yellow),
    )];

    if app.session.is_open() {
        spans.extend([
            sep.clone(),
            Span::styled(
                format!("Tab: {}", app.focus.as_str()),
                Style::default().fg(app.theme.accent_soft),
            ),
            sep.clone(),
            hint("Esc: close"),
        ]);
    } else {
        spans.extend([sep.clone(), hint("Enter: open"), sep.clone(), hint("q: quit")]);
    }

    spans.extend([
        sep.clone(),
        hint("C-d: log"),
        sep,
        Span::styled(
            format!("{} messages", app.session.messages().len()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::analytics::NoopAnalytics;
    use crate::engine::{ChatSession, SessionOptions};
    use crate::models::Site;
    use crate::script::catalog;
    use crate::tui::log_pane::LogRing;

    fn app(site: Site) -> App {
        let session = ChatSession::new(
            catalog::for_site(site).unwrap(),
            Arc::new(NoopAnalytics),
            SessionOptions::default(),
        );
        App::new(session, site, LogRing::new())
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_launcher_shows_when_closed() {
        let app = app(Site::Implants);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains(Site::Implants.assistant_name()));
        assert!(text.contains("chat with us"));
        assert!(text.contains("q: quit"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_widget_shows_welcome_and_chips() {
        let mut app = app(Site::AboutFace);
        app.session.open();
        app.session.settle().await;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Welcome to AboutFace"));
        assert!(text.contains("1 What is EMFACE?"));
        assert!(text.contains("Type your message..."));
        assert!(text.contains("Online"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_header_shows_typing() {
        let mut app = app(Site::AboutFace);
        app.session.open();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(screen(&terminal).contains("Typing"));
    }
}
