//! TUI application state and main event loop

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use ratatui::DefaultTerminal;
use tokio::time::MissedTickBehavior;

use crate::engine::ChatSession;
use crate::models::Site;

use super::compose::ComposeCursor;
use super::log_pane::{LogPane, LogRing};
use super::theme::Theme;
use super::transcript::TranscriptScroll;
use super::ui;

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Lines moved per PgUp/PgDn.
const PAGE_LINES: usize = 10;

/// Which part of the open widget takes keys
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    #[default]
    Actions,
    Compose,
}

impl Focus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Actions => "quick actions",
            Focus::Compose => "compose",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Focus::Actions => Focus::Compose,
            Focus::Compose => Focus::Actions,
        }
    }
}

/// Application state
pub struct App {
    pub session: ChatSession,
    pub site: Site,
    pub theme: Theme,
    pub focus: Focus,
    /// Highlighted quick action
    pub selected: usize,
    pub cursor: ComposeCursor,
    pub transcript: TranscriptScroll,
    pub log: LogPane,
    pub show_help: bool,
    pub should_exit: bool,
}

impl App {
    pub fn new(session: ChatSession, site: Site, logs: LogRing) -> Self {
        Self {
            session,
            site,
            theme: Theme::for_site(site),
            focus: Focus::default(),
            selected: 0,
            cursor: ComposeCursor::default(),
            transcript: TranscriptScroll::default(),
            log: LogPane::new(logs),
            show_help: false,
            should_exit: false,
        }
    }

    pub fn handle_terminal_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key)?;
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_exit = true,
                KeyCode::Char('d') => self.log.toggle(),
                KeyCode::Char('u') if self.focus == Focus::Compose => {
                    self.session.set_draft("");
                    self.cursor.home();
                }
                _ => {}
            }
            return Ok(());
        }

        if self.show_help {
            self.show_help = false;
            return Ok(());
        }
        if key.code == KeyCode::F(1) {
            self.show_help = true;
            return Ok(());
        }

        if !self.session.is_open() {
            match key.code {
                KeyCode::Enter | KeyCode::Char('c') => self.session.open(),
                KeyCode::Char('q') => self.should_exit = true,
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                self.session.close();
                return Ok(());
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggled();
                return Ok(());
            }
            KeyCode::PageUp => {
                if self.log.visible {
                    self.log.scroll_up(PAGE_LINES);
                } else {
                    self.transcript.page_up(PAGE_LINES);
                }
                return Ok(());
            }
            KeyCode::PageDown => {
                if self.log.visible {
                    self.log.scroll_down(PAGE_LINES);
                } else {
                    self.transcript.page_down(PAGE_LINES);
                }
                return Ok(());
            }
            _ => {}
        }

        match self.focus {
            Focus::Actions => self.handle_actions_key(key.code),
            Focus::Compose => {
                self.handle_compose_key(key.code);
                Ok(())
            }
        }
    }

    fn handle_actions_key(&mut self, code: KeyCode) -> Result<()> {
        let count = self.session.current_options().len();
        match code {
            KeyCode::Left => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right if count > 0 => self.selected = (self.selected + 1).min(count - 1),
            KeyCode::Enter => self.choose(self.selected)?,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = (c as u8 - b'1') as usize;
                self.choose(index)?;
            }
            // Any other printable key starts a message.
            KeyCode::Char(c) => {
                self.focus = Focus::Compose;
                self.cursor.insert_char(self.session.draft_mut(), c);
            }
            _ => {}
        }
        Ok(())
    }

    /// Pick the quick action at `index`. Inert while a reply is pending.
    fn choose(&mut self, index: usize) -> Result<()> {
        if self.session.is_typing() {
            return Ok(());
        }
        let Some(option) = self.session.current_options().get(index).cloned() else {
            return Ok(());
        };
        self.session
            .select_option(&option)
            .context("Quick action points outside the script")?;
        self.selected = 0;
        Ok(())
    }

    fn handle_compose_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                if self.session.can_submit() && self.session.submit_draft() {
                    self.cursor.home();
                }
            }
            KeyCode::Char(c) => self.cursor.insert_char(self.session.draft_mut(), c),
            KeyCode::Backspace => self.cursor.backspace(self.session.draft_mut()),
            KeyCode::Delete => self.cursor.delete(self.session.draft_mut()),
            KeyCode::Left => self.cursor.left(),
            KeyCode::Right => self.cursor.right(self.session.draft()),
            KeyCode::Home => self.cursor.home(),
            KeyCode::End => self.cursor.end(self.session.draft()),
            _ => {}
        }
    }

    /// Reconcile view state with the session after any change.
    fn sync(&mut self) {
        self.log.refresh();
        self.cursor.clamp(self.session.draft());
        self.transcript.observe(self.session.messages().len());
        let count = self.session.current_options().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    pub fn render(&self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the TUI with panic-safe terminal restore.
///
/// Tracing output should already be routed into `logs`; anything written
/// to stderr would land on the alternate screen.
pub async fn run(session: ChatSession, site: Site, logs: LogRing) -> Result<()> {
    let mut terminal = ratatui::init();
    let app = App::new(session, site, logs);
    let result = AssertUnwindSafe(run_app(&mut terminal, app))
        .catch_unwind()
        .await;
    ratatui::restore();

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

async fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(FRAME_DURATION);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        site = %app.site,
        script = app.session.script().name(),
        typing_delay_ms = app.session.typing_delay().as_millis() as u64,
        "chat widget ready"
    );

    while !app.should_exit {
        app.sync();
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => app.handle_terminal_event(event)?,
                Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                None => app.should_exit = true,
            },
            Some(event) = app.session.next_event() => app.session.handle_event(event),
            _ = tick.tick() => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analytics::NoopAnalytics;
    use crate::engine::SessionOptions;
    use crate::script::catalog;

    fn app() -> App {
        let session = ChatSession::new(
            catalog::for_site(Site::AboutFace).unwrap(),
            Arc::new(NoopAnalytics),
            SessionOptions::default(),
        );
        App::new(session, Site::AboutFace, LogRing::new())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_terminal_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
        app.sync();
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_terminal_event(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
        .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_launcher_opens_and_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.session.is_open());

        press(&mut app, KeyCode::Enter);
        assert!(app.session.is_open());

        press(&mut app, KeyCode::Esc);
        assert!(!app.session.is_open());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_digit_selects_quick_action() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        app.session.settle().await;
        app.sync();

        // Welcome menu: emface-info, treatment-options, book-consultation, pricing
        press(&mut app, KeyCode::Char('4'));
        app.session.settle().await;

        let texts: Vec<&str> = app
            .session
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[1], "Pricing Information");
    }

    #[tokio::test(start_paused = true)]
    async fn test_actions_are_inert_while_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.session.settle().await;
        app.sync();

        press(&mut app, KeyCode::Enter);
        assert!(app.session.is_typing());
        press(&mut app, KeyCode::Char('2'));
        app.session.settle().await;

        assert_eq!(app.session.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compose_sends_and_clears() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.session.settle().await;

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Compose);
        for c in "hi there".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.session.draft(), "hi there");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.draft(), "");
        assert_eq!(app.cursor.pos, 0);
        app.session.settle().await;

        let last_user = app
            .session
            .messages()
            .iter()
            .rev()
            .find(|m| m.is_user())
            .unwrap();
        assert_eq!(last_user.text, "hi there");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_draft_does_not_send() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.session.settle().await;

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.messages().len(), 1);
        assert_eq!(app.session.draft(), " ");

        ctrl(&mut app, 'u');
        assert_eq!(app.session.draft(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_and_log_toggles() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('z'));
        assert!(!app.show_help);

        ctrl(&mut app, 'd');
        assert!(app.log.visible);
        ctrl(&mut app, 'c');
        assert!(app.should_exit);
    }
}
