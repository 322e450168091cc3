//! Turn controller: the state of one chat widget and every transition on it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::analytics::{self, Analytics, TrackedEvent};
use crate::models::{Message, QuickAction};
use crate::script::{ScriptError, ScriptTable};

use super::{
    ChatTrigger, MessageStore, PendingReply, ReplyScheduler, ReplySource, SessionEvent,
    TriggerCommand,
};

/// Simulated "assistant is typing" delay.
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(500);

/// Per-session knobs.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub typing_delay: Duration,
    /// Source id reported with `chat_open`
    pub source: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            typing_delay: DEFAULT_TYPING_DELAY,
            source: "chat_widget".to_string(),
        }
    }
}

/// One mounted chat widget.
///
/// Must be created inside a tokio runtime. Dropping the session cancels
/// any reply still waiting on its typing delay.
pub struct ChatSession {
    script: ScriptTable,
    store: MessageStore,
    is_open: bool,
    welcomed: bool,
    draft: String,
    /// Replies scheduled but not yet appended
    pending: usize,
    next_seq: u64,
    source: String,
    analytics: Arc<dyn Analytics>,
    scheduler: ReplyScheduler,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl ChatSession {
    pub fn new(script: ScriptTable, analytics: Arc<dyn Analytics>, options: SessionOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let scheduler = ReplyScheduler::start(options.typing_delay, events_tx.clone());

        Self {
            script,
            store: MessageStore::new(),
            is_open: false,
            welcomed: false,
            draft: String::new(),
            pending: 0,
            next_seq: 0,
            source: options.source,
            analytics,
            scheduler,
            events_tx,
            events_rx,
        }
    }

    // -----------------------------------------------------------------------
    // Render inputs
    // -----------------------------------------------------------------------

    pub fn script(&self) -> &ScriptTable {
        &self.script
    }

    pub fn messages(&self) -> &[Message] {
        self.store.all()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn typing_delay(&self) -> Duration {
        self.scheduler.delay()
    }

    /// Options of the latest assistant message.
    pub fn current_options(&self) -> &[QuickAction] {
        self.store
            .last_assistant()
            .map(|m| m.follow_ups.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the send button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_typing() && !self.draft.trim().is_empty()
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    pub fn open(&mut self) {
        if self.is_open {
            return;
        }
        self.is_open = true;
        analytics::fire_chat_open(self.analytics.as_ref(), &self.source);

        if !self.welcomed && self.store.is_empty() {
            self.welcomed = true;
            let reply = PendingReply::from_topic(self.next_seq(), self.script.welcome());
            self.schedule(reply);
        }
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Echo the option's label as the visitor's message, then answer with
    /// its target topic.
    ///
    /// An unknown target means the option did not come from this session's
    /// script. Nothing is appended and the error should be treated as fatal.
    pub fn select_option(&mut self, option: &QuickAction) -> Result<(), ScriptError> {
        self.script.lookup(&option.target_topic)?;

        self.store.append(Message::user(option.label.as_str()));
        analytics::fire(
            self.analytics.as_ref(),
            TrackedEvent::new("quick_action", "chat", &option.target_topic),
        );
        self.respond_with_topic(&option.target_topic)
    }

    /// Append free text from the visitor and answer with the fallback.
    ///
    /// Blank input is ignored; returns whether anything was sent.
    pub fn submit_free_text(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        self.store.append(Message::user(text));
        self.draft.clear();
        analytics::fire(
            self.analytics.as_ref(),
            TrackedEvent::new("free_text_message", "chat", &self.source),
        );
        self.respond_with_fallback();
        true
    }

    /// Submit the compose buffer.
    pub fn submit_draft(&mut self) -> bool {
        let text = std::mem::take(&mut self.draft);
        let sent = self.submit_free_text(&text);
        if !sent {
            self.draft = text;
        }
        sent
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn respond_with_topic(&mut self, key: &str) -> Result<(), ScriptError> {
        let seq = self.next_seq();
        let reply = PendingReply::from_topic(seq, self.script.lookup(key)?);
        self.schedule(reply);
        Ok(())
    }

    pub fn respond_with_fallback(&mut self) {
        let reply = PendingReply {
            seq: self.next_seq(),
            source: ReplySource::Fallback,
            text: self.script.fallback_text().to_string(),
            follow_ups: self.script.fallback_options().to_vec(),
        };
        self.schedule(reply);
    }

    /// Handle for other components to open the widget or send a message.
    pub fn trigger(&self) -> ChatTrigger {
        ChatTrigger::new(self.events_tx.clone())
    }

    // -----------------------------------------------------------------------
    // Event pump
    // -----------------------------------------------------------------------

    /// Wait for the next reply or trigger command.
    ///
    /// The session keeps a sender of its own, so this only returns `None`
    /// if the channel was torn down. Designed to be used inside
    /// `tokio::select!`.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ReplyReady(reply) => {
                self.pending = self.pending.saturating_sub(1);
                tracing::debug!(
                    seq = reply.seq,
                    source = ?reply.source,
                    pending = self.pending,
                    "assistant reply appended"
                );
                self.store
                    .append(Message::assistant(reply.text, reply.follow_ups));
                tracing::trace!(messages = self.store.len(), "transcript updated");
            }
            SessionEvent::Trigger(TriggerCommand::ToggleChat) => self.toggle(),
            SessionEvent::Trigger(TriggerCommand::SendMessage(text)) => {
                self.open();
                self.submit_free_text(&text);
            }
        }
    }

    /// Apply queued events and wait until no reply is pending.
    pub async fn settle(&mut self) {
        loop {
            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event);
            }
            if self.pending == 0 {
                break;
            }
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn schedule(&mut self, reply: PendingReply) {
        self.pending += 1;
        self.scheduler.schedule(reply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{FailingAnalytics, RecordingAnalytics};
    use crate::analytics::NoopAnalytics;
    use crate::models::{Origin, Topic};
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    const DELAY: Duration = Duration::from_millis(500);

    fn emface_script() -> ScriptTable {
        ScriptTable::new(
            "emface",
            "welcome",
            "Thanks! Please pick a topic below.",
            vec![
                Topic::new(
                    "welcome",
                    "Welcome to AboutFace!",
                    vec![
                        QuickAction::to("emface-info", "What is EMFACE?"),
                        QuickAction::to("pricing", "Pricing Information"),
                    ],
                ),
                Topic::new(
                    "emface-info",
                    "EMFACE treats skin and muscle together.",
                    vec![QuickAction::to("how-it-works", "How does EMFACE work?")],
                ),
                Topic::new("how-it-works", "RF plus HIFES energy.", vec![]),
                Topic::new(
                    "pricing",
                    "Signature Series: $2,400",
                    vec![
                        QuickAction::to("financing", "Financing Options"),
                        QuickAction::to("welcome", "Back to start"),
                    ],
                ),
                Topic::new("financing", "0% APR available.", vec![]),
            ],
        )
        .unwrap()
    }

    fn session() -> ChatSession {
        ChatSession::new(
            emface_script(),
            Arc::new(NoopAnalytics),
            SessionOptions::default(),
        )
    }

    fn texts(session: &ChatSession) -> Vec<(Origin, String)> {
        session
            .messages()
            .iter()
            .map(|m| (m.origin, m.text.clone()))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_emits_single_welcome_after_delay() {
        let mut s = session();
        let started = Instant::now();

        s.open();
        assert!(s.is_open());
        assert!(s.is_typing());
        assert!(s.messages().is_empty());

        s.settle().await;
        assert!(Instant::now() - started >= DELAY);
        assert!(!s.is_typing());
        assert_eq!(
            texts(&s),
            vec![(Origin::Assistant, "Welcome to AboutFace!".to_string())]
        );
        assert_eq!(s.current_options().len(), 2);

        s.close();
        s.open();
        s.settle().await;
        assert_eq!(s.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_before_welcome_lands_does_not_duplicate() {
        let mut s = session();
        s.open();
        s.close();
        s.open();
        s.settle().await;
        assert_eq!(s.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_free_text_is_ignored() {
        let mut s = session();
        assert!(!s.submit_free_text(""));
        assert!(!s.submit_free_text("   "));
        assert!(!s.submit_free_text("\n\t"));
        assert!(s.messages().is_empty());
        assert!(!s.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_text_gets_fallback() {
        let mut s = session();
        s.set_draft("hello");

        assert!(s.submit_free_text("hello"));
        assert_eq!(s.draft(), "");
        assert_eq!(texts(&s), vec![(Origin::User, "hello".to_string())]);
        assert!(s.is_typing());

        let event = s.next_event().await.unwrap();
        s.handle_event(event);
        assert!(!s.is_typing());

        let messages = s.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].origin, Origin::Assistant);
        assert_eq!(messages[1].text, "Thanks! Please pick a topic below.");
        assert_eq!(messages[1].follow_ups, s.script().welcome().options);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_option_appends_label_then_topic() {
        let mut s = session();
        let option = QuickAction::new("price-chip", "Pricing Information", "pricing");

        assert_ok!(s.select_option(&option));
        assert_eq!(
            texts(&s),
            vec![(Origin::User, "Pricing Information".to_string())]
        );

        s.settle().await;
        let reply = &s.messages()[1];
        let pricing = s.script().lookup("pricing").unwrap();
        assert_eq!(reply.text, pricing.response_text);
        assert_eq!(reply.follow_ups, pricing.options);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_unknown_option_fails_without_mutation() {
        let mut s = session();
        let bogus = QuickAction::to("teleport", "Teleport");
        match s.select_option(&bogus) {
            Err(ScriptError::UnknownTopic(key)) => assert_eq!(key, "teleport"),
            other => panic!("expected UnknownTopic, got {:?}", other),
        }
        assert!(s.messages().is_empty());
        assert!(!s.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emface_walkthrough_transcript() {
        let mut s = session();
        s.open();
        s.settle().await;

        let first = s.current_options()[0].clone();
        assert_eq!(first.target_topic, "emface-info");
        s.select_option(&first).unwrap();
        s.settle().await;

        let next = s.current_options()[0].clone();
        assert_eq!(next.target_topic, "how-it-works");
        s.select_option(&next).unwrap();
        s.settle().await;

        assert_eq!(
            texts(&s),
            vec![
                (Origin::Assistant, "Welcome to AboutFace!".to_string()),
                (Origin::User, "What is EMFACE?".to_string()),
                (
                    Origin::Assistant,
                    "EMFACE treats skin and muscle together.".to_string()
                ),
                (Origin::User, "How does EMFACE work?".to_string()),
                (Origin::Assistant, "RF plus HIFES energy.".to_string()),
            ]
        );
        assert!(s.messages()[4].follow_ups.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_revisiting_topic_repeats_response() {
        let mut s = session();
        let pricing = QuickAction::to("pricing", "Pricing Information");
        let back = QuickAction::to("welcome", "Back to start");

        s.select_option(&pricing).unwrap();
        s.settle().await;
        s.select_option(&back).unwrap();
        s.settle().await;
        s.select_option(&pricing).unwrap();
        s.settle().await;

        let replies: Vec<&str> = s
            .messages()
            .iter()
            .filter(|m| m.origin == Origin::Assistant)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(
            replies,
            vec![
                "Signature Series: $2,400",
                "Welcome to AboutFace!",
                "Signature Series: $2,400"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_double_select_resolves_in_order() {
        let mut s = session();
        s.select_option(&QuickAction::to("pricing", "Pricing Information"))
            .unwrap();
        s.select_option(&QuickAction::to("financing", "Financing Options"))
            .unwrap();
        assert!(s.is_typing());

        let event = s.next_event().await.unwrap();
        s.handle_event(event);
        assert!(s.is_typing());

        s.settle().await;
        assert!(!s.is_typing());
        assert_eq!(
            texts(&s),
            vec![
                (Origin::User, "Pricing Information".to_string()),
                (Origin::User, "Financing Options".to_string()),
                (Origin::Assistant, "Signature Series: $2,400".to_string()),
                (Origin::Assistant, "0% APR available.".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_does_not_cancel_pending_reply() {
        let mut s = session();
        s.open();
        s.submit_free_text("anyone there?");
        s.close();

        s.settle().await;
        assert!(!s.is_open());
        assert_eq!(s.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_send_message_opens_and_submits() {
        let mut s = session();
        let trigger = s.trigger();
        trigger.send_message("I'd like to schedule a consultation");

        s.settle().await;
        assert!(s.is_open());
        assert_eq!(
            texts(&s),
            vec![
                (
                    Origin::User,
                    "I'd like to schedule a consultation".to_string()
                ),
                (Origin::Assistant, "Welcome to AboutFace!".to_string()),
                (
                    Origin::Assistant,
                    "Thanks! Please pick a topic below.".to_string()
                ),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_toggle() {
        let mut s = session();
        let trigger = s.trigger();

        trigger.toggle_chat();
        let event = s.next_event().await.unwrap();
        s.handle_event(event);
        assert!(s.is_open());

        trigger.toggle_chat();
        let event = s.next_event().await.unwrap();
        s.handle_event(event);
        assert!(!s.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_draft_and_can_submit() {
        let mut s = session();
        assert!(!s.can_submit());

        s.draft_mut().push_str("   ");
        assert!(!s.can_submit());
        assert!(!s.submit_draft());
        assert_eq!(s.draft(), "   ");

        s.set_draft("Do you take CareCredit?");
        assert!(s.can_submit());
        assert!(s.submit_draft());
        assert_eq!(s.draft(), "");

        s.set_draft("another one");
        assert!(!s.can_submit(), "input is disabled while typing");

        s.settle().await;
        assert!(s.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analytics_events() {
        let rec = RecordingAnalytics::default();
        let mut s = ChatSession::new(
            emface_script(),
            Arc::new(rec.clone()),
            SessionOptions {
                typing_delay: DELAY,
                source: "aboutface_widget".to_string(),
            },
        );

        s.open();
        s.open();
        s.select_option(&QuickAction::to("pricing", "Pricing Information"))
            .unwrap();
        s.submit_free_text("hi");
        s.settle().await;

        assert_eq!(rec.opens(), vec!["aboutface_widget".to_string()]);
        assert_eq!(
            rec.events(),
            vec![
                TrackedEvent::new("quick_action", "chat", "pricing"),
                TrackedEvent::new("free_text_message", "chat", "aboutface_widget"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_analytics_does_not_affect_transcript() {
        let mut s = ChatSession::new(
            emface_script(),
            Arc::new(FailingAnalytics),
            SessionOptions::default(),
        );
        s.open();
        s.submit_free_text("hello");
        s.settle().await;
        assert_eq!(s.messages().len(), 3);
    }
}
