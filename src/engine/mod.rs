//! Scripted dialog engine shared by every subdomain widget.
//!
//! A [`ChatSession`] owns the transcript and the session flags. Replies are
//! produced by a [`ReplyScheduler`] worker after the typing delay and come
//! back through the session's event channel, together with commands from
//! [`ChatTrigger`] handles held by other parts of the app. The owner drives
//! the session by feeding those events to [`ChatSession::handle_event`].

mod scheduler;
mod session;
mod store;
mod trigger;

pub use scheduler::ReplyScheduler;
pub use session::{ChatSession, SessionOptions};
use store::MessageStore;
pub use trigger::{ChatTrigger, TriggerCommand};

use crate::models::{QuickAction, Topic};

/// Where a scheduled reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Topic(String),
    Fallback,
}

/// An assistant reply waiting for its typing delay to elapse.
#[derive(Debug, Clone)]
pub struct PendingReply {
    /// Scheduling order within the session
    pub seq: u64,
    pub source: ReplySource,
    pub text: String,
    pub follow_ups: Vec<QuickAction>,
}

impl PendingReply {
    fn from_topic(seq: u64, topic: &Topic) -> Self {
        Self {
            seq,
            source: ReplySource::Topic(topic.key.clone()),
            text: topic.response_text.clone(),
            follow_ups: topic.options.clone(),
        }
    }
}

/// Everything that can arrive on a session's event channel.
#[derive(Debug)]
pub enum SessionEvent {
    ReplyReady(PendingReply),
    Trigger(TriggerCommand),
}
