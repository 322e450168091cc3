//! Cross-component chat trigger.
//!
//! Other sections (the cost calculator's "chat with us" buttons, for one)
//! hold a `ChatTrigger` to open the widget and inject a message as if the
//! visitor had typed it.

use tokio::sync::mpsc;

use super::SessionEvent;

/// Commands a trigger can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCommand {
    ToggleChat,
    /// Open the widget, then submit the text as free text
    SendMessage(String),
}

/// Cloneable handle into one session's event channel.
#[derive(Clone)]
pub struct ChatTrigger {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChatTrigger {
    pub(super) fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    pub fn toggle_chat(&self) {
        self.send(TriggerCommand::ToggleChat);
    }

    pub fn send_message(&self, text: impl Into<String>) {
        self.send(TriggerCommand::SendMessage(text.into()));
    }

    fn send(&self, cmd: TriggerCommand) {
        if self.tx.send(SessionEvent::Trigger(cmd)).is_err() {
            tracing::warn!("Chat session closed -- trigger dropped");
        }
    }
}
