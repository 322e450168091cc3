//! Transcript message models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    User,
    Assistant,
}

/// A quick action offered under an assistant message.
///
/// `id` only identifies the chip for rendering; transitions go through
/// `target_topic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub id: String,
    pub label: String,
    pub target_topic: String,
}

impl QuickAction {
    pub fn new(id: &str, label: &str, target_topic: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            target_topic: target_topic.to_string(),
        }
    }

    /// Quick action whose render key is its target topic.
    pub fn to(target_topic: &str, label: &str) -> Self {
        Self::new(target_topic, label, target_topic)
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Display text, rendered verbatim (line breaks included)
    pub text: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
    /// Follow-up options; always empty for user messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_ups: Vec<QuickAction>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::build(text.into(), Origin::User, Vec::new())
    }

    pub fn assistant(text: impl Into<String>, follow_ups: Vec<QuickAction>) -> Self {
        Self::build(text.into(), Origin::Assistant, follow_ups)
    }

    fn build(text: String, origin: Origin, follow_ups: Vec<QuickAction>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            origin,
            created_at: Utc::now(),
            follow_ups,
        }
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("hello");
        let b = Message::user("hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_user_message_has_no_follow_ups() {
        let msg = Message::user("Book Consultation");
        assert!(msg.is_user());
        assert!(msg.follow_ups.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let msg = Message::assistant("Hi", vec![QuickAction::to("pricing", "Pricing")]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["origin"], "assistant");
        assert_eq!(json["followUps"][0]["targetTopic"], "pricing");
        assert!(json.get("createdAt").is_some());

        let user = serde_json::to_value(Message::user("Hi")).unwrap();
        assert!(user.get("followUps").is_none());
    }
}
