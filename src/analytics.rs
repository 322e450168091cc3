//! Analytics collaborator
//!
//! Tracking calls are fire-and-forget: callers go through [`fire`] and
//! [`fire_chat_open`], which log and drop any error so the chat flow never
//! depends on the tracker.

use serde::Serialize;

/// Tracking failure. Never surfaced to the chat flow.
#[derive(Debug, thiserror::Error)]
#[error("analytics unavailable: {0}")]
pub struct AnalyticsError(pub String);

/// A single tracked event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedEvent {
    pub action: String,
    pub category: String,
    pub label: String,
}

impl TrackedEvent {
    pub fn new(action: &str, category: &str, label: &str) -> Self {
        Self {
            action: action.to_string(),
            category: category.to_string(),
            label: label.to_string(),
        }
    }
}

/// Event sink for user interactions with the widget.
pub trait Analytics: Send + Sync {
    fn track_event(&self, event: &TrackedEvent) -> Result<(), AnalyticsError>;

    fn track_chat_open(&self, source: &str) -> Result<(), AnalyticsError>;
}

/// Writes events to the `analytics` tracing target.
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn track_event(&self, event: &TrackedEvent) -> Result<(), AnalyticsError> {
        tracing::info!(
            target: "analytics",
            action = %event.action,
            category = %event.category,
            label = %event.label,
            "event"
        );
        Ok(())
    }

    fn track_chat_open(&self, source: &str) -> Result<(), AnalyticsError> {
        tracing::info!(target: "analytics", source, "chat_open");
        Ok(())
    }
}

/// Discards everything.
pub struct NoopAnalytics;

impl Analytics for NoopAnalytics {
    fn track_event(&self, _event: &TrackedEvent) -> Result<(), AnalyticsError> {
        Ok(())
    }

    fn track_chat_open(&self, _source: &str) -> Result<(), AnalyticsError> {
        Ok(())
    }
}

/// Track an event, swallowing failures.
pub fn fire(analytics: &dyn Analytics, event: TrackedEvent) {
    if let Err(e) = analytics.track_event(&event) {
        tracing::debug!("dropping analytics event {}: {}", event.action, e);
    }
}

/// Track a chat opening, swallowing failures.
pub fn fire_chat_open(analytics: &dyn Analytics, source: &str) {
    if let Err(e) = analytics.track_chat_open(source) {
        tracing::debug!("dropping chat_open from {}: {}", source, e);
    }
}

#[cfg(test)]
pub mod testing {
    //! Test doubles shared by the engine and calculator tests.

    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every call.
    #[derive(Clone, Default)]
    pub struct RecordingAnalytics {
        pub events: Arc<Mutex<Vec<TrackedEvent>>>,
        pub opens: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingAnalytics {
        pub fn events(&self) -> Vec<TrackedEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn opens(&self) -> Vec<String> {
            self.opens.lock().unwrap().clone()
        }
    }

    impl Analytics for RecordingAnalytics {
        fn track_event(&self, event: &TrackedEvent) -> Result<(), AnalyticsError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }

        fn track_chat_open(&self, source: &str) -> Result<(), AnalyticsError> {
            self.opens.lock().unwrap().push(source.to_string());
            Ok(())
        }
    }

    /// Fails every call.
    pub struct FailingAnalytics;

    impl Analytics for FailingAnalytics {
        fn track_event(&self, _event: &TrackedEvent) -> Result<(), AnalyticsError> {
            Err(AnalyticsError("blocked".to_string()))
        }

        fn track_chat_open(&self, _source: &str) -> Result<(), AnalyticsError> {
            Err(AnalyticsError("blocked".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_fire_swallows_errors() {
        fire(&FailingAnalytics, TrackedEvent::new("a", "b", "c"));
        fire_chat_open(&FailingAnalytics, "widget");
    }

    #[test]
    fn test_recording_analytics() {
        let rec = RecordingAnalytics::default();
        fire(&rec, TrackedEvent::new("quick_action", "chat", "pricing"));
        fire_chat_open(&rec, "chat_widget");
        assert_eq!(
            rec.events(),
            vec![TrackedEvent::new("quick_action", "chat", "pricing")]
        );
        assert_eq!(rec.opens(), vec!["chat_widget".to_string()]);
    }
}
