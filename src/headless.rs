//! Headless conversation runner for the `transcript` and `estimate` commands.

use anyhow::{bail, Context, Result};

use crate::engine::ChatSession;
use crate::models::{Message, Origin};

/// Prefix marking a free-text step.
const SAY_PREFIX: &str = "say:";

/// One visitor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Choose the offered quick action with this target topic (or chip id)
    Pick(String),
    /// Type free text
    Say(String),
}

impl Step {
    /// `say:<text>` is free text; anything else picks a quick action.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(SAY_PREFIX) {
            Some(text) => Step::Say(text.to_string()),
            None => Step::Pick(raw.to_string()),
        }
    }
}

/// Open the widget, wait for the welcome, then play each step and wait for
/// its reply.
pub async fn play(session: &mut ChatSession, steps: &[Step]) -> Result<()> {
    session.open();
    session.settle().await;

    for step in steps {
        match step {
            Step::Pick(key) => {
                let option = session
                    .current_options()
                    .iter()
                    .find(|o| o.target_topic == *key || o.id == *key)
                    .cloned();
                let Some(option) = option else {
                    let offered: Vec<&str> = session
                        .current_options()
                        .iter()
                        .map(|o| o.target_topic.as_str())
                        .collect();
                    bail!(
                        "'{}' is not offered here (available: {})",
                        key,
                        if offered.is_empty() {
                            "none".to_string()
                        } else {
                            offered.join(", ")
                        }
                    );
                };
                session
                    .select_option(&option)
                    .context("Quick action points outside the script")?;
            }
            Step::Say(text) => {
                if !session.submit_free_text(text) {
                    tracing::debug!("skipping blank message");
                }
            }
        }
        session.settle().await;
    }

    Ok(())
}

/// Render a transcript for the terminal.
pub fn format_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for msg in messages {
        let who = match msg.origin {
            Origin::User => "you",
            Origin::Assistant => "assistant",
        };
        let mut lines = msg.text.lines();
        out.push_str(&format!("[{}] {}\n", who, lines.next().unwrap_or("")));
        for line in lines {
            out.push_str(&format!("    {}\n", line));
        }
        for option in &msg.follow_ups {
            out.push_str(&format!("    > {} ({})\n", option.label, option.target_topic));
        }
        out.push('\n');
    }
    out
}

pub fn print_transcript(messages: &[Message], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(messages).context("Failed to serialize transcript")?;
        println!("{}", out);
    } else {
        print!("{}", format_transcript(messages));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analytics::NoopAnalytics;
    use crate::engine::SessionOptions;
    use crate::models::{QuickAction, Site};
    use crate::script::catalog;

    fn about_face_session() -> ChatSession {
        ChatSession::new(
            catalog::for_site(Site::AboutFace).unwrap(),
            Arc::new(NoopAnalytics),
            SessionOptions::default(),
        )
    }

    #[test]
    fn test_step_parse() {
        assert_eq!(Step::parse("pricing"), Step::Pick("pricing".to_string()));
        assert_eq!(
            Step::parse("say:Do you take CareCredit?"),
            Step::Say("Do you take CareCredit?".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_walks_the_script() {
        let mut session = about_face_session();
        let steps = vec![
            Step::parse("pricing"),
            Step::parse("financing"),
            Step::parse("say:thanks!"),
        ];
        play(&mut session, &steps).await.unwrap();

        let users: Vec<&str> = session
            .messages()
            .iter()
            .filter(|m| m.is_user())
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(
            users,
            vec!["Pricing Information", "Financing Options", "thanks!"]
        );
        assert_eq!(session.messages().len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_accepts_chip_id() {
        let mut session = about_face_session();
        let steps = vec![Step::parse("emface-info"), Step::parse("how-it-works"), Step::parse("consultation")];
        play(&mut session, &steps).await.unwrap();
        let last = session.messages().last().unwrap();
        assert!(last.text.starts_with("Free EMFACE Consultation"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_rejects_option_not_on_offer() {
        let mut session = about_face_session();
        let err = play(&mut session, &[Step::parse("call-now")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not offered"));
    }

    #[test]
    fn test_format_transcript() {
        let messages = vec![
            Message::assistant(
                "Hello\nHow can I help?",
                vec![QuickAction::to("pricing", "Pricing Information")],
            ),
            Message::user("Pricing Information"),
        ];
        assert_eq!(
            format_transcript(&messages),
            "[assistant] Hello\n    How can I help?\n    > Pricing Information (pricing)\n\n\
             [you] Pricing Information\n\n"
        );
    }
}
