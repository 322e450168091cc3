//! Dialog script tables
//!
//! A script is a closed directed graph of topics: every quick action points
//! at a topic that exists in the same table. Tables are checked when they
//! are built, so a `ScriptTable` value is always closed.

pub mod catalog;

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use serde::Deserialize;

use crate::models::{QuickAction, Topic};

/// Script construction and lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown topic '{0}'")]
    UnknownTopic(String),

    #[error("topic '{0}' is defined more than once")]
    DuplicateTopic(String),

    #[error("welcome topic '{0}' is not defined")]
    MissingWelcome(String),

    #[error("option '{option}' on topic '{topic}' points at undefined topic '{target}'")]
    DanglingTarget {
        topic: String,
        option: String,
        target: String,
    },

    #[error("invalid script file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read script file: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only topic table for one chat widget.
#[derive(Debug, Clone)]
pub struct ScriptTable {
    name: String,
    welcome: String,
    fallback_text: String,
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
}

impl ScriptTable {
    /// Build a table, rejecting duplicate keys, a missing welcome topic and
    /// options that point outside the table.
    pub fn new(
        name: &str,
        welcome: &str,
        fallback_text: &str,
        topics: Vec<Topic>,
    ) -> Result<Self, ScriptError> {
        let mut index = HashMap::with_capacity(topics.len());
        for (i, topic) in topics.iter().enumerate() {
            if index.insert(topic.key.clone(), i).is_some() {
                return Err(ScriptError::DuplicateTopic(topic.key.clone()));
            }
        }

        if !index.contains_key(welcome) {
            return Err(ScriptError::MissingWelcome(welcome.to_string()));
        }

        for topic in &topics {
            for option in &topic.options {
                if !index.contains_key(&option.target_topic) {
                    return Err(ScriptError::DanglingTarget {
                        topic: topic.key.clone(),
                        option: option.id.clone(),
                        target: option.target_topic.clone(),
                    });
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            welcome: welcome.to_string(),
            fallback_text: fallback_text.to_string(),
            topics,
            index,
        })
    }

    /// Parse a table from TOML.
    ///
    /// ```toml
    /// name = "demo"
    /// welcome = "welcome"
    /// fallback = "Thanks! Pick a topic below."
    ///
    /// [[topics]]
    /// key = "welcome"
    /// response = "Hi there"
    /// options = [{ label = "Pricing", target = "pricing" }]
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = toml::from_str(content)?;
        let topics = file
            .topics
            .into_iter()
            .map(|t| Topic {
                key: t.key,
                response_text: t.response,
                options: t
                    .options
                    .into_iter()
                    .map(|o| QuickAction {
                        id: o.id.unwrap_or_else(|| o.target.clone()),
                        label: o.label,
                        target_topic: o.target,
                    })
                    .collect(),
            })
            .collect();
        Self::new(&file.name, &file.welcome, &file.fallback, topics)
    }

    /// Load a table from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookup(&self, key: &str) -> Result<&Topic, ScriptError> {
        self.index
            .get(key)
            .map(|&i| &self.topics[i])
            .ok_or_else(|| ScriptError::UnknownTopic(key.to_string()))
    }

    pub fn welcome(&self) -> &Topic {
        // The welcome key is checked in `new`.
        &self.topics[self.index[&self.welcome]]
    }

    pub fn fallback_text(&self) -> &str {
        &self.fallback_text
    }

    /// Options offered with the fallback reply: the welcome menu again.
    pub fn fallback_options(&self) -> &[QuickAction] {
        &self.welcome().options
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Topics no path of quick actions reaches from the welcome topic or
    /// the fallback menu, in table order.
    pub fn unreachable_topics(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        seen.insert(&self.welcome);
        queue.push_back(&self.welcome);

        while let Some(key) = queue.pop_front() {
            let topic = &self.topics[self.index[key]];
            for option in &topic.options {
                if seen.insert(&option.target_topic) {
                    queue.push_back(&option.target_topic);
                }
            }
        }

        self.topics
            .iter()
            .map(|t| t.key.as_str())
            .filter(|k| !seen.contains(k))
            .collect()
    }
}

#[derive(Deserialize)]
struct ScriptFile {
    name: String,
    welcome: String,
    fallback: String,
    #[serde(default)]
    topics: Vec<TopicEntry>,
}

#[derive(Deserialize)]
struct TopicEntry {
    key: String,
    response: String,
    #[serde(default)]
    options: Vec<OptionEntry>,
}

#[derive(Deserialize)]
struct OptionEntry {
    id: Option<String>,
    label: String,
    target: String,
}
