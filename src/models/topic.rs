//! Dialog topic model

use serde::{Deserialize, Serialize};

use super::QuickAction;

/// A node of the dialog graph: the canned reply and the options offered after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub key: String,
    pub response_text: String,
    #[serde(default)]
    pub options: Vec<QuickAction>,
}

impl Topic {
    pub fn new(key: &str, response_text: &str, options: Vec<QuickAction>) -> Self {
        Self {
            key: key.to_string(),
            response_text: response_text.to_string(),
            options,
        }
    }
}
