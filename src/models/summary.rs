use serde::{Deserialize, Serialize};

/// One action item extracted from the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

impl ActionItem {
    /// Dedup identity: the exact (text, owner, due) triple.
    pub fn key(&self) -> (String, String, String) {
        (
            self.text.clone(),
            self.owner.clone().unwrap_or_default(),
            self.due.clone().unwrap_or_default(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The evolving structured summary carried across chunk iterations.
///
/// Owned exclusively by one summarization run; merged monotonically per
/// chunk and sanitized once at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryState {
    /// Short narrative summary, at most 7 sentences after sanitize.
    #[serde(default)]
    pub tldr: String,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    /// Total tokens reported by the backend, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
}

impl SummaryState {
    /// Serialize for embedding into a prompt (compact, no token count).
    pub fn to_prompt_json(&self) -> String {
        let slim = Self {
            tokens_used: None,
            ..self.clone()
        };
        serde_json::to_string(&slim).unwrap_or_else(|_| "{}".to_string())
    }
}
