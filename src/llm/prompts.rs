use serde_json::{json, Value};

use crate::llm::client::ChatMessage;

/// System instruction for the per-chunk merge task.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert meeting analyst. You are given: \
1) the current summary state (JSON matching the schema), 2) a new part of the transcript. \
Update and return the FULL JSON per the schema: tldr, action_items[{text, owner, due}], \
decisions[], risks[]. Respond with valid JSON only.";

/// Extra instruction appended when the backend rejects the
/// schema-constrained mode and we fall back to a free JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON with no explanations.";

/// System instruction for the best-effort refine pass.
pub const REFINE_SYSTEM_PROMPT: &str = "Tidy the final meeting summary into a neat, concise \
form. Return ONLY valid JSON matching the schema: tldr, action_items[{text, owner, due}], \
decisions[], risks[].";

/// System instruction for coercing free-form text into the schema.
pub const REPAIR_SYSTEM_PROMPT: &str = "Convert the following text into JSON with strict \
fields: tldr (5-7 sentences), action_items (array of objects {text, owner, due}), decisions \
(array of strings), risks (array of strings). Respond with JSON only.";

/// JSON schema for the structured summary response.
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tldr": {"type": "string"},
            "action_items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string"},
                        "owner": {"type": "string"},
                        "due": {"type": "string"}
                    }
                }
            },
            "decisions": {"type": "array", "items": {"type": "string"}},
            "risks": {"type": "array", "items": {"type": "string"}}
        }
    })
}

/// Messages for one chunk iteration: current state plus the new part.
pub fn build_chunk_messages(state_json: &str, chunk_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(format!("Current state (JSON):\n{}", state_json)),
        ChatMessage::user(format!("New part of the transcript:\n{}", chunk_text)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_all_fields() {
        let schema = summary_schema();
        let props = schema["properties"].as_object().unwrap();
        for field in ["tldr", "action_items", "decisions", "risks"] {
            assert!(props.contains_key(field), "missing {}", field);
        }
    }

    #[test]
    fn test_chunk_messages_layout() {
        let msgs = build_chunk_messages("{}", "Speaker 1: hi");
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].role, "system");
        assert!(msgs[1].content.contains("{}"));
        assert!(msgs[2].content.contains("Speaker 1: hi"));
    }
}
