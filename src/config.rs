/// Configuration for the post-ASR processing pipeline.
///
/// Passed explicitly into each stage; there is no process-wide settings
/// singleton. Defaults mirror the values the pipeline was tuned with.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause threshold in seconds, shared by paragraph merging, the
    /// pseudo-diarization toggle, and pause counting.
    pub pause_threshold_sec: f64,
    /// Default speaker label for untagged segments ("Speaker 1", ...).
    pub speaker_label_prefix: String,
    /// Number of keywords to extract from the transcript.
    pub keyword_top_k: usize,
    /// Maximum characters per caption line.
    pub caption_max_chars: usize,
    /// Hard cap on the rendered minutes document, in characters.
    pub minutes_max_chars: usize,
    /// Skip diarization-dependent work and use the pause heuristic.
    pub fast_mode: bool,
    /// LLM backend settings for the summarizer.
    pub llm: LlmConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pause_threshold_sec: 0.5,
            speaker_label_prefix: "Speaker".to_string(),
            keyword_top_k: 20,
            caption_max_chars: 55,
            minutes_max_chars: 30_000,
            fast_mode: false,
            llm: LlmConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Speaker label for a numeric pseudo-diarization id.
    pub fn speaker_label(&self, id: u32) -> String {
        format!("{} {}", self.speaker_label_prefix, id)
    }
}

/// Configuration for the OpenAI-compatible summarization backend.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat-completions endpoint (e.g. a local server).
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Temperature (lower = more deterministic).
    pub temperature: f64,
    /// Maximum tokens in each response; chunk budgets derive from this.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: "dummy".to_string(),
            model: "qwen/qwen3-4b-thinking-2507".to_string(),
            temperature: 0.2,
            max_tokens: 8096,
        }
    }
}

impl LlmConfig {
    /// Create config from environment variables, falling back to the
    /// local-server defaults (which accept a dummy key).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or(defaults.api_key),
            model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.pause_threshold_sec, 0.5);
        assert_eq!(config.caption_max_chars, 55);
        assert_eq!(config.keyword_top_k, 20);
        assert_eq!(config.speaker_label(1), "Speaker 1");
    }
}
