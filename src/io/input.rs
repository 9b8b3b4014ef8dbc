use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;
use crate::models::Segment;

/// Aligned ASR output for one job, as produced by the transcription
/// collaborator (WhisperX-style JSON).
#[derive(Debug, Clone, Deserialize)]
pub struct AsrDocument {
    #[serde(default)]
    pub language: Option<String>,
    /// Audio duration when the upstream probe recorded one.
    #[serde(default)]
    pub duration_sec: Option<f64>,
    /// Time-ordered segments with word alignment.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl AsrDocument {
    /// Duration from the upstream probe, falling back to the last
    /// segment end. Zero for an empty document.
    pub fn effective_duration(&self) -> f64 {
        self.duration_sec
            .unwrap_or_else(|| self.segments.last().map(|s| s.end).unwrap_or(0.0))
    }
}

/// Parse an ASR document from a file. Failure here is a fatal upstream
/// error; nothing is retried.
pub fn parse_asr_file(path: &Path) -> Result<AsrDocument, PipelineError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Input(format!("failed to read {:?}: {}", path, e)))?;
    parse_asr_json(&content)
}

/// Parse an ASR document from a JSON string.
pub fn parse_asr_json(json: &str) -> Result<AsrDocument, PipelineError> {
    serde_json::from_str(json)
        .map_err(|e| PipelineError::Input(format!("invalid ASR JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let json = r#"{
            "language": "en",
            "segments": [
                {
                    "start": 0.0,
                    "end": 1.0,
                    "text": "Hello world",
                    "speaker": "Speaker 1",
                    "words": [
                        {"start": 0.0, "end": 0.5, "text": "Hello", "speaker": "Speaker 1"},
                        {"start": 0.5, "end": 1.0, "text": "world", "speaker": "Speaker 1"}
                    ]
                }
            ]
        }"#;
        let doc = parse_asr_json(json).unwrap();
        assert_eq!(doc.language.as_deref(), Some("en"));
        assert_eq!(doc.segments.len(), 1);
        assert_eq!(doc.segments[0].words.len(), 2);
        assert_eq!(doc.effective_duration(), 1.0);
    }

    #[test]
    fn test_parse_minimal_segments() {
        // Missing words, speaker, language are all tolerated.
        let json = r#"{"segments": [{"start": 0.0, "end": 2.5, "text": "hi"}]}"#;
        let doc = parse_asr_json(json).unwrap();
        assert!(doc.segments[0].words.is_empty());
        assert!(doc.segments[0].speaker.is_none());
        assert_eq!(doc.effective_duration(), 2.5);
    }

    #[test]
    fn test_explicit_duration_wins() {
        let json = r#"{"duration_sec": 10.0, "segments": [{"start": 0.0, "end": 2.5, "text": "hi"}]}"#;
        let doc = parse_asr_json(json).unwrap();
        assert_eq!(doc.effective_duration(), 10.0);
    }

    #[test]
    fn test_invalid_json_is_input_error() {
        let err = parse_asr_json("not json").unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));
    }

    #[test]
    fn test_empty_document() {
        let doc = parse_asr_json("{}").unwrap();
        assert!(doc.segments.is_empty());
        assert_eq!(doc.effective_duration(), 0.0);
    }
}
