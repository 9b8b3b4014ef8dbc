use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Word;

/// A maximal run of consecutive speech from one speaker with no pause
/// at or above the pause threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub speaker: String,
    /// Start of the first merged segment, seconds.
    pub start: f64,
    /// Maximum end seen across merged segments, seconds.
    pub end: f64,
    /// Space-joined text of the merged segments, in arrival order.
    pub text: String,
    /// Words of all merged segments, in arrival order.
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Paragraph {
    /// Duration in seconds, floored at zero.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Conversational metrics derived purely from paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Words per minute over the summed paragraph durations.
    pub speech_rate_wpm: f64,
    /// Fraction of total talk time per speaker (sums to ~1.0).
    pub talk_time: BTreeMap<String, f64>,
    /// Paragraph-level pauses at or above the pause threshold.
    pub pauses_count: u32,
}

/// A topic span on the meeting timeline.
///
/// Topic segmentation is not implemented; the pipeline always emits an
/// empty list, but the shape is part of the transcript artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub start: f64,
    pub end: f64,
}

/// The canonical transcript artifact. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub duration_sec: f64,
    /// Sorted set of paragraph speaker labels.
    pub speakers: Vec<String>,
    pub metrics: Metrics,
    /// Speaker paragraphs, ordered by start time.
    pub segments: Vec<Paragraph>,
    /// Ranked keywords, most frequent first.
    pub keywords: Vec<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Transcript {
    /// All words of all paragraphs, flattened in order.
    pub fn all_words(&self) -> Vec<Word> {
        self.segments
            .iter()
            .flat_map(|p| p.words.iter().cloned())
            .collect()
    }
}

/// A caption line for subtitle output, independent of paragraph and
/// speaker boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLine {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_duration() {
        let p = Paragraph {
            speaker: "Speaker 1".to_string(),
            start: 1.5,
            end: 4.0,
            text: "hello there".to_string(),
            words: vec![],
        };
        assert!((p.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_transcript_serializes_artifact_fields() {
        let tr = Transcript {
            job_id: "job-1".to_string(),
            language: Some("en".to_string()),
            duration_sec: 5.0,
            speakers: vec!["Speaker 1".to_string()],
            metrics: Metrics::default(),
            segments: vec![],
            keywords: vec![],
            topics: vec![],
        };
        let json = serde_json::to_value(&tr).unwrap();
        assert_eq!(json["job_id"], "job-1");
        assert!(json["metrics"]["talk_time"].is_object());
        assert_eq!(json["metrics"]["pauses_count"], 0);
    }
}
