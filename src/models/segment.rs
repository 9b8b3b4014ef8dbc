use serde::{Deserialize, Serialize};

/// A single aligned word from the ASR collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Start timestamp in seconds.
    #[serde(default)]
    pub start: f64,
    /// End timestamp in seconds (>= start).
    #[serde(default)]
    pub end: f64,
    /// The word text - never modified by the pipeline.
    #[serde(default)]
    pub text: String,
    /// Speaker label, if diarization provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

/// A raw ASR segment: a short run of words with one text string.
///
/// Produced by the ASR collaborator, already time-ordered. The pipeline
/// only ever backfills missing speaker labels; text and timestamps are
/// left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Word-level alignment, possibly empty.
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Segment {
    /// Whether any word or the segment itself carries a speaker label.
    pub fn has_speaker(&self) -> bool {
        self.speaker.is_some() || self.words.iter().any(|w| w.speaker.is_some())
    }
}
