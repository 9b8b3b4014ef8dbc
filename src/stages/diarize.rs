use tracing::debug;

use crate::config::PipelineConfig;
use crate::models::Segment;

/// Assign alternating speaker labels when no real diarization exists.
///
/// Maintains a two-valued speaker id starting at 1 and toggles it
/// whenever the gap from the previous segment's end exceeds the pause
/// threshold. The current label is written onto the segment and onto
/// every word that lacks one; existing per-word labels are kept. This
/// only distinguishes alternating turns, never actual identity.
pub fn pseudo_diarize(segments: &mut [Segment], config: &PipelineConfig) {
    let mut speaker_id = 1u32;
    let mut prev_end = 0.0f64;

    for seg in segments.iter_mut() {
        if seg.start - prev_end > config.pause_threshold_sec {
            speaker_id = if speaker_id == 1 { 2 } else { 1 };
        }
        let label = config.speaker_label(speaker_id);
        for word in &mut seg.words {
            if word.speaker.is_none() {
                word.speaker = Some(label.clone());
            }
        }
        if seg.speaker.is_none() {
            seg.speaker = Some(label);
        }
        prev_end = seg.end;
    }

    debug!("pseudo-diarization labeled {} segments", segments.len());
}

/// Whether pseudo-diarization should run: fast mode forces it, and it
/// also kicks in when no segment carries any speaker label, at either
/// the segment or the word level.
pub fn needs_pseudo_diarization(segments: &[Segment], fast_mode: bool) -> bool {
    fast_mode || !segments.iter().any(Segment::has_speaker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64) -> Segment {
        Segment {
            start,
            end,
            text: "word".to_string(),
            speaker: None,
            words: vec![crate::models::Word {
                start,
                end,
                text: "word".to_string(),
                speaker: None,
            }],
        }
    }

    #[test]
    fn test_toggles_on_every_large_gap() {
        // Gaps of 0.6s, 0.7s, 0.8s - all above threshold.
        let mut segs = vec![
            seg(1.0, 2.0),
            seg(2.6, 3.0),
            seg(3.7, 4.0),
            seg(4.8, 5.0),
        ];
        let config = PipelineConfig::default();
        pseudo_diarize(&mut segs, &config);
        let labels: Vec<_> = segs.iter().map(|s| s.speaker.clone().unwrap()).collect();
        assert_eq!(labels, vec!["Speaker 2", "Speaker 1", "Speaker 2", "Speaker 1"]);
    }

    #[test]
    fn test_zero_gaps_never_toggle() {
        let mut segs = vec![seg(0.0, 1.0), seg(1.0, 2.0), seg(2.0, 3.0)];
        let config = PipelineConfig::default();
        pseudo_diarize(&mut segs, &config);
        assert!(segs.iter().all(|s| s.speaker.as_deref() == Some("Speaker 1")));
    }

    #[test]
    fn test_existing_word_speaker_preserved() {
        let mut segs = vec![seg(0.0, 1.0)];
        segs[0].words[0].speaker = Some("Speaker 9".to_string());
        pseudo_diarize(&mut segs, &PipelineConfig::default());
        assert_eq!(segs[0].words[0].speaker.as_deref(), Some("Speaker 9"));
        assert_eq!(segs[0].speaker.as_deref(), Some("Speaker 1"));
    }

    #[test]
    fn test_needs_pseudo_diarization() {
        let untagged = vec![seg(0.0, 1.0)];
        assert!(needs_pseudo_diarization(&untagged, false));

        let mut tagged = vec![seg(0.0, 1.0)];
        tagged[0].speaker = Some("Speaker 1".to_string());
        assert!(!needs_pseudo_diarization(&tagged, false));
        assert!(needs_pseudo_diarization(&tagged, true));
    }

    #[test]
    fn test_word_level_labels_count_as_diarization() {
        let mut segs = vec![seg(0.0, 1.0)];
        segs[0].words[0].speaker = Some("Speaker 2".to_string());
        assert!(!needs_pseudo_diarization(&segs, false));
    }
}
