use std::collections::{BTreeMap, HashMap};

use crate::config::PipelineConfig;
use crate::models::{Metrics, Paragraph};

/// Compute speech rate, talk-time share, and pause count from
/// paragraphs. Pure; recomputed from scratch each run.
pub fn compute_metrics(paragraphs: &[Paragraph], config: &PipelineConfig) -> Metrics {
    let total_dur: f64 = paragraphs.iter().map(|p| p.duration()).sum::<f64>().max(1.0);

    let mut talk_time: BTreeMap<String, f64> = BTreeMap::new();
    let mut words_total = 0usize;
    let mut pauses = 0u32;
    let mut prev_end = 0.0f64;

    for p in paragraphs {
        *talk_time.entry(p.speaker.clone()).or_default() += p.duration();
        words_total += p.text.split_whitespace().count();
        if p.start - prev_end >= config.pause_threshold_sec {
            pauses += 1;
        }
        prev_end = p.end;
    }

    let speech_rate = words_total as f64 / (total_dur / 60.0);

    // Normalize to fractions of the summed talk time. The 1.0 fallback
    // applies only when the sum is exactly zero.
    let summed: f64 = talk_time.values().sum();
    let total_talk = if summed > 0.0 { summed } else { 1.0 };
    let talk_share: BTreeMap<String, f64> = talk_time
        .into_iter()
        .map(|(speaker, dur)| (speaker, round_to(dur / total_talk, 2)))
        .collect();

    Metrics {
        speech_rate_wpm: round_to(speech_rate, 1),
        talk_time: talk_share,
        pauses_count: pauses,
    }
}

/// Rank keywords by frequency: lower-cased tokens reduced to
/// alphanumeric/hyphen/underscore characters, longer than 2 chars, not
/// purely numeric, not in the stop-word list. Ties keep first-occurrence
/// order.
pub fn extract_keywords(paragraphs: &[Paragraph], top_k: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for p in paragraphs {
        for raw in p.text.to_lowercase().split_whitespace() {
            let word: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if word.chars().count() <= 2
                || word.chars().all(|c| c.is_ascii_digit())
                || STOP_WORDS.contains(&word.as_str())
            {
                continue;
            }
            let count = counts.entry(word.clone()).or_insert(0);
            if *count == 0 {
                order.push(word);
            }
            *count += 1;
        }
    }

    // Stable sort keeps first-occurrence order within equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(top_k);
    order
}

/// Bilingual (English + Russian) stop words excluded from keywords.
const STOP_WORDS: &[&str] = &[
    // English
    "the", "and", "but", "into", "for", "with", "from", "are", "was", "were", "been", "being",
    "this", "that", "those", "these", "its", "it's", "you", "she", "they", "them", "our", "your",
    "him", "her", "their", "have", "has", "had", "not", "what", "when", "where", "who", "how",
    "why", "will", "would", "can", "could", "should", "there", "here", "about", "just", "like",
    // Russian
    "что", "как", "все", "она", "так", "его", "но", "из", "за", "для", "от", "по", "это", "эту",
    "этой", "эти", "этот", "ещё", "уже", "же", "ли", "или", "либо", "нет", "при", "мы", "вы",
    "их", "чем", "чтоб", "чтобы", "тот", "та", "те", "кто", "где", "когда", "куда", "откуда",
    "почему", "потому", "также", "был", "была", "было", "были", "есть", "может", "надо", "даже",
];

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(speaker: &str, start: f64, end: f64, text: &str) -> Paragraph {
        Paragraph {
            speaker: speaker.to_string(),
            start,
            end,
            text: text.to_string(),
            words: vec![],
        }
    }

    #[test]
    fn test_empty_paragraphs() {
        let m = compute_metrics(&[], &PipelineConfig::default());
        assert_eq!(m.speech_rate_wpm, 0.0);
        assert!(m.talk_time.is_empty());
        assert_eq!(m.pauses_count, 0);
    }

    #[test]
    fn test_talk_time_fractions_sum_to_one() {
        let paras = vec![
            para("Speaker 1", 0.0, 30.0, "one two three"),
            para("Speaker 2", 30.0, 90.0, "four five"),
        ];
        let m = compute_metrics(&paras, &PipelineConfig::default());
        let sum: f64 = m.talk_time.values().sum();
        assert!((sum - 1.0).abs() <= 0.01);
        assert_eq!(m.talk_time["Speaker 1"], 0.33);
        assert_eq!(m.talk_time["Speaker 2"], 0.67);
    }

    #[test]
    fn test_talk_time_normalizes_for_subsecond_meeting() {
        let paras = vec![
            para("Speaker 1", 0.0, 0.2, "quick note"),
            para("Speaker 2", 0.3, 0.5, "ack"),
        ];
        let m = compute_metrics(&paras, &PipelineConfig::default());
        let sum: f64 = m.talk_time.values().sum();
        assert!((sum - 1.0).abs() <= 0.01);
        assert_eq!(m.talk_time["Speaker 1"], 0.5);
        assert_eq!(m.talk_time["Speaker 2"], 0.5);
    }

    #[test]
    fn test_talk_time_zero_duration_paragraphs() {
        let paras = vec![para("Speaker 1", 1.0, 1.0, "instant")];
        let m = compute_metrics(&paras, &PipelineConfig::default());
        assert_eq!(m.talk_time["Speaker 1"], 0.0);
    }

    #[test]
    fn test_speech_rate() {
        // 6 words over 60 seconds -> 6 wpm.
        let paras = vec![para("Speaker 1", 0.0, 60.0, "a b c d e f")];
        let m = compute_metrics(&paras, &PipelineConfig::default());
        assert_eq!(m.speech_rate_wpm, 6.0);
    }

    #[test]
    fn test_zero_words_zero_rate() {
        let paras = vec![para("Speaker 1", 0.0, 10.0, "")];
        let m = compute_metrics(&paras, &PipelineConfig::default());
        assert_eq!(m.speech_rate_wpm, 0.0);
    }

    #[test]
    fn test_pause_counting() {
        // First paragraph starts at 1.0 (>= 0.5 from t=0, counts),
        // second follows after a 0.2s gap (no pause), third after 0.8s.
        let paras = vec![
            para("Speaker 1", 1.0, 2.0, "a"),
            para("Speaker 2", 2.2, 3.0, "b"),
            para("Speaker 1", 3.8, 4.0, "c"),
        ];
        let m = compute_metrics(&paras, &PipelineConfig::default());
        assert_eq!(m.pauses_count, 2);
    }

    #[test]
    fn test_keywords_ranked_by_frequency() {
        let paras = vec![para(
            "Speaker 1",
            0.0,
            10.0,
            "budget roadmap budget launch roadmap budget",
        )];
        let kws = extract_keywords(&paras, 20);
        assert_eq!(kws, vec!["budget", "roadmap", "launch"]);
    }

    #[test]
    fn test_keywords_filter_stopwords_digits_short() {
        let paras = vec![para("Speaker 1", 0.0, 10.0, "the 12345 ok re-use что planning")];
        let kws = extract_keywords(&paras, 20);
        assert_eq!(kws, vec!["re-use", "planning"]);
    }

    #[test]
    fn test_keywords_top_k() {
        let paras = vec![para("Speaker 1", 0.0, 10.0, "alpha beta gamma delta")];
        let kws = extract_keywords(&paras, 2);
        assert_eq!(kws.len(), 2);
    }
}
