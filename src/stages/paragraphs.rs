use crate::config::PipelineConfig;
use crate::models::{Paragraph, Segment};

/// Merge time-ordered ASR segments into speaker paragraphs.
///
/// A new paragraph starts when there is no open paragraph, the speaker
/// changes, or the gap from the last observed end reaches the pause
/// threshold. Otherwise the segment extends the open paragraph: the end
/// advances, the text is space-appended, the words carry over.
pub fn build_paragraphs(segments: &[Segment], config: &PipelineConfig) -> Vec<Paragraph> {
    let mut paras = Vec::new();
    let mut cur: Option<Paragraph> = None;
    let mut last_end = 0.0f64;

    for seg in segments {
        let speaker = seg
            .speaker
            .clone()
            .unwrap_or_else(|| config.speaker_label(1));
        let text = seg.text.trim();

        if let Some(open) = cur.take() {
            if speaker != open.speaker || seg.start - last_end >= config.pause_threshold_sec {
                paras.push(open);
            } else {
                cur = Some(open);
            }
        }

        match cur.as_mut() {
            None => {
                cur = Some(Paragraph {
                    speaker,
                    start: seg.start,
                    end: seg.end,
                    text: text.to_string(),
                    words: seg.words.clone(),
                });
            }
            Some(open) => {
                open.end = open.end.max(seg.end);
                if !text.is_empty() {
                    if !open.text.is_empty() {
                        open.text.push(' ');
                    }
                    open.text.push_str(text);
                }
                open.words.extend(seg.words.iter().cloned());
            }
        }

        last_end = seg.end;
    }

    if let Some(open) = cur {
        paras.push(open);
    }
    paras
}
