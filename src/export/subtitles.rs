use crate::models::{CaptionLine, Word};

/// Greedily group words into caption lines of at most `max_chars`
/// characters, independent of paragraph and speaker boundaries.
///
/// A line's start is the first word's start; its end is the last word's
/// end. A word that would push the line over the limit starts the next
/// line (a single oversized word still becomes a line of its own).
pub fn words_to_caption_lines(words: &[Word], max_chars: usize) -> Vec<CaptionLine> {
    let mut lines = Vec::new();
    let mut cur_text: Vec<&str> = Vec::new();
    let mut cur_start: Option<f64> = None;
    let mut last_end: Option<f64> = None;

    for word in words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }
        if cur_start.is_none() {
            cur_start = Some(word.start);
        }

        let prospective_len = cur_text
            .iter()
            .map(|t| t.chars().count() + 1)
            .sum::<usize>()
            + text.chars().count();
        if prospective_len > max_chars && !cur_text.is_empty() {
            lines.push(CaptionLine {
                start: cur_start.unwrap_or(0.0),
                end: last_end.unwrap_or(word.end),
                text: cur_text.join(" "),
            });
            cur_text = vec![text];
            cur_start = Some(word.start);
        } else {
            cur_text.push(text);
        }
        last_end = Some(word.end);
    }

    if !cur_text.is_empty() {
        let start = cur_start.unwrap_or(0.0);
        lines.push(CaptionLine {
            start,
            end: last_end.unwrap_or(start + 1.0),
            text: cur_text.join(" "),
        });
    }
    lines
}

/// Render SRT subtitle blocks with 1-based sequence numbers.
pub fn build_srt(words: &[Word], max_chars: usize) -> String {
    let lines = words_to_caption_lines(words, max_chars);
    let blocks: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                srt_timestamp(line.start),
                srt_timestamp(line.end),
                line.text
            )
        })
        .collect();
    format!("{}\n", blocks.join("\n").trim_end())
}

/// Render a WebVTT document.
pub fn build_vtt(words: &[Word], max_chars: usize) -> String {
    let lines = words_to_caption_lines(words, max_chars);
    let mut out = String::from("WEBVTT\n\n");
    for line in &lines {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            vtt_timestamp(line.start),
            vtt_timestamp(line.end),
            line.text
        ));
    }
    out
}

/// `HH:MM:SS,mmm` from seconds, millisecond-rounded.
pub fn srt_timestamp(seconds: f64) -> String {
    let (h, m, s, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// `HH:MM:SS.mmm` from seconds, millisecond-rounded.
pub fn vtt_timestamp(seconds: f64) -> String {
    let (h, m, s, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// Floor-division decomposition of total milliseconds.
fn split_millis(seconds: f64) -> (u64, u64, u64, u64) {
    let mut ms = (seconds * 1000.0).round().max(0.0) as u64;
    let h = ms / 3_600_000;
    ms -= h * 3_600_000;
    let m = ms / 60_000;
    ms -= m * 60_000;
    let s = ms / 1000;
    ms -= s * 1000;
    (h, m, s, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(start: f64, end: f64, text: &str) -> Word {
        Word {
            start,
            end,
            text: text.to_string(),
            speaker: None,
        }
    }

    #[test]
    fn test_short_words_one_line() {
        let words = vec![word(0.0, 0.4, "Hello"), word(0.5, 1.0, "world")];
        let lines = words_to_caption_lines(&words, 20);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
        assert_eq!(lines[0].start, 0.0);
        assert_eq!(lines[0].end, 1.0);
    }

    #[test]
    fn test_line_break_on_overflow() {
        let words = vec![
            word(0.0, 1.0, "aaaaa"),
            word(1.0, 2.0, "bbbbb"),
            word(2.0, 3.0, "ccccc"),
        ];
        let lines = words_to_caption_lines(&words, 11);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "aaaaa bbbbb");
        assert_eq!(lines[0].end, 2.0);
        assert_eq!(lines[1].text, "ccccc");
        assert_eq!(lines[1].start, 2.0);
    }

    #[test]
    fn test_empty_words_skipped() {
        let words = vec![word(0.0, 0.5, "  "), word(0.5, 1.0, "hi")];
        let lines = words_to_caption_lines(&words, 55);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hi");
    }

    #[test]
    fn test_srt_and_vtt_output() {
        let words = vec![word(0.0, 1.0, "Hello"), word(1.0, 2.0, "world")];
        let srt = build_srt(&words, 55);
        let vtt = build_vtt(&words, 55);

        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("00:00:00,000 --> 00:00:02,000"));
        assert!(srt.contains("Hello world"));
        assert!(vtt.starts_with("WEBVTT"));
        assert!(vtt.contains("00:00:00.000 --> 00:00:02.000"));
    }

    #[test]
    fn test_timestamp_decomposition() {
        assert_eq!(srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(srt_timestamp(1.5), "00:00:01,500");
        assert_eq!(srt_timestamp(3661.007), "01:01:01,007");
        assert_eq!(vtt_timestamp(59.9995), "00:01:00.000");
    }

    #[test]
    fn test_timestamp_round_trip_within_1ms() {
        fn parse(ts: &str, sep: char) -> f64 {
            let (hms, ms) = ts.rsplit_once(sep).unwrap();
            let parts: Vec<u64> = hms.split(':').map(|p| p.parse().unwrap()).collect();
            (parts[0] * 3600 + parts[1] * 60 + parts[2]) as f64 + ms.parse::<f64>().unwrap() / 1000.0
        }

        for &secs in &[0.0, 0.123, 59.999, 61.5, 3599.001, 7325.250] {
            let rt = parse(&srt_timestamp(secs), ',');
            assert!((rt - secs).abs() <= 0.001, "{} -> {}", secs, rt);
            let rt = parse(&vtt_timestamp(secs), '.');
            assert!((rt - secs).abs() <= 0.001, "{} -> {}", secs, rt);
        }
    }
}
