use chrono::Local;

use crate::models::{SummaryState, Transcript};

/// Assemble the meeting-minutes Markdown document: summary sections,
/// topic timeline, and the full speaker-attributed transcript.
///
/// The result is hard-capped at `max_chars` characters with a trailing
/// ellipsis marker - a deliberate bound on document size, not an error.
pub fn build_minutes_md(
    transcript: &Transcript,
    summary: &SummaryState,
    max_chars: usize,
) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M");
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Meeting Minutes — {}", generated));
    lines.push(String::new());
    lines.push("## TL;DR".to_string());
    lines.push(summary.tldr.clone());
    lines.push(String::new());

    lines.push("## Decisions".to_string());
    for decision in &summary.decisions {
        lines.push(format!("- {}", decision));
    }
    lines.push(String::new());

    lines.push("## Action Items".to_string());
    for item in &summary.action_items {
        let owner = item.owner.as_deref().unwrap_or("not specified");
        let due = item.due.as_deref().unwrap_or("not specified");
        lines.push(format!("- [ ] {} (owner: {}, due: {})", item.text, owner, due));
    }
    lines.push(String::new());

    lines.push("## Risks".to_string());
    for risk in &summary.risks {
        lines.push(format!("- {}", risk));
    }
    lines.push(String::new());

    lines.push("## Topics (timeline)".to_string());
    for topic in &transcript.topics {
        lines.push(format!("- {}–{} — {}", topic.start, topic.end, topic.title));
    }
    lines.push(String::new());

    lines.push("## Transcript (speakers)".to_string());
    for para in &transcript.segments {
        lines.push(format!(
            "{} {}: {}",
            transcript_timestamp(para.start),
            para.speaker,
            para.text
        ));
    }

    truncate_with_marker(&lines.join("\n"), max_chars)
}

/// `[HH:MM:SS]` label for a transcript line.
fn transcript_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "[{:02}:{:02}:{:02}]",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Cap the document at `max_chars` characters plus an ellipsis marker.
fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("\n...\n");
    out
}
