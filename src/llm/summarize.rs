use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::{BackendError, PipelineError};
use crate::llm::chunking::{chunk_by_token_budget, segments_to_lines, Chunk};
use crate::llm::client::{ChatMessage, ResponseMode, SummaryBackend};
use crate::llm::prompts::{
    build_chunk_messages, summary_schema, JSON_ONLY_INSTRUCTION, REFINE_SYSTEM_PROMPT,
    REPAIR_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT,
};
use crate::llm::tokens::TokenEstimator;
use crate::models::{ActionItem, SummaryState, Transcript};

/// Degradation record for one summarization run. Format problems are
/// recovered, not swallowed: callers can see how rough the ride was.
#[derive(Debug, Clone, Default)]
pub struct SummarizeReport {
    pub chunks: u32,
    /// Times the backend rejected the schema mode and the free
    /// JSON-object fallback was used.
    pub schema_fallbacks: u32,
    /// Times a response failed to parse and the repair sub-step ran.
    pub repairs: u32,
    /// Whether the best-effort refine pass was applied.
    pub refined: bool,
}

/// Final summary plus its degradation report.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub state: SummaryState,
    pub report: SummarizeReport,
}

/// Fold transcript chunks through the bounded-context backend into one
/// SummaryState.
///
/// Each iteration sends the serialized running state plus one new chunk
/// and merges the response back in, so the model stays coherent over a
/// meeting longer than its context. Chunk iteration is inherently
/// sequential. Backend unavailability is fatal; malformed responses are
/// repaired; refine failures are skipped.
pub async fn summarize_transcript<B: SummaryBackend>(
    backend: &B,
    estimator: &dyn TokenEstimator,
    transcript: &Transcript,
    config: &LlmConfig,
) -> Result<SummaryOutcome, PipelineError> {
    let lines = segments_to_lines(&transcript.segments);
    let mut state = SummaryState::default();
    let mut report = SummarizeReport::default();
    let mut tokens_total = 0u64;

    // Keep chunks well below the model limit to leave room for the
    // system prompt and the growing state.
    let base_budget = ((config.max_tokens as f64 * 0.7) as i64).max(256);
    let overhead = (estimator.count_tokens(SUMMARY_SYSTEM_PROMPT)
        + estimator.count_tokens(&state.to_prompt_json())
        + 64) as i64;
    let chunk_budget = (base_budget - overhead).max(128);

    let chunks = chunk_by_token_budget(&lines, chunk_budget, estimator);
    report.chunks = chunks.len() as u32;
    info!(
        "summarizing {} lines in {} chunks (budget {} tokens)",
        lines.len(),
        chunks.len(),
        chunk_budget
    );

    let schema = summary_schema();

    for (idx, chunk) in chunks.iter().enumerate() {
        debug!(
            "chunk {}/{}: ~{} tokens",
            idx + 1,
            chunks.len(),
            chunk.estimated_tokens
        );
        let new_state = process_chunk(backend, &state, chunk, &schema, &mut report).await?;
        if let Some(n) = new_state.tokens_used {
            tokens_total += n;
        }
        state = merge_states(&state, &new_state);
    }

    state = refine(backend, state, &mut report).await;
    state = sanitize_state(state);
    if tokens_total > 0 {
        state.tokens_used = Some(tokens_total);
    }

    Ok(SummaryOutcome { state, report })
}

/// One ITERATE step: schema-constrained call, relaxed retry on schema
/// rejection, repair on unparseable output. Transport failures
/// propagate as fatal.
async fn process_chunk<B: SummaryBackend>(
    backend: &B,
    state: &SummaryState,
    chunk: &Chunk,
    schema: &Value,
    report: &mut SummarizeReport,
) -> Result<SummaryState, PipelineError> {
    let messages = build_chunk_messages(&state.to_prompt_json(), &chunk.text);

    let reply = match backend
        .complete(&messages, &ResponseMode::JsonSchema(schema.clone()))
        .await
    {
        Ok(reply) => reply,
        Err(BackendError::SchemaRejected) => {
            warn!("backend rejected json_schema mode, retrying with json_object");
            report.schema_fallbacks += 1;
            let mut relaxed = messages.clone();
            relaxed.push(ChatMessage::system(JSON_ONLY_INSTRUCTION));
            backend
                .complete(&relaxed, &ResponseMode::JsonObject)
                .await?
        }
        Err(e) => return Err(e.into()),
    };

    let mut new_state = match parse_state(&reply.text) {
        Some(parsed) => parsed,
        None => {
            warn!("chunk response is not valid JSON, running repair");
            report.repairs += 1;
            repair(backend, &reply.text).await
        }
    };
    new_state.tokens_used = reply.tokens_used;
    Ok(new_state)
}

/// Ask the backend to coerce free-form text into the schema. If that
/// also fails, degrade to a state whose tldr is the raw text - a
/// formatting failure never kills the job.
async fn repair<B: SummaryBackend>(backend: &B, raw_text: &str) -> SummaryState {
    let messages = vec![
        ChatMessage::system(REPAIR_SYSTEM_PROMPT),
        ChatMessage::user(raw_text),
    ];
    match backend.complete(&messages, &ResponseMode::JsonObject).await {
        Ok(reply) => parse_state(&reply.text).unwrap_or_else(|| raw_text_state(raw_text)),
        Err(e) => {
            warn!("repair call failed ({}), keeping raw text as tldr", e);
            raw_text_state(raw_text)
        }
    }
}

fn raw_text_state(raw_text: &str) -> SummaryState {
    SummaryState {
        tldr: raw_text.to_string(),
        ..Default::default()
    }
}

/// Best-effort tidy-up pass. Any failure keeps the pre-refine state.
async fn refine<B: SummaryBackend>(
    backend: &B,
    state: SummaryState,
    report: &mut SummarizeReport,
) -> SummaryState {
    let messages = vec![
        ChatMessage::system(REFINE_SYSTEM_PROMPT),
        ChatMessage::user(state.to_prompt_json()),
    ];
    match backend.complete(&messages, &ResponseMode::JsonObject).await {
        Ok(reply) => match parse_state(&reply.text) {
            Some(refined) => {
                report.refined = true;
                merge_states(&state, &refined)
            }
            None => {
                warn!("refine response unparseable, keeping accumulated state");
                state
            }
        },
        Err(e) => {
            warn!("refine call failed ({}), keeping accumulated state", e);
            state
        }
    }
}

/// Merge a new partial state into the running one.
///
/// tldr is latest-wins (never concatenated, to avoid unbounded
/// growth); the three list fields are ordered unions with exact-match
/// dedup, first occurrence kept. Empty entries are dropped first.
pub fn merge_states(a: &SummaryState, b: &SummaryState) -> SummaryState {
    let tldr = if b.tldr.trim().is_empty() {
        a.tldr.trim().to_string()
    } else {
        b.tldr.trim().to_string()
    };

    let mut action_items: Vec<ActionItem> = Vec::new();
    let mut seen_items = std::collections::HashSet::new();
    for item in a.action_items.iter().chain(b.action_items.iter()) {
        if item.is_empty() {
            continue;
        }
        if seen_items.insert(item.key()) {
            action_items.push(item.clone());
        }
    }

    SummaryState {
        tldr,
        action_items,
        decisions: dedup_strings(&a.decisions, &b.decisions),
        risks: dedup_strings(&a.risks, &b.risks),
        tokens_used: None,
    }
}

fn dedup_strings(a: &[String], b: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for s in a.iter().chain(b.iter()) {
        if s.trim().is_empty() {
            continue;
        }
        if seen.insert(s.clone()) {
            out.push(s.clone());
        }
    }
    out
}

/// Lenient parse of a backend response: None means the text is not
/// valid JSON at all (repair territory). Valid JSON that is not an
/// object yields an empty state, which merges as a no-op. Within an
/// object, fields of the wrong shape are discarded.
pub fn parse_state(text: &str) -> Option<SummaryState> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    let Value::Object(map) = value else {
        return Some(SummaryState::default());
    };

    let tldr = map
        .get("tldr")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let action_items = map
        .get("action_items")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| serde_json::from_value::<ActionItem>(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Some(SummaryState {
        tldr,
        action_items,
        decisions: string_list(map.get("decisions")),
        risks: string_list(map.get("risks")),
        tokens_used: None,
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Coerce the final state to its guaranteed shape and cap the tldr at
/// seven sentences.
pub fn sanitize_state(mut state: SummaryState) -> SummaryState {
    state.tldr = limit_sentences(&state.tldr, 7);
    state
}

/// Keep at most `max_sentences`, splitting after `.`/`!`/`?` followed
/// by whitespace, preserving order.
pub fn limit_sentences(text: &str, max_sentences: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        cur.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            if !cur.trim().is_empty() {
                parts.push(cur.trim().to_string());
            }
            cur.clear();
        }
    }
    if !cur.trim().is_empty() {
        parts.push(cur.trim().to_string());
    }

    parts.truncate(max_sentences);
    parts.join(" ")
}
