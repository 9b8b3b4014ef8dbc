use crate::llm::tokens::TokenEstimator;
use crate::models::Paragraph;

/// A token-budget-bounded slice of the flattened transcript, consumed
/// by one summarization call.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub estimated_tokens: usize,
}

/// Flatten paragraphs into speaker-prefixed lines, skipping empty text.
pub fn segments_to_lines(paragraphs: &[Paragraph]) -> Vec<String> {
    paragraphs
        .iter()
        .filter(|p| !p.text.is_empty())
        .map(|p| format!("{}: {}", p.speaker, p.text))
        .collect()
}

/// Greedily pack lines into chunks whose estimated token count stays
/// under the budget, never splitting a line.
///
/// A single line that alone exceeds the budget still gets its own
/// chunk. A budget of zero or less means "unbounded": the whole input
/// comes back as one chunk. Empty input yields no chunks.
pub fn chunk_by_token_budget(
    lines: &[String],
    budget_tokens: i64,
    estimator: &dyn TokenEstimator,
) -> Vec<Chunk> {
    if budget_tokens <= 0 {
        if lines.is_empty() {
            return vec![];
        }
        let text = lines.join("\n");
        let estimated_tokens = estimator.count_tokens(&text);
        return vec![Chunk {
            text,
            estimated_tokens,
        }];
    }

    let mut chunks = Vec::new();
    let mut cur: Vec<&str> = Vec::new();
    let mut cur_tokens = 0usize;

    for line in lines {
        // +1 accounts for the joining newline.
        let line_tokens = estimator.count_tokens(line) + 1;
        if !cur.is_empty() && (cur_tokens + line_tokens) as i64 > budget_tokens {
            chunks.push(Chunk {
                text: cur.join("\n"),
                estimated_tokens: cur_tokens,
            });
            cur.clear();
            cur_tokens = 0;
        }
        cur.push(line);
        cur_tokens += line_tokens;
    }

    if !cur.is_empty() {
        chunks.push(Chunk {
            text: cur.join("\n"),
            estimated_tokens: cur_tokens,
        });
    }
    chunks
}
