/// Token counting for budget decisions.
///
/// Accuracy is not critical; the budget only needs a safe upper bound.
/// An exact subword tokenizer can be plugged in behind this trait, but
/// the character heuristic is the default.
pub trait TokenEstimator {
    fn count_tokens(&self, text: &str) -> usize;
}

/// Character-based fallback: roughly 4 characters per token, rounded
/// up, never less than 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4).max(1)
    }
}
