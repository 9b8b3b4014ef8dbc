pub mod config;
pub mod error;
pub mod export;
pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use config::{LlmConfig, PipelineConfig};
pub use error::{BackendError, PipelineError};
pub use io::{ensure_job_dirs, parse_asr_file, parse_asr_json, write_json, write_text, AsrDocument};
pub use llm::{
    chunk_by_token_budget, segments_to_lines, summarize_transcript, HeuristicEstimator,
    OpenAiClient, SummaryBackend, SummaryOutcome, TokenEstimator,
};
pub use models::{
    ActionItem, CaptionLine, DiarizationSource, Metrics, Paragraph, PipelineRequest,
    PipelineResult, Segment, SummaryState, Topic, Transcript, Word,
};
pub use stages::{
    build_paragraphs, compute_metrics, extract_keywords, pseudo_diarize, run_pipeline,
};
