use thiserror::Error;

/// Fatal pipeline failures surfaced to the job runner.
///
/// Format failures from the summarization backend are not represented
/// here: they are recovered locally (relaxed-mode retry, then text
/// repair) and at worst degrade the summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upstream ASR output could not be read or parsed.
    #[error("invalid ASR input: {0}")]
    Input(String),

    /// The summarization backend was unavailable mid-job.
    #[error("summarization backend failed: {0}")]
    Backend(#[from] BackendError),

    /// Artifact persistence failed.
    #[error("failed to write artifact {path}: {message}")]
    Artifact { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from the summarization backend collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend rejected the schema-constrained response format.
    /// The summarizer degrades to the free JSON-object mode on this.
    #[error("backend rejected the schema-constrained response format")]
    SchemaRejected,

    /// Transport-level failure (network, timeout, non-2xx status).
    #[error("backend request failed: {0}")]
    Request(String),

    /// The response envelope itself could not be decoded.
    #[error("backend returned an unreadable response: {0}")]
    Response(String),
}
