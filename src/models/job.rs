use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Metrics;

/// Job lifecycle states, owned by the external job runner. The pipeline
/// core never transitions these itself; it returns a result or a typed
/// error and lets the runner update the job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Error,
}

/// How speaker labels were obtained for this job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiarizationSource {
    /// Labels came from the upstream diarization model.
    Upstream,
    /// Labels came from the alternating pause heuristic.
    Pseudo,
}

/// One job's worth of work handed to the pipeline core.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub job_id: String,
    /// Parsed ASR output for this job.
    pub asr_path: PathBuf,
    /// Directory to write artifacts into.
    pub out_dir: PathBuf,
    /// Override language; otherwise the ASR-detected one is kept.
    pub language: Option<String>,
    /// Audio duration when known upstream; otherwise derived from the
    /// last segment end.
    pub duration_sec: Option<f64>,
}

/// Summary of one completed pipeline run, returned to the job runner.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub duration_sec: f64,
    pub speakers: Vec<String>,
    pub metrics: Metrics,
    pub diarization: DiarizationSource,
    /// Artifact name -> absolute path, for the presentation layer.
    pub out: BTreeMap<String, PathBuf>,
    /// Schema fallbacks and repairs used by the summarizer, if any.
    pub summary_repairs: u32,
    pub summary_schema_fallbacks: u32,
    /// Whether the best-effort refine pass was applied.
    pub summary_refined: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_wire_format() {
        assert_eq!(serde_json::to_string(&JobStatus::Processing).unwrap(), "\"processing\"");
        let status: JobStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(status, JobStatus::Error);
    }

    #[test]
    fn test_diarization_source_wire_format() {
        assert_eq!(
            serde_json::to_string(&DiarizationSource::Pseudo).unwrap(),
            "\"pseudo\""
        );
    }
}
