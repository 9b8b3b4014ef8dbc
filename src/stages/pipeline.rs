use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::export::{build_minutes_md, build_srt, build_vtt};
use crate::io::{parse_asr_file, write_json, write_text};
use crate::llm::{summarize_transcript, SummaryBackend, TokenEstimator};
use crate::models::{
    DiarizationSource, PipelineRequest, PipelineResult, Transcript, Word,
};
use crate::stages::diarize::{needs_pseudo_diarization, pseudo_diarize};
use crate::stages::metrics::{compute_metrics, extract_keywords};
use crate::stages::paragraphs::build_paragraphs;

/// Run the full post-ASR pipeline for one job: paragraphs, metrics,
/// keywords, iterative summarization, and the six output artifacts.
///
/// Degenerate input (no segments, no words) produces empty-but-valid
/// artifacts. Upstream and backend failures propagate as typed errors;
/// the job runner owns status transitions and timeouts.
pub async fn run_pipeline<B: SummaryBackend>(
    request: &PipelineRequest,
    config: &PipelineConfig,
    backend: &B,
    estimator: &dyn TokenEstimator,
) -> Result<PipelineResult, PipelineError> {
    info!("starting pipeline for job {}", request.job_id);

    let doc = parse_asr_file(&request.asr_path)?;
    let doc_duration = doc.effective_duration();
    let mut segments = doc.segments;
    info!(
        "loaded {} segments, language {:?}",
        segments.len(),
        doc.language
    );

    let diarization = if needs_pseudo_diarization(&segments, config.fast_mode) {
        pseudo_diarize(&mut segments, config);
        DiarizationSource::Pseudo
    } else {
        DiarizationSource::Upstream
    };

    let paragraphs = build_paragraphs(&segments, config);
    let metrics = compute_metrics(&paragraphs, config);
    let keywords = extract_keywords(&paragraphs, config.keyword_top_k);

    let mut speakers: Vec<String> = paragraphs.iter().map(|p| p.speaker.clone()).collect();
    speakers.sort();
    speakers.dedup();

    let duration_sec = request.duration_sec.unwrap_or(doc_duration);

    let transcript = Transcript {
        job_id: request.job_id.clone(),
        language: request.language.clone().or(doc.language),
        duration_sec,
        speakers: speakers.clone(),
        metrics: metrics.clone(),
        segments: paragraphs,
        keywords,
        // Topic segmentation is stubbed; the field stays in the artifact.
        topics: vec![],
    };
    info!(
        "built {} paragraphs, {} speakers, {:.1}s",
        transcript.segments.len(),
        speakers.len(),
        duration_sec
    );

    let outcome = summarize_transcript(backend, estimator, &transcript, &config.llm).await?;
    info!(
        "summary done: {} chunks, {} repairs, {} schema fallbacks, refined={}",
        outcome.report.chunks,
        outcome.report.repairs,
        outcome.report.schema_fallbacks,
        outcome.report.refined
    );

    let out = write_artifacts(request, config, &transcript, &outcome.state)?;

    Ok(PipelineResult {
        job_id: request.job_id.clone(),
        language: transcript.language.clone(),
        duration_sec,
        speakers,
        metrics,
        diarization,
        out,
        summary_repairs: outcome.report.repairs,
        summary_schema_fallbacks: outcome.report.schema_fallbacks,
        summary_refined: outcome.report.refined,
    })
}

fn write_artifacts(
    request: &PipelineRequest,
    config: &PipelineConfig,
    transcript: &Transcript,
    summary: &crate::models::SummaryState,
) -> Result<BTreeMap<String, PathBuf>, PipelineError> {
    let out_dir = &request.out_dir;
    std::fs::create_dir_all(out_dir)?;
    let mut out = BTreeMap::new();

    let artifact = |name: &str| out_dir.join(name);
    let record = |out: &mut BTreeMap<String, PathBuf>, key: &str, path: &Path| {
        out.insert(key.to_string(), path.to_path_buf());
    };

    let path = artifact("transcript.json");
    persist(&path, || write_json(&path, transcript))?;
    record(&mut out, "transcript_json", &path);

    let path = artifact("summary.json");
    persist(&path, || write_json(&path, summary))?;
    record(&mut out, "summary_json", &path);

    // Subtitles only exist when word alignment does.
    let all_words: Vec<Word> = transcript.all_words();
    if !all_words.is_empty() {
        let path = artifact("subs.srt");
        persist(&path, || {
            write_text(&path, &build_srt(&all_words, config.caption_max_chars))
        })?;
        record(&mut out, "srt", &path);

        let path = artifact("subs.vtt");
        persist(&path, || {
            write_text(&path, &build_vtt(&all_words, config.caption_max_chars))
        })?;
        record(&mut out, "vtt", &path);
    }

    let md = build_minutes_md(transcript, summary, config.minutes_max_chars);
    let path = artifact("minutes.md");
    persist(&path, || write_text(&path, &md))?;
    record(&mut out, "minutes_md", &path);

    let path = artifact("minutes.json");
    persist(&path, || {
        write_json(&path, &json!({"transcript": transcript, "summary": summary}))
    })?;
    record(&mut out, "minutes_json", &path);

    Ok(out)
}

fn persist(path: &Path, write: impl FnOnce() -> anyhow::Result<()>) -> Result<(), PipelineError> {
    write().map_err(|e| PipelineError::Artifact {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
