use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Directory layout for one job under a data root.
#[derive(Debug, Clone)]
pub struct JobDirs {
    pub job_dir: PathBuf,
    pub in_dir: PathBuf,
    pub work_dir: PathBuf,
    pub out_dir: PathBuf,
}

/// Create (if needed) and return the per-job directory layout.
pub fn ensure_job_dirs(data_dir: &Path, job_id: &str) -> Result<JobDirs> {
    let job_dir = data_dir.join("uploads").join(job_id);
    let dirs = JobDirs {
        in_dir: job_dir.join("in"),
        work_dir: job_dir.join("work"),
        out_dir: job_dir.join("out"),
        job_dir,
    };
    for dir in [&dirs.in_dir, &dirs.work_dir, &dirs.out_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create job directory {:?}", dir))?;
    }
    Ok(dirs)
}

/// Write a value as pretty-printed UTF-8 JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("failed to write JSON to {:?}", path))?;
    Ok(())
}

/// Write UTF-8 text content.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write file: {:?}", path))
}
