use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use kbase_core::traits::SearchEngine;

use crate::api::AddTextRequest;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub files: usize,
    pub documents: usize,
    pub chunks: usize,
    pub skipped: Vec<String>,
}

/// Every `.txt` file under `root`, in a stable order.
pub fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("txt"))
        .map(|e| e.into_path())
        .collect()
}

fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(_) => {
            let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

fn document_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

/// Adds each `.txt` file under `root` as one document titled by its file stem
/// and identified by its path relative to `root`. Files that fail request
/// validation are skipped and listed in the report.
pub fn ingest_dir(engine: &dyn SearchEngine, root: &Path, show_progress: bool) -> Result<IngestReport> {
    let files = list_txt_files(root);
    let mut report = IngestReport { files: files.len(), ..IngestReport::default() };
    if files.is_empty() {
        warn!(dir = %root.display(), "no .txt files found");
        return Ok(report);
    }

    let pb = if show_progress { ProgressBar::new(files.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );

    for path in &files {
        let id = document_id(root, path);
        pb.set_message(id.clone());
        let title = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| id.clone());
        let request = AddTextRequest::new(read_text(path)?).with_title(title);
        match request.into_document() {
            Ok(doc) => {
                let outcome = engine.add_document(doc.with_id(id.clone())).with_context(|| format!("ingest {id}"))?;
                report.documents += 1;
                report.chunks += outcome.chunks_added;
            }
            Err(e) => {
                warn!(file = %id, error = %e, "skipping file");
                report.skipped.push(id);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    info!(dir = %root.display(), documents = report.documents, chunks = report.chunks, skipped = report.skipped.len(), "ingest complete");
    Ok(report)
}
