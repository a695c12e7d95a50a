//! Document loader: scans a directory for PDF files and extracts page text.

use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PipelineError, Result};
use crate::models::PageDocument;

const MIME_PDF: &str = "application/pdf";

/// Scan `dir` for files matching `include_globs` (relative to `dir`) and
/// extract one [`PageDocument`] per page, in page order.
///
/// Non-matching files are silently skipped. Files are visited in sorted
/// order so repeated runs see the same sequence. A missing or unreadable
/// directory, or a PDF that fails to parse, aborts the scan.
pub fn load_pdf_dir(
    dir: &Path,
    include_globs: &[String],
    limit: Option<usize>,
) -> Result<Vec<PageDocument>> {
    if !dir.is_dir() {
        return Err(PipelineError::Load(format!(
            "data directory does not exist: {}",
            dir.display()
        )));
    }

    let include_set = build_globset(include_globs)?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry =
            entry.map_err(|e| PipelineError::Load(format!("failed to read directory: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(dir).unwrap_or(path);
        if include_set.is_match(relative) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    if let Some(lim) = limit {
        files.truncate(lim);
    }

    let mut pages = Vec::new();
    for path in &files {
        let file_pages = load_pdf_file(path)?;
        debug!(file = %path.display(), pages = file_pages.len(), "extracted");
        pages.extend(file_pages);
    }

    Ok(pages)
}

/// Extract every page of a single PDF, preserving page order.
fn load_pdf_file(path: &Path) -> Result<Vec<PageDocument>> {
    let page_texts = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| PipelineError::Load(format!("failed to parse {}: {e}", path.display())))?;

    let modified_at = file_modified_at(path);
    let total_pages = page_texts.len() as u32;
    let source = path.display().to_string();

    Ok(page_texts
        .into_iter()
        .enumerate()
        .map(|(i, content)| PageDocument {
            content,
            source: source.clone(),
            page: i as u32 + 1,
            total_pages,
            content_type: MIME_PDF.to_string(),
            modified_at,
        })
        .collect())
}

fn file_modified_at(path: &Path) -> DateTime<Utc> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
    DateTime::<Utc>::from(modified)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| PipelineError::Config(format!("invalid glob '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| PipelineError::Config(format!("invalid glob set: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_globs() -> Vec<String> {
        vec!["*.pdf".to_string()]
    }

    #[test]
    fn missing_directory_is_a_load_error() {
        let err = load_pdf_dir(Path::new("/no/such/dir"), &pdf_globs(), None).unwrap_err();
        assert!(matches!(err, PipelineError::Load(_)));
    }

    #[test]
    fn directory_without_pdfs_yields_empty_list() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "plain text").unwrap();
        std::fs::write(tmp.path().join("table.csv"), "a,b,c").unwrap();

        let pages = load_pdf_dir(tmp.path(), &pdf_globs(), None).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn invalid_glob_is_a_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let globs = vec!["[".to_string()];
        let err = load_pdf_dir(tmp.path(), &globs, None).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn corrupt_pdf_is_a_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("broken.pdf"), b"not a pdf").unwrap();

        let err = load_pdf_dir(tmp.path(), &pdf_globs(), None).unwrap_err();
        assert!(matches!(err, PipelineError::Load(_)));
    }
}
