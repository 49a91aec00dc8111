use std::path::Path;

use rayon::prelude::*;

use crate::{search::Document, walker::DiscoveredFile};

/// Longest first line still accepted as a title.
const MAX_TITLE_CHARS: usize = 80;

/// Pick a display title for a document.
///
/// Prefers the first markdown heading, then a short first non-blank line
/// (plain-text resumes usually open with the candidate's name), then the
/// file name without extension.
fn extract_title(content: &str, file_path: &Path) -> String {
    for line in content.lines() {
        if let Some(heading) = line.trim().strip_prefix("# ") {
            let heading = heading.trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        }
    }

    if let Some(first) = content.lines().map(str::trim).find(|l| !l.is_empty())
        && !first.starts_with('#')
        && first.chars().count() <= MAX_TITLE_CHARS
    {
        return first.to_string();
    }

    file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// Read discovered files into documents, in parallel.
///
/// Unreadable or non-UTF-8 files are skipped with a warning. The output
/// keeps the order of `files`.
pub fn load_documents(files: &[DiscoveredFile]) -> Vec<Document> {
    let documents: Vec<Document> = files
        .par_iter()
        .filter_map(|file| {
            let text = match std::fs::read_to_string(&file.absolute_path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        path = %file.absolute_path.display(),
                        error = %e,
                        "skipping unreadable document"
                    );
                    return None;
                }
            };
            let id = file.relative_path.to_string_lossy().to_string();
            Some(Document {
                title: extract_title(&text, &file.relative_path),
                file: file.absolute_path.clone(),
                id,
                text,
                modified: file.mtime,
            })
        })
        .collect();

    tracing::debug!(
        loaded = documents.len(),
        discovered = files.len(),
        "loaded documents"
    );
    documents
}
