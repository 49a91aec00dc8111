use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use globset::{Glob, GlobMatcher};

use crate::error::{Error, Result};

/// A document file found under the corpus root.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the corpus root; doubles as the document id.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
    /// Last modification time as seconds since the Unix epoch.
    pub mtime: u64,
}

/// Plain-text formats the search reads directly.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Compile a glob pattern applied to relative document paths.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::Config(format!("invalid glob pattern: {e}")))
}

/// Recursively walk `root` and return every supported document, sorted by
/// relative path.
///
/// Hidden files and directories (names starting with `.`) are skipped.
/// When `filter` is given, only files whose relative path matches it are
/// returned.
pub fn discover_files(
    root: &Path,
    filter: Option<&GlobMatcher>,
) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = root.canonicalize()?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, &mut results)?;

    if let Some(matcher) = filter {
        results.retain(|file| matcher.is_match(&file.relative_path));
    }

    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    tracing::debug!(
        root = %canonical_root.display(),
        count = results.len(),
        "discovered documents"
    );
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk_dir(root, &path, results)?;
        } else if file_type.is_symlink() {
            let Ok(resolved) = path.canonicalize() else {
                tracing::trace!(path = %path.display(), "skipping broken symlink");
                continue;
            };
            // Linked directories are not followed; they may loop.
            if resolved.is_file() && is_supported(&resolved) {
                results.push(make_discovered(root, &path, &resolved)?);
            }
        } else if file_type.is_file() && is_supported(&path) {
            let absolute = path.canonicalize()?;
            results.push(make_discovered(root, &path, &absolute)?);
        }
    }

    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

fn make_discovered(
    root: &Path,
    original_path: &Path,
    absolute_path: &Path,
) -> Result<DiscoveredFile> {
    let relative_path = original_path
        .strip_prefix(root)
        .unwrap_or(original_path)
        .to_path_buf();

    let mtime = std::fs::metadata(absolute_path)?
        .modified()
        .unwrap_or(SystemTime::UNIX_EPOCH)
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    Ok(DiscoveredFile {
        relative_path,
        absolute_path: absolute_path.to_path_buf(),
        mtime,
    })
}
