use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    walker::{self, DiscoveredFile},
};

/// Environment variable naming the corpus directory.
pub const CORPUS_ENV: &str = "DOCSIFT_CORPUS";

/// The directory whose documents are searched.
#[derive(Debug, Clone)]
pub struct CorpusDir {
    root: PathBuf,
}

impl CorpusDir {
    /// Resolve the corpus directory from, in order of priority:
    /// 1. An explicit path (from --corpus)
    /// 2. The DOCSIFT_CORPUS environment variable
    /// 3. The XDG data directory (~/.local/share/docsift/documents)
    ///
    /// The directory must already exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var(CORPUS_ENV) {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("docsift")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
                .join("documents")
        };

        Self::open(root)
    }

    /// Use `root` as the corpus directory.
    pub fn open(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::CorpusDir(root));
        }
        tracing::debug!(root = %root.display(), "using corpus directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover documents, optionally restricted by a glob over relative
    /// paths.
    pub fn discover(&self, glob: Option<&str>) -> Result<Vec<DiscoveredFile>> {
        let matcher = glob.map(walker::compile_glob).transpose()?;
        walker::discover_files(&self.root, matcher.as_ref())
    }
}
