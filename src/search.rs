use std::{collections::HashMap, path::PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    corpus_dir::CorpusDir,
    error::Result,
    ingestion,
    query,
    relevance::QueryTerms,
    text_util::{self, ANSI_HIGHLIGHT},
};

/// Default number of results returned by a search.
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// A document supplied to the engine. The text is treated as opaque.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the corpus root.
    pub id: String,
    pub title: String,
    pub file: PathBuf,
    pub text: String,
    /// Seconds since the Unix epoch; only used to break score ties.
    pub modified: u64,
}

/// A document that satisfied the boolean filter, with its rank score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub id: String,
    pub score: u64,
    pub modified: u64,
}

/// A ranked, display-ready search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub score: u64,
    pub id: String,
    pub file: String,
    pub title: String,
    pub modified: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    /// Number of results to return, ignored when `all` is set.
    pub count: usize,
    pub all: bool,
    /// Results scoring below this are dropped.
    pub min_score: u64,
    /// Glob over relative document paths.
    pub glob: Option<String>,
    /// Attach a line-numbered snippet to every hit.
    pub snippets: bool,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: DEFAULT_RESULT_COUNT,
            all: false,
            min_score: 0,
            glob: None,
            snippets: false,
        }
    }
}

/// Filter `documents` through `query` and score the survivors, best first.
///
/// The query is compiled once. A query that fails to compile is logged and
/// matches nothing, as does an empty query.
pub fn rank_documents(query: &str, documents: &[Document]) -> Vec<MatchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let compiled = match query::compile(query) {
        Ok(compiled) => compiled,
        Err(e) => {
            tracing::debug!(query, error = %e, "malformed query matches nothing");
            return Vec::new();
        }
    };
    tracing::trace!(postfix = %compiled, "compiled query");

    let terms = QueryTerms::extract(query);
    let mut matches: Vec<MatchResult> = documents
        .par_iter()
        .filter(|doc| compiled.matches(&doc.text))
        .map(|doc| MatchResult {
            id: doc.id.clone(),
            score: terms.score(&doc.text),
            modified: doc.modified,
        })
        .collect();

    sort_matches(&mut matches);
    matches
}

/// Order by score, then modification time (both descending), then id so
/// identical queries always produce identical orderings.
pub fn sort_matches(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.modified.cmp(&a.modified))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Execute the full search pipeline over the corpus.
///
/// 1. Discover and load documents (optionally restricted by glob)
/// 2. Boolean filter and relevance scoring
/// 3. Filter by min_score
/// 4. Limit to count results
pub fn execute_search(
    params: &SearchParams,
    corpus: &CorpusDir,
) -> Result<Vec<SearchHit>> {
    let files = corpus.discover(params.glob.as_deref())?;
    let documents = ingestion::load_documents(&files);
    Ok(search_documents(params, &documents))
}

/// Stages 2-4 of [`execute_search`] over already loaded documents.
pub fn search_documents(
    params: &SearchParams,
    documents: &[Document],
) -> Vec<SearchHit> {
    let matches = rank_documents(&params.query, documents);
    tracing::debug!(
        query = %params.query,
        matched = matches.len(),
        searched = documents.len(),
        "search complete"
    );

    let by_id: HashMap<&str, &Document> =
        documents.iter().map(|doc| (doc.id.as_str(), doc)).collect();
    let terms = params.snippets.then(|| QueryTerms::extract(&params.query));
    let limit = if params.all { usize::MAX } else { params.count };

    matches
        .into_iter()
        .filter(|m| m.score >= params.min_score)
        .take(limit)
        .enumerate()
        .filter_map(|(i, m)| {
            let doc = by_id.get(m.id.as_str())?;
            let snippet = terms.as_ref().and_then(|terms| {
                text_util::extract_snippet(&doc.text, terms).map(
                    |(snippet, start_line)| {
                        text_util::add_line_numbers(&snippet, start_line)
                    },
                )
            });
            Some(SearchHit {
                rank: i + 1,
                score: m.score,
                id: m.id,
                file: doc.file.to_string_lossy().to_string(),
                title: doc.title.clone(),
                modified: m.modified,
                snippet,
            })
        })
        .collect()
}

/// Format results for human-readable terminal output.
///
/// With `color`, query terms inside snippets are highlighted.
pub fn format_human(results: &[SearchHit], query: &str, color: bool) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    let terms = QueryTerms::extract(query);
    for r in results {
        println!(
            "{:>3}. [{}] {} (modified {})",
            r.rank, r.score, r.id, r.modified
        );
        if !r.title.is_empty() {
            println!("     {}", r.title);
        }
        if let Some(ref snippet) = r.snippet {
            let snippet = if color {
                text_util::highlight_terms(snippet, &terms, ANSI_HIGHLIGHT)
            } else {
                snippet.clone()
            };
            for line in snippet.lines() {
                println!("       {line}");
            }
        }
    }
    println!("\n{} result(s)", results.len());
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    query: &'a str,
    result_count: usize,
    results: &'a [SearchHit],
}

/// Render results as a JSON document.
pub fn render_json(results: &[SearchHit], query: &str) -> Result<String> {
    Ok(serde_json::to_string(&SearchResponse {
        query,
        result_count: results.len(),
        results,
    })?)
}

/// Format results as JSON output.
pub fn format_json(results: &[SearchHit], query: &str) -> Result<()> {
    println!("{}", render_json(results, query)?);
    Ok(())
}

/// Format results as plain file paths (one per line).
pub fn format_files(results: &[SearchHit]) {
    for r in results {
        println!("{}", r.file);
    }
}
