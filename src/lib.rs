//! docsift - boolean search and relevance ranking for folders of text
//! documents.
//!
//! Queries combine words and quoted phrases with `AND`, `OR`, `NOT` and
//! parentheses. Every document is filtered by case-insensitive substring
//! matching, and the survivors are ranked by a positional score that
//! favors phrases over words and earlier terms over later ones.
//!
//! # Quick start
//!
//! ```no_run
//! use docsift::CorpusDir;
//! use docsift::search::{self, SearchParams};
//!
//! let corpus = CorpusDir::resolve(None).unwrap();
//! let params = SearchParams::new(r#"("spring boot" OR springboot) AND java"#);
//!
//! let results = search::execute_search(&params, &corpus).unwrap();
//! for r in &results {
//!     println!("{} (score: {})", r.id, r.score);
//! }
//! ```
//!
//! The engine itself works on any text:
//!
//! ```
//! use docsift::{evaluator, relevance};
//!
//! let text = "Alice is a Network Engineer with CCIE";
//! assert!(evaluator::matches("CISSP OR CCIE", text));
//! assert_eq!(relevance::score("CISSP OR CCIE", text), 10);
//! ```

pub mod corpus_dir;
pub mod error;
pub mod evaluator;
pub mod ingestion;
pub mod mcp;
pub mod query;
pub mod relevance;
pub mod search;
pub mod text_util;
pub mod walker;

pub use corpus_dir::CorpusDir;
pub use error::{Error, QueryError, Result};
pub use query::{CompiledQuery, compile};
pub use search::{Document, MatchResult};
