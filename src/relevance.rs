//! Relevance scoring for documents that already passed the boolean filter.
//!
//! Earlier query terms weigh more than later ones, quoted phrases more than
//! single words, and a term counts once however often it repeats in the
//! document. The scorer reads the raw query on its own and shares nothing
//! with the compiled postfix form.

use std::sync::LazyLock;

use regex::Regex;

static PHRASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z0-9+.#-]+\b").unwrap());

const OPERATOR_WORDS: [&str; 3] = ["and", "or", "not"];

/// Multiplier applied to a matching phrase's positional weight.
pub const PHRASE_MULTIPLIER: u64 = 20;

/// Multiplier applied to a matching word's positional weight.
pub const WORD_MULTIPLIER: u64 = 10;

/// The scorer's view of a query: lowercase phrases and words in order of
/// appearance, operator words removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    pub phrases: Vec<String>,
    pub words: Vec<String>,
}

impl QueryTerms {
    pub fn extract(query: &str) -> Self {
        let query = query.to_lowercase();

        let phrases = PHRASE_RE
            .captures_iter(&query)
            .map(|caps| caps[1].to_string())
            .collect();

        let remainder = PHRASE_RE.replace_all(&query, "");
        let words = WORD_RE
            .find_iter(&remainder)
            .map(|m| m.as_str())
            .filter(|word| !OPERATOR_WORDS.contains(word))
            .map(str::to_string)
            .collect();

        Self { phrases, words }
    }

    pub fn len(&self) -> usize {
        self.phrases.len() + self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.words.is_empty()
    }

    /// All terms in scoring order: phrases first, then words.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases
            .iter()
            .chain(self.words.iter())
            .map(String::as_str)
    }

    /// Score `text` against these terms.
    pub fn score(&self, text: &str) -> u64 {
        let text = text.to_lowercase();
        let mut weight = self.len() as u64;
        let mut score = 0;

        for phrase in &self.phrases {
            if text.contains(phrase.as_str()) {
                score += weight * PHRASE_MULTIPLIER;
            }
            weight -= 1;
        }

        for word in &self.words {
            if text.contains(word.as_str()) {
                score += weight * WORD_MULTIPLIER;
            }
            weight -= 1;
        }

        score
    }
}

/// Rank score of `text` for `query`; 0 when either is empty.
///
/// ```
/// use docsift::relevance::score;
///
/// let text = "Alice is a Network Engineer with CCIE";
/// assert_eq!(score("CISSP OR CCIE", text), 10);
/// ```
pub fn score(query: &str, text: &str) -> u64 {
    if query.is_empty() || text.is_empty() {
        return 0;
    }
    QueryTerms::extract(query).score(text)
}
