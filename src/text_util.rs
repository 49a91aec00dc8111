use regex::{Regex, RegexBuilder};

use crate::relevance::QueryTerms;

/// Default number of lines in a snippet when no term is found.
pub const DEFAULT_SNIPPET_LINES: usize = 6;

/// Maximum number of bytes in a snippet before truncation.
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 400;

/// ANSI markers used to highlight terms on a terminal.
pub const ANSI_HIGHLIGHT: (&str, &str) = ("\x1b[1;33m", "\x1b[0m");

/// Prepend line numbers to each line of text.
///
/// `start_line` is the number to assign to the first line (1-indexed).
pub fn add_line_numbers(text: &str, start_line: usize) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| format!("{}: {}", start_line + i, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract a few lines around the first line mentioning any query term.
///
/// Returns `(snippet_text, start_line_number)` with a 1-indexed start line.
/// Without a matching line the head of the document is returned. Returns
/// `None` for empty text.
pub fn extract_snippet(
    text: &str,
    terms: &QueryTerms,
) -> Option<(String, usize)> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return None;
    }

    let match_idx = lines.iter().position(|line| {
        let line = line.to_lowercase();
        terms.iter().any(|term| line.contains(term))
    });

    let (start, end) = match match_idx {
        Some(idx) => (idx.saturating_sub(2), (idx + 3).min(lines.len())),
        None => (0, DEFAULT_SNIPPET_LINES.min(lines.len())),
    };

    let mut snippet = lines[start..end].join("\n");
    if snippet.len() > DEFAULT_SNIPPET_MAX_CHARS {
        let mut cut = DEFAULT_SNIPPET_MAX_CHARS;
        while !snippet.is_char_boundary(cut) {
            cut -= 1;
        }
        snippet.truncate(cut);
        snippet.push_str("...");
    }

    Some((snippet, start + 1))
}

/// Build a case-insensitive matcher for every query term, longest first so
/// phrases win over the words they contain. `None` when there are no terms.
pub fn term_matcher(terms: &QueryTerms) -> Option<Regex> {
    let mut escaped: Vec<String> = terms.iter().map(regex::escape).collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();

    RegexBuilder::new(&escaped.join("|"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Wrap every occurrence of a query term in `open`/`close` markers.
pub fn highlight_terms(
    text: &str,
    terms: &QueryTerms,
    (open, close): (&str, &str),
) -> String {
    match term_matcher(terms) {
        Some(matcher) => matcher
            .replace_all(text, |caps: &regex::Captures| {
                format!("{open}{}{close}", &caps[0])
            })
            .into_owned(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_line_numbers_custom_start() {
        assert_eq!(add_line_numbers("foo\nbar", 10), "10: foo\n11: bar");
    }

    #[test]
    fn snippet_centers_on_first_term() {
        let text = "l1\nl2\nl3\nl4\nworked with Kubernetes\nl6\nl7\nl8";
        let terms = QueryTerms::extract("kubernetes OR docker");
        let (snippet, start) = extract_snippet(text, &terms).unwrap();
        assert_eq!(start, 3);
        assert_eq!(snippet, "l3\nl4\nworked with Kubernetes\nl6\nl7");
    }

    #[test]
    fn snippet_matches_phrases() {
        let text = "intro\nSenior Network Engineer\noutro";
        let terms = QueryTerms::extract(r#""network engineer""#);
        let (snippet, start) = extract_snippet(text, &terms).unwrap();
        assert_eq!(start, 1);
        assert!(snippet.contains("Senior Network Engineer"));
    }

    #[test]
    fn snippet_without_match_returns_head() {
        let text = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8";
        let terms = QueryTerms::extract("absent");
        let (snippet, start) = extract_snippet(text, &terms).unwrap();
        assert_eq!(start, 1);
        assert_eq!(snippet.lines().count(), DEFAULT_SNIPPET_LINES);
    }

    #[test]
    fn snippet_of_empty_text() {
        assert!(extract_snippet("", &QueryTerms::extract("x")).is_none());
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long_line = "é".repeat(300);
        let terms = QueryTerms::extract("é");
        let (snippet, _) = extract_snippet(&long_line, &terms).unwrap();
        assert!(snippet.ends_with("..."));
        assert!(snippet.len() <= DEFAULT_SNIPPET_MAX_CHARS + 3);
    }

    #[test]
    fn highlight_wraps_terms_case_insensitively() {
        let terms = QueryTerms::extract("python AND NOT django");
        let out = highlight_terms("Python and python", &terms, ("[", "]"));
        assert_eq!(out, "[Python] and [python]");
    }

    #[test]
    fn highlight_prefers_phrases_over_contained_words() {
        let terms = QueryTerms::extract(r#""network engineer" OR network"#);
        let out =
            highlight_terms("a Network Engineer role", &terms, ("<", ">"));
        assert_eq!(out, "a <Network Engineer> role");
    }

    #[test]
    fn highlight_escapes_symbols() {
        let terms = QueryTerms::extract("node.js");
        let out = highlight_terms("nodexjs and node.js", &terms, ("*", "*"));
        assert_eq!(out, "nodexjs and *node.js*");
    }

    #[test]
    fn highlight_without_terms_is_identity() {
        let terms = QueryTerms::extract("AND OR");
        assert_eq!(highlight_terms("text", &terms, ("[", "]")), "text");
    }
}
