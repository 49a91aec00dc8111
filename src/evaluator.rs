//! Stack evaluation of compiled queries against document text.
//!
//! Operands match by case-insensitive substring containment. There is no
//! word-boundary check: `java` matches inside `javascript`.

use crate::{
    error::QueryError,
    query::{self, CompiledQuery, PhraseTable, Token},
};

/// Evaluate a postfix token sequence against one document's text.
///
/// Word tokens are expected to be lowercase, as produced by
/// [`query::tokenize`].
pub fn evaluate(
    postfix: &[Token],
    phrases: &PhraseTable,
    text: &str,
) -> Result<bool, QueryError> {
    let text = text.to_lowercase();
    let mut stack: Vec<bool> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token {
            Token::Word(word) => stack.push(text.contains(word.as_str())),
            Token::Phrase(id) => {
                let phrase =
                    phrases.get(*id).ok_or(QueryError::InvalidExpression)?;
                stack.push(text.contains(phrase));
            }
            Token::Not => {
                let value = stack
                    .pop()
                    .ok_or(QueryError::MissingOperand { operator: "NOT" })?;
                stack.push(!value);
            }
            Token::And | Token::Or => {
                let operator = token.operator_name().unwrap_or_default();
                let (Some(right), Some(left)) = (stack.pop(), stack.pop())
                else {
                    return Err(QueryError::MissingOperands { operator });
                };
                stack.push(if *token == Token::And {
                    left && right
                } else {
                    left || right
                });
            }
            Token::LeftParen | Token::RightParen => {
                return Err(QueryError::MismatchedParentheses);
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(QueryError::InvalidExpression),
    }
}

impl CompiledQuery {
    /// Evaluate this query against `text`, reporting malformed expressions.
    pub fn evaluate(&self, text: &str) -> Result<bool, QueryError> {
        evaluate(&self.postfix, &self.phrases, text)
    }

    /// Whether `text` satisfies this query. Empty text and malformed
    /// expressions never match.
    pub fn matches(&self, text: &str) -> bool {
        !text.is_empty() && self.evaluate(text).unwrap_or(false)
    }
}

/// Compile `query` and test it against `text`.
///
/// Never fails: an empty query, empty text or any compile/evaluation error
/// is simply "no match".
///
/// ```
/// use docsift::evaluator::matches;
///
/// let text = "Alice is a Network Engineer with CCIE";
/// assert!(matches("CISSP OR CCIE", text));
/// assert!(!matches("(CISSP OR CCIE) AND python", text));
/// assert!(!matches("((CCIE)", text));
/// ```
pub fn matches(query: &str, text: &str) -> bool {
    if query.is_empty() || text.is_empty() {
        return false;
    }
    query::compile(query).is_ok_and(|compiled| compiled.matches(text))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const RESUMES: [&str; 4] = [
        "John has CISSP and CCIE certifications and Python experience",
        "Alice is a Network Engineer with CCIE",
        "Bob is a Python Developer with Flask",
        "DevOps Engineer with AWS and Kubernetes",
    ];

    fn matching(query: &str) -> Vec<usize> {
        RESUMES
            .iter()
            .enumerate()
            .filter(|(_, text)| matches(query, text))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn and_requires_both_terms() {
        assert_eq!(matching("CISSP AND CCIE"), vec![0]);
        assert_eq!(matching("python AND developer"), vec![2]);
    }

    #[test]
    fn or_requires_either_term() {
        assert_eq!(matching("CISSP or CCIE"), vec![0, 1]);
    }

    #[test]
    fn not_inverts() {
        assert_eq!(matching("python AND NOT django"), vec![0, 2]);
        assert_eq!(matching("NOT java"), vec![0, 1, 2, 3]);
        assert_eq!(matching("NOT python"), vec![1, 3]);
    }

    #[test]
    fn parentheses_group() {
        assert_eq!(matching("(CISSP OR CCIE) AND python"), vec![0]);
        assert_eq!(matching("aws AND (kubernetes OR docker)"), vec![3]);
    }

    #[test]
    fn or_and_precedence() {
        // cissp OR (flask AND engineer): only John has cissp, nobody has
        // both flask and engineer.
        assert_eq!(matching("cissp OR flask AND engineer"), vec![0]);
        // (cissp OR flask) AND engineer would match nobody either way, so
        // check a case where grouping changes the outcome.
        let text = "ccie only";
        assert!(matches("ccie OR python AND flask", text));
        assert!(!matches("(ccie OR python) AND flask", text));
    }

    #[test]
    fn phrase_requires_adjacency_words_do_not() {
        let text = "senior network engineer role";
        assert!(matches(r#""network engineer""#, text));
        assert!(matches("network AND engineer", text));

        let scattered = "network admin, later an engineer";
        assert!(!matches(r#""network engineer""#, scattered));
        assert!(matches("network AND engineer", scattered));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(matches("KUBERNETES", "devops with kubernetes"));
        assert!(matches(r#""NETWORK Engineer""#, "Network engineer"));
    }

    #[test]
    fn substring_matching_has_no_word_boundaries() {
        assert!(matches("java", "Senior JavaScript developer"));
        assert!(!matches("NOT java", "Senior JavaScript developer"));
    }

    #[test]
    fn malformed_queries_match_nothing() {
        let text = "a b c";
        assert!(!matches("AND", text));
        assert!(!matches("((a)", text));
        assert!(!matches(")a(", text));
        assert!(!matches("a b", text));
        assert!(!matches("NOT", text));
        assert!(!matches("NOT NOT a", text));
    }

    #[test]
    fn empty_inputs_match_nothing() {
        assert!(!matches("", "anything"));
        assert!(!matches("anything", ""));
        assert!(!matches("   ", "anything"));
        assert!(!matches("NOT java", ""));
    }

    #[test]
    fn evaluate_reports_operand_errors() {
        let phrases = PhraseTable::default();
        assert_eq!(
            evaluate(&[Token::Not], &phrases, "x"),
            Err(QueryError::MissingOperand { operator: "NOT" })
        );
        assert_eq!(
            evaluate(&[Token::Word("x".into()), Token::Or], &phrases, "x"),
            Err(QueryError::MissingOperands { operator: "OR" })
        );
        assert_eq!(
            evaluate(&[Token::And], &phrases, "x"),
            Err(QueryError::MissingOperands { operator: "AND" })
        );
    }

    #[test]
    fn evaluate_reports_invalid_shape() {
        let phrases = PhraseTable::default();
        assert_eq!(
            evaluate(&[], &phrases, "x"),
            Err(QueryError::InvalidExpression)
        );
        assert_eq!(
            evaluate(
                &[Token::Word("x".into()), Token::Word("y".into())],
                &phrases,
                "x y"
            ),
            Err(QueryError::InvalidExpression)
        );
        assert_eq!(
            evaluate(&[Token::Phrase(0)], &phrases, "x"),
            Err(QueryError::InvalidExpression)
        );
    }

    #[test]
    fn compiled_query_is_reusable_across_documents() {
        let compiled = query::compile("engineer AND NOT devops").unwrap();
        let hits: Vec<bool> =
            RESUMES.iter().map(|text| compiled.matches(text)).collect();
        assert_eq!(hits, vec![false, true, false, false]);
    }

    fn word() -> impl Strategy<Value = String> {
        "[a-z]{1,6}".prop_filter("operator words", |w| {
            !matches!(w.as_str(), "and" | "or" | "not")
        })
    }

    fn term() -> impl Strategy<Value = String> {
        prop_oneof![
            word(),
            "[a-z]{1,5} [a-z]{1,5}".prop_map(|p| format!("\"{p}\"")),
        ]
    }

    fn well_formed_query() -> impl Strategy<Value = String> {
        term().prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone())
                    .prop_map(|(a, b)| format!("{a} AND {b}")),
                (inner.clone(), inner.clone())
                    .prop_map(|(a, b)| format!("{a} OR {b}")),
                inner.clone().prop_map(|a| format!("NOT ({a})")),
                inner.prop_map(|a| format!("({a})")),
            ]
        })
    }

    proptest! {
        #[test]
        fn well_formed_queries_always_evaluate(
            query in well_formed_query(),
            text in "[a-z ]{0,40}",
        ) {
            let compiled = query::compile(&query).unwrap();
            prop_assert!(compiled.evaluate(&text).is_ok());
        }

        #[test]
        fn and_or_not_follow_boolean_logic(
            a in word(),
            b in word(),
            text in "[a-z ]{1,30}",
        ) {
            let has_a = text.contains(a.as_str());
            let has_b = text.contains(b.as_str());
            prop_assert_eq!(matches(&format!("{a} AND {b}"), &text), has_a && has_b);
            prop_assert_eq!(matches(&format!("{a} OR {b}"), &text), has_a || has_b);
            prop_assert_eq!(matches(&format!("NOT {a}"), &text), !has_a);
        }
    }
}
