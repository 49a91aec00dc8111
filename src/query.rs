//! Boolean query compiler.
//!
//! Turns a raw query such as `("spring boot" OR springboot) AND java AND NOT
//! sales` into a postfix token sequence plus the table of quoted phrases it
//! referenced. Compilation never looks at document text.

use std::{fmt, sync::LazyLock};

use regex::{Captures, Regex};

use crate::error::QueryError;

/// Whole-word operator spellings, matched after lowercasing.
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(and|or|not)\b").unwrap());

/// One lexical unit per match, tried left to right:
/// quoted phrase, parentheses, operators, then runs of word characters.
/// Anything the pattern skips over is dropped.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]+)"|\(|\)|AND|OR|NOT|[A-Za-z0-9_+.#-]+"#).unwrap()
});

/// A single token of a compiled query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal word, lowercased.
    Word(String),
    /// Placeholder for entry `n` of the [`PhraseTable`] (`PHRASE_n`).
    Phrase(usize),
    And,
    Or,
    Not,
    LeftParen,
    RightParen,
}

impl Token {
    /// Binding power of an operator token; `None` for operands and
    /// parentheses. `NOT` binds tightest.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Or => Some(1),
            Token::And => Some(2),
            Token::Not => Some(3),
            _ => None,
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Phrase(_))
    }

    /// Operator name as it appears in the query and in error messages.
    pub fn operator_name(&self) -> Option<&'static str> {
        match self {
            Token::And => Some("AND"),
            Token::Or => Some("OR"),
            Token::Not => Some("NOT"),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Phrase(id) => write!(f, "PHRASE_{id}"),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("NOT"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

/// Quoted phrases of one query, indexed by their placeholder id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseTable {
    phrases: Vec<String>,
}

impl PhraseTable {
    /// Record a phrase and return the id of its placeholder.
    pub fn push(&mut self, phrase: String) -> usize {
        self.phrases.push(phrase);
        self.phrases.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&str> {
        self.phrases.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

/// A query ready for evaluation: postfix tokens plus its phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub postfix: Vec<Token>,
    pub phrases: PhraseTable,
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.postfix.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Trim and lowercase the query, then uppercase the standalone words
/// `and`, `or` and `not` so the tokenizer sees them as operators.
///
/// Phrase contents are normalized too; the tokenizer lowercases phrases
/// again when it records them.
pub fn normalize(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    OPERATOR_RE
        .replace_all(&lowered, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Split a normalized query into tokens, replacing every quoted phrase by
/// a placeholder token in order of appearance.
///
/// Characters outside the recognized classes (quotes without a partner,
/// punctuation such as `,` `;` `*`) are skipped rather than rejected.
pub fn tokenize(normalized: &str) -> (Vec<Token>, PhraseTable) {
    let mut tokens = Vec::new();
    let mut phrases = PhraseTable::default();

    for caps in TOKEN_RE.captures_iter(normalized) {
        if let Some(phrase) = caps.get(1) {
            let id = phrases.push(phrase.as_str().to_lowercase());
            tokens.push(Token::Phrase(id));
            continue;
        }

        let token = match &caps[0] {
            "(" => Token::LeftParen,
            ")" => Token::RightParen,
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            word => Token::Word(word.to_lowercase()),
        };
        tokens.push(token);
    }

    (tokens, phrases)
}

/// Shunting-yard conversion from infix tokens to postfix order.
///
/// Operators of equal precedence associate to the left.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, QueryError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Word(_) | Token::Phrase(_) => output.push(token),
            Token::LeftParen => stack.push(token),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Token::LeftParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(QueryError::MismatchedParentheses),
                }
            },
            Token::And | Token::Or | Token::Not => {
                let incoming = token.precedence().unwrap_or_default();
                while stack
                    .last()
                    .and_then(Token::precedence)
                    .is_some_and(|top| top >= incoming)
                {
                    if let Some(op) = stack.pop() {
                        output.push(op);
                    }
                }
                stack.push(token);
            }
        }
    }

    while let Some(op) = stack.pop() {
        if op == Token::LeftParen {
            return Err(QueryError::MismatchedParentheses);
        }
        output.push(op);
    }

    Ok(output)
}

/// Compile a raw query into postfix form.
///
/// ```
/// use docsift::query::compile;
///
/// let compiled = compile("a OR b AND c").unwrap();
/// assert_eq!(compiled.to_string(), "a b c AND OR");
/// ```
pub fn compile(query: &str) -> Result<CompiledQuery, QueryError> {
    let normalized = normalize(query);
    let (tokens, phrases) = tokenize(&normalized);
    let postfix = to_postfix(tokens)?;
    Ok(CompiledQuery { postfix, phrases })
}
