use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("corpus directory does not exist: {0}")]
    CorpusDir(PathBuf),
}

/// Failures raised while compiling or evaluating a boolean query.
///
/// These never reach the user through the search path: the match boundary
/// turns every one of them into "no match".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("mismatched parentheses")]
    MismatchedParentheses,

    #[error("{operator} operator missing operand")]
    MissingOperand { operator: &'static str },

    #[error("{operator} operator missing operands")]
    MissingOperands { operator: &'static str },

    #[error("invalid boolean expression")]
    InvalidExpression,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_messages() {
        assert_eq!(
            QueryError::MismatchedParentheses.to_string(),
            "mismatched parentheses"
        );
        assert_eq!(
            QueryError::MissingOperand { operator: "NOT" }.to_string(),
            "NOT operator missing operand"
        );
        assert_eq!(
            QueryError::MissingOperands { operator: "AND" }.to_string(),
            "AND operator missing operands"
        );
    }

    #[test]
    fn query_error_wraps_into_crate_error() {
        let err: Error = QueryError::InvalidExpression.into();
        assert_eq!(err.to_string(), "invalid query: invalid boolean expression");
    }
}
