//! Error types for search-strategy parsing.

use thiserror::Error;

/// Errors that can occur while parsing one search-strategy line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing left to parse after stripping numbering and result counts.
    #[error("empty search line")]
    EmptyExpression,

    /// An opening bracket has no matching close.
    #[error("unmatched '(' at position {position}")]
    BracketMismatch {
        /// Byte offset of the unmatched opening bracket.
        position: usize,
    },

    /// A closing bracket with no opening partner.
    #[error("unmatched ')' at position {position}")]
    UnexpectedClose {
        /// Byte offset of the stray closing bracket.
        position: usize,
    },

    /// A bracketed group is followed by text that does not start with an operator.
    #[error("expected and/or/adjN at position {position}")]
    OperatorNotFound {
        /// Byte offset where the operator was expected.
        position: usize,
    },

    /// An operator is missing its left or right operand.
    #[error("operator '{operator}' is missing an operand")]
    EmptyOperand {
        /// The operator as written.
        operator: String,
    },

    /// `adj` without a distance, which Ovid treats as a null operator.
    #[error("bare 'adj' without a distance at position {position}")]
    BareAdjacency {
        /// Byte offset of the operator.
        position: usize,
    },

    /// `adj0`, which is not a valid proximity.
    #[error("adjacency distance must be at least 1 at position {position}")]
    ZeroDistance {
        /// Byte offset of the operator.
        position: usize,
    },

    /// The digits after `adj` do not fit a distance.
    #[error("invalid adjacency distance: {text}")]
    InvalidDistance {
        /// The operator as written.
        text: String,
    },

    /// A `and/N-M` or `or/N-M` shorthand that could not be expanded.
    #[error("invalid query range '{text}': {message}")]
    InvalidRange {
        /// The range text after the slash.
        text: String,
        /// Description of the problem.
        message: String,
    },

    /// A line that does not fit any known shape.
    #[error("unrecognised search line: {text}")]
    UnknownFieldShape {
        /// The offending text.
        text: String,
    },

    /// The requested source dialect has no parser.
    #[error("no parser for source dialect {dialect}")]
    UnsupportedDialect {
        /// Name of the dialect.
        dialect: String,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_bracket_mismatch() {
        let err = ParseError::BracketMismatch { position: 4 };
        assert_eq!(err.to_string(), "unmatched '(' at position 4");
    }

    #[test]
    fn test_error_display_invalid_range() {
        let err = ParseError::InvalidRange {
            text: "9-3".to_string(),
            message: "range start exceeds end".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid query range '9-3': range start exceeds end"
        );
    }

    #[test]
    fn test_error_display_bare_adjacency() {
        let err = ParseError::BareAdjacency { position: 6 };
        assert_eq!(
            err.to_string(),
            "bare 'adj' without a distance at position 6"
        );
    }
}
