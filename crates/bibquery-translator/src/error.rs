//! Error types for translation.

use bibquery::ParseError;
use thiserror::Error;

use crate::database::TargetDatabase;

/// Errors raised while rendering a parsed line for a target database.
///
/// Soft problems (an unmapped field, an unsupported wildcard) are reported
/// as diagnostics instead; these are the failures that leave no usable
/// output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The dialect tables have no profile for the database.
    #[error("no dialect profile configured for {database}")]
    MissingProfile {
        /// The requested database.
        database: TargetDatabase,
    },

    /// The database cannot express this construct at all.
    #[error("{construct} cannot be expressed in {database}")]
    ExportUnsupported {
        /// The requested database.
        database: TargetDatabase,
        /// Description of the construct.
        construct: String,
    },
}

/// Errors from the parse and export stages of translating one line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The line could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The parsed line could not be exported.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// A database name that is not one of the supported targets.
    #[error("unknown target database: {0}")]
    UnknownDatabase(String),
}

/// Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_profile() {
        let err = ExportError::MissingProfile {
            database: TargetDatabase::Scopus,
        };
        assert_eq!(err.to_string(), "no dialect profile configured for Scopus");
    }

    #[test]
    fn test_error_from_parse_error() {
        let err: TranslateError = ParseError::EmptyExpression.into();
        assert!(matches!(err, TranslateError::Parse(_)));
        assert_eq!(err.to_string(), "parse error: empty search line");
    }

    #[test]
    fn test_error_from_export_error() {
        let err: TranslateError = ExportError::ExportUnsupported {
            database: TargetDatabase::WoS,
            construct: "field list".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "export error: field list cannot be expressed in WoS"
        );
    }
}
