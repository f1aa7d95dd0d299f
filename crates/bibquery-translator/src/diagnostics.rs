//! Per-line diagnostics.
//!
//! A [`Diagnostics`] accumulator is created by the translation call for one
//! line, threaded by `&mut` through every export step, and returned with
//! that line's result. Nothing is shared between lines or between runs.

use std::fmt;

/// What kind of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagnosticKind {
    /// The line could not be parsed; output is a placeholder.
    ParseFailure,
    /// The line parsed but could not be exported; output is a placeholder.
    ExportFailure,
    /// A field abbreviation has no equivalent and was dropped.
    UnmappedField,
    /// The database has no single-character wildcards.
    WildcardUnsupported,
    /// A mandatory wildcard was rendered as the optional one.
    WildcardDowngraded,
    /// Subject headings cannot be mapped for the database.
    SubjectHeadingUnsupported,
    /// Subheadings were dropped from a mapped subject heading.
    SubheadingDropped,
    /// Per-field proximity does not combine with truncation.
    ProximityWildcard,
}

/// One message attached to a translated line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Zero-based index of the input line.
    pub line_index: usize,
    /// Problem category.
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Diagnostics collected while translating one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    line_index: usize,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty accumulator for the given line.
    pub fn new(line_index: usize) -> Self {
        Self {
            line_index,
            entries: Vec::new(),
        }
    }

    /// The line these diagnostics belong to.
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Records a soft problem.
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            line_index: self.line_index,
            kind,
            message: message.into(),
        });
    }

    /// Records a stage failure ahead of any soft problems already collected.
    pub fn push_failure(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.entries.insert(
            0,
            Diagnostic {
                line_index: self.line_index,
                kind,
                message: message.into(),
            },
        );
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// The diagnostics in the order they were raised.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Consumes the accumulator.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
