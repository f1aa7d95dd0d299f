//! Translation result types.

use crate::database::TargetDatabase;
use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// The translation of one input line.
///
/// Results are 1:1 with input lines and keep their order.
///
/// # Example
///
/// ```rust
/// use bibquery_translator::{LineTranslator, TargetDatabase};
///
/// let translator = LineTranslator::new();
/// let result = translator.translate_line(0, "bacon and eggs.tw,ti.", TargetDatabase::Ebsco);
///
/// assert_eq!(result.output, "TI bacon and eggs");
/// assert_eq!(
///     result.diagnostics_text(),
///     "Was not able to find an equivalent for tw for EBSCO"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslationResult {
    /// Zero-based index of the input line.
    pub line_index: usize,
    /// The input line without its line terminator.
    pub source: String,
    /// Translated text, or a `Could not ...` placeholder.
    pub output: String,
    /// Diagnostics raised for this line, failures first.
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslationResult {
    /// Diagnostic messages joined by `; `, or an empty string.
    pub fn diagnostics_text(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// True if the line could not be parsed or exported.
    pub fn is_failure(&self) -> bool {
        self.diagnostics.iter().any(|d| {
            matches!(
                d.kind,
                DiagnosticKind::ParseFailure | DiagnosticKind::ExportFailure
            )
        })
    }

    /// True if any diagnostic was raised.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// The translations of a whole strategy for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslationReport {
    /// The target database.
    pub database: TargetDatabase,
    /// Per-line results in input order.
    pub results: Vec<TranslationResult>,
}

impl TranslationReport {
    /// Creates a report.
    pub fn new(database: TargetDatabase, results: Vec<TranslationResult>) -> Self {
        Self { database, results }
    }

    /// Number of translated lines.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over the results in input order.
    pub fn iter(&self) -> impl Iterator<Item = &TranslationResult> {
        self.results.iter()
    }

    /// Lines that could not be parsed or exported.
    pub fn failures(&self) -> impl Iterator<Item = &TranslationResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Total number of diagnostics across all lines.
    pub fn diagnostic_count(&self) -> usize {
        self.results.iter().map(|r| r.diagnostics.len()).sum()
    }

    /// One translated line per input line, newline terminated.
    pub fn render_output(&self) -> String {
        render_lines(self.results.iter().map(|r| r.output.clone()))
    }

    /// One diagnostics line per input line (empty where there were none),
    /// newline terminated.
    pub fn render_warnings(&self) -> String {
        render_lines(self.results.iter().map(TranslationResult::diagnostics_text))
    }
}

impl IntoIterator for TranslationReport {
    type Item = TranslationResult;
    type IntoIter = std::vec::IntoIter<TranslationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a TranslationReport {
    type Item = &'a TranslationResult;
    type IntoIter = std::slice::Iter<'a, TranslationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

fn render_lines(lines: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
