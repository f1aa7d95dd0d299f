//! Per-line translation driver.

use bibquery::{parse_line_from, SearchLine};
use tracing::{debug, trace, warn};

use crate::config::TranslatorConfig;
use crate::database::TargetDatabase;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::TranslateError;
use crate::exporter::{Export, ExportContext};
use crate::result::{TranslationReport, TranslationResult};

/// Translates search-strategy lines into a target database's syntax.
///
/// Every call builds its own [`Diagnostics`]; the only state shared between
/// lines is the read-only [`TranslatorConfig`].
///
/// # Example
///
/// ```rust
/// use bibquery_translator::{LineTranslator, TargetDatabase};
///
/// let translator = LineTranslator::new();
/// let report = translator.translate_all(
///     &["1. bacon and eggs.tw,ti. (482)", "2. or/1-1"],
///     TargetDatabase::WoS,
/// );
///
/// assert_eq!(report.results[0].output, "TS=(bacon and eggs) OR TI=(bacon and eggs)");
/// assert_eq!(report.results[1].output, "#1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineTranslator {
    config: TranslatorConfig,
}

impl LineTranslator {
    /// Creates a translator with the built-in dialect tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a translator with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bibquery_translator::{LineTranslator, TranslatorConfig};
    ///
    /// let config = TranslatorConfig::builder().with_parallel(true).build();
    /// let translator = LineTranslator::with_config(config);
    /// assert!(translator.config().parallel);
    /// ```
    pub fn with_config(config: TranslatorConfig) -> Self {
        #[cfg(not(feature = "parallel"))]
        if config.parallel {
            warn!("parallel translation requested but the `parallel` feature is disabled");
        }
        Self { config }
    }

    /// Returns a reference to the translator configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Parses and exports one line, reporting soft problems in `diagnostics`.
    ///
    /// Hard failures come back as a typed [`TranslateError`] so callers can
    /// tell a parse failure from an export failure.
    pub fn translate(
        &self,
        line: &str,
        database: TargetDatabase,
        diagnostics: &mut Diagnostics,
    ) -> Result<String, TranslateError> {
        let parsed = parse_line_from(line, self.config.source_dialect)?;
        debug!(
            line = diagnostics.line_index(),
            kind = line_kind(&parsed),
            parsed = %parsed,
            "classified line"
        );

        let ctx = ExportContext::new(&self.config.tables, database)?;
        let output = parsed.export(&ctx, diagnostics)?;
        trace!(line = diagnostics.line_index(), %database, output = %output, "exported line");
        Ok(output)
    }

    /// Translates one line into a [`TranslationResult`].
    ///
    /// Never fails: a parse or export failure becomes a `Could not parse:` or
    /// `Could not export:` placeholder with the failure as its first
    /// diagnostic. Blank lines translate to blank lines.
    pub fn translate_line(
        &self,
        line_index: usize,
        line: &str,
        database: TargetDatabase,
    ) -> TranslationResult {
        let source = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        let mut diagnostics = Diagnostics::new(line_index);

        let output = if source.trim().is_empty() {
            String::new()
        } else {
            match self.translate(&source, database, &mut diagnostics) {
                Ok(output) => output,
                Err(err) => {
                    warn!(line = line_index, %database, error = %err, "translation failed");
                    let (kind, stage) = match &err {
                        TranslateError::Parse(_) => (DiagnosticKind::ParseFailure, "parse"),
                        TranslateError::Export(_) | TranslateError::UnknownDatabase(_) => {
                            (DiagnosticKind::ExportFailure, "export")
                        }
                    };
                    diagnostics.push_failure(
                        kind,
                        format!("Error: could not {}: {} ({})", stage, source, err),
                    );
                    format!("Could not {}: {}", stage, source)
                }
            }
        };

        TranslationResult {
            line_index,
            source,
            output,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Translates a batch of lines, preserving order.
    ///
    /// With the `parallel` feature and `config.parallel` set, lines are
    /// translated on the rayon pool.
    pub fn translate_all<S>(&self, lines: &[S], database: TargetDatabase) -> TranslationReport
    where
        S: AsRef<str> + Sync,
    {
        debug!(lines = lines.len(), %database, "translating strategy");

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;

            let results = lines
                .par_iter()
                .enumerate()
                .map(|(i, line)| self.translate_line(i, line.as_ref(), database))
                .collect();
            return TranslationReport::new(database, results);
        }

        let results = lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.translate_line(i, line.as_ref(), database))
            .collect();
        TranslationReport::new(database, results)
    }

    /// Translates every line of a text block.
    pub fn translate_text(&self, text: &str, database: TargetDatabase) -> TranslationReport {
        let lines: Vec<&str> = text.lines().collect();
        self.translate_all(&lines, database)
    }
}

fn line_kind(line: &SearchLine) -> &'static str {
    match line {
        SearchLine::ReferenceRange { .. } => "reference_range",
        SearchLine::ReferenceCombination(_) => "reference_combination",
        SearchLine::SubjectHeading(_) => "subject_heading",
        SearchLine::FieldCondition(_) => "field_condition",
    }
}
