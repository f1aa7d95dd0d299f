//! Dialect tables and translator configuration.
//!
//! The tables are data: field names, wildcard symbols, proximity and
//! reference spellings, and a closed set of field-combination templates.
//! They are built once and shared read-only by every line translation.

use std::collections::BTreeMap;
use std::sync::Arc;

use bibquery::SourceDialect;

use crate::database::TargetDatabase;
use crate::error::{ExportError, ExportResult};

// =============================================================================
// Per-database profile
// =============================================================================

/// Single-character wildcard symbols for a database.
///
/// When both symbols are equal the database cannot tell a mandatory
/// character from an optional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WildcardSymbols {
    /// Zero-or-one character wildcard.
    pub optional: char,
    /// Exactly-one character wildcard.
    pub mandatory: char,
}

impl WildcardSymbols {
    /// True if mandatory and optional wildcards are spelled differently.
    pub fn distinguishes_mandatory(&self) -> bool {
        self.optional != self.mandatory
    }
}

/// How a database spells proximity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximitySyntax {
    /// Text before the words-between count, e.g. `NEAR/` or `~`.
    pub prefix: String,
    /// Proximity is a per-field modifier (`[tiab:~2]`) rather than an inline
    /// operator, so field-qualified conditions hoist it onto the fields.
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_field: bool,
}

impl ProximitySyntax {
    /// Inline proximity operator with the given prefix.
    pub fn inline(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            per_field: false,
        }
    }

    /// Proximity that is hoisted onto field tags.
    pub fn per_field(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            per_field: true,
        }
    }

    /// Renders the operator for a words-between count.
    pub fn render(&self, words_between: u32) -> String {
        format!("{}{}", self.prefix, words_between)
    }
}

/// How a field list and an exported condition are combined.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "style", rename_all = "snake_case"))]
pub enum FieldCombination {
    /// `f1<sep>f2(condition)`, e.g. Proquest `TITLE,ABSTRACT(x)`.
    GroupedPrefix {
        /// Separator between field names.
        separator: String,
    },
    /// `f1=(condition) OR f2=(condition)`, as in Web of Science.
    FieldAssignments,
    /// `condition:f1,f2`, as in Cochrane.
    FieldSuffix {
        /// Separator between field names.
        separator: String,
    },
    /// `f1,f2 condition`, as in EBSCO.
    BarePrefix {
        /// Separator between field names.
        separator: String,
    },
    /// `condition[f1] OR condition[f2]`, as in PubMed.
    BracketedTags,
}

impl FieldCombination {
    /// Applies the template.
    pub fn combine(&self, fields: &[String], condition: &str) -> String {
        match self {
            FieldCombination::GroupedPrefix { separator } => {
                format!("{}({})", fields.join(separator), condition)
            }
            FieldCombination::FieldAssignments => fields
                .iter()
                .map(|f| format!("{}=({})", f, condition))
                .collect::<Vec<_>>()
                .join(" OR "),
            FieldCombination::FieldSuffix { separator } => {
                format!("{}:{}", condition, fields.join(separator))
            }
            FieldCombination::BarePrefix { separator } => {
                format!("{} {}", fields.join(separator), condition)
            }
            FieldCombination::BracketedTags => fields
                .iter()
                .map(|f| format!("{}[{}]", condition, f))
                .collect::<Vec<_>>()
                .join(" OR "),
        }
    }
}

/// Everything the exporter needs to know about one database.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatabaseProfile {
    /// Wildcard symbols (None = single-character wildcards unsupported).
    pub wildcards: Option<WildcardSymbols>,
    /// Proximity spelling.
    pub proximity: ProximitySyntax,
    /// Text placed before a prior line number, e.g. `#` or `S`.
    pub reference_prefix: String,
    /// Field-combination template.
    pub field_combination: FieldCombination,
    /// Whether Ovid subject headings map onto MeSH tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mesh_headings: bool,
}

impl DatabaseProfile {
    /// Renders a reference to a prior line.
    pub fn reference(&self, number: u32) -> String {
        format!("{}{}", self.reference_prefix, number)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Ovid field abbreviations and per-database profiles.
///
/// `DialectTables::default()` holds the built-in mappings.
///
/// # Example
///
/// ```rust
/// use bibquery_translator::{DialectTables, TargetDatabase};
///
/// let tables = DialectTables::default();
/// assert_eq!(tables.field("tw", TargetDatabase::WoS), Some("TS"));
/// assert_eq!(tables.field("tw", TargetDatabase::Ebsco), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialectTables {
    fields: BTreeMap<String, BTreeMap<TargetDatabase, String>>,
    profiles: BTreeMap<TargetDatabase, DatabaseProfile>,
}

impl DialectTables {
    /// Creates tables with no fields and no profiles.
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
            profiles: BTreeMap::new(),
        }
    }

    /// Adds or replaces the mapping of one Ovid abbreviation.
    pub fn with_field<I, S>(mut self, abbreviation: impl Into<String>, mappings: I) -> Self
    where
        I: IntoIterator<Item = (TargetDatabase, S)>,
        S: Into<String>,
    {
        self.fields.insert(
            abbreviation.into(),
            mappings.into_iter().map(|(db, f)| (db, f.into())).collect(),
        );
        self
    }

    /// Adds or replaces the profile of one database.
    pub fn with_profile(mut self, database: TargetDatabase, profile: DatabaseProfile) -> Self {
        self.profiles.insert(database, profile);
        self
    }

    /// The target field for an Ovid abbreviation, if the database has one.
    pub fn field(&self, abbreviation: &str, database: TargetDatabase) -> Option<&str> {
        self.fields
            .get(abbreviation)
            .and_then(|m| m.get(&database))
            .map(String::as_str)
    }

    /// The profile for a database.
    pub fn profile(&self, database: TargetDatabase) -> ExportResult<&DatabaseProfile> {
        self.profiles
            .get(&database)
            .ok_or(ExportError::MissingProfile { database })
    }

    /// Ovid abbreviations with at least one mapping.
    pub fn abbreviations(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl Default for DialectTables {
    fn default() -> Self {
        use TargetDatabase::*;

        let title = [
            (WoS, "TI"),
            (Cochrane, "ti"),
            (Scopus, "TITLE"),
            (Proquest, "TITLE"),
            (PubMed, "ti"),
            (Ebsco, "TI"),
        ];
        let keyword = [
            (WoS, "KP"),
            (Scopus, "KEY"),
            (Cochrane, "kw"),
            (Proquest, "IF"),
            (PubMed, "ot"),
            (Ebsco, "SU"),
        ];

        let symbols = |optional, mandatory| Some(WildcardSymbols { optional, mandatory });

        DialectTables::empty()
            .with_field(
                "tw",
                [
                    (WoS, "TS"),
                    (Cochrane, "ti,ab"),
                    (Scopus, "TITLE-ABS"),
                    (Proquest, "ABSTRACT,TITLE"),
                    (PubMed, "tiab"),
                ],
            )
            .with_field("ti", title)
            .with_field("m.titl", title)
            .with_field(
                "ab",
                [
                    (Scopus, "ABS"),
                    (Cochrane, "ab"),
                    (Proquest, "ABSTRACT"),
                    (PubMed, "ab"),
                    (Ebsco, "AB"),
                ],
            )
            .with_field("kf", keyword)
            .with_field("kw", keyword)
            .with_profile(
                Proquest,
                DatabaseProfile {
                    wildcards: symbols('*', '?'),
                    proximity: ProximitySyntax::inline("NEAR/"),
                    reference_prefix: String::new(),
                    field_combination: FieldCombination::GroupedPrefix {
                        separator: ",".to_string(),
                    },
                    mesh_headings: false,
                },
            )
            .with_profile(
                Scopus,
                DatabaseProfile {
                    wildcards: symbols('*', '?'),
                    proximity: ProximitySyntax::inline("W/"),
                    reference_prefix: "#".to_string(),
                    field_combination: FieldCombination::GroupedPrefix {
                        separator: "-".to_string(),
                    },
                    mesh_headings: false,
                },
            )
            .with_profile(
                WoS,
                DatabaseProfile {
                    wildcards: symbols('$', '?'),
                    proximity: ProximitySyntax::inline("NEAR/"),
                    reference_prefix: "#".to_string(),
                    field_combination: FieldCombination::FieldAssignments,
                    mesh_headings: false,
                },
            )
            .with_profile(
                Cochrane,
                DatabaseProfile {
                    wildcards: symbols('?', '?'),
                    proximity: ProximitySyntax::inline("NEAR/"),
                    reference_prefix: "#".to_string(),
                    field_combination: FieldCombination::FieldSuffix {
                        separator: ",".to_string(),
                    },
                    mesh_headings: false,
                },
            )
            .with_profile(
                Ebsco,
                DatabaseProfile {
                    wildcards: symbols('#', '?'),
                    proximity: ProximitySyntax::inline("N"),
                    reference_prefix: "S".to_string(),
                    field_combination: FieldCombination::BarePrefix {
                        separator: ",".to_string(),
                    },
                    mesh_headings: false,
                },
            )
            .with_profile(
                PubMed,
                DatabaseProfile {
                    wildcards: None,
                    proximity: ProximitySyntax::per_field("~"),
                    reference_prefix: "#".to_string(),
                    field_combination: FieldCombination::BracketedTags,
                    mesh_headings: true,
                },
            )
    }
}

// =============================================================================
// Translator configuration
// =============================================================================

/// Configuration for the line translator.
///
/// # Example
///
/// ```rust
/// use bibquery_translator::{DialectTables, TranslatorConfig};
///
/// let config = TranslatorConfig::builder()
///     .with_tables(DialectTables::default())
///     .with_parallel(true)
///     .build();
/// assert!(config.parallel);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranslatorConfig {
    /// Dialect tables, shared read-only across lines.
    pub tables: Arc<DialectTables>,
    /// Source query language of the input lines.
    pub source_dialect: SourceDialect,
    /// Translate lines on the rayon pool (requires the `parallel` feature).
    pub parallel: bool,
}

impl TranslatorConfig {
    /// Creates a new builder for TranslatorConfig.
    pub fn builder() -> TranslatorConfigBuilder {
        TranslatorConfigBuilder::default()
    }
}

/// Builder for TranslatorConfig.
#[derive(Debug, Clone, Default)]
pub struct TranslatorConfigBuilder {
    tables: Option<Arc<DialectTables>>,
    source_dialect: SourceDialect,
    parallel: bool,
}

impl TranslatorConfigBuilder {
    /// Replaces the built-in dialect tables.
    pub fn with_tables(mut self, tables: DialectTables) -> Self {
        self.tables = Some(Arc::new(tables));
        self
    }

    /// Sets the source dialect.
    pub fn with_source_dialect(mut self, dialect: SourceDialect) -> Self {
        self.source_dialect = dialect;
        self
    }

    /// Enables or disables parallel translation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the TranslatorConfig.
    pub fn build(self) -> TranslatorConfig {
        TranslatorConfig {
            tables: self.tables.unwrap_or_default(),
            source_dialect: self.source_dialect,
            parallel: self.parallel,
        }
    }
}
