//! # bibquery-translator
//!
//! Translates Ovid search strategies into the syntax of other bibliographic
//! databases.
//!
//! This crate bridges the [`bibquery`] parser and a set of per-database
//! [`DialectTables`] to render each line of a strategy for Web of Science,
//! Cochrane, Scopus, ProQuest, PubMed or EBSCO.
//!
//! ## Key Features
//!
//! - **Line-at-a-time** - every line yields exactly one [`TranslationResult`],
//!   in order, even when it cannot be parsed
//! - **Per-line diagnostics** - dropped fields and unsupported wildcards are
//!   reported with the line that caused them
//! - **Data-driven dialects** - field names, wildcards, proximity and field
//!   templates are plain data, replaceable from JSON with the `serde` feature
//! - **Optional parallelism** - enable the `parallel` feature to translate
//!   lines on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use bibquery_translator::{LineTranslator, TargetDatabase};
//!
//! let translator = LineTranslator::new();
//!
//! let result = translator.translate_line(0, "air condi?ioning* adj4 mushrooms", TargetDatabase::Ebsco);
//! assert_eq!(result.output, "\"air condi#ioning*\" N3 mushrooms");
//!
//! let result = translator.translate_line(1, "exp Sleep/", TargetDatabase::PubMed);
//! assert_eq!(result.output, "Sleep[MeSH]");
//! ```
//!
//! ## Target Syntax
//!
//! | Database | Proximity | Optional wildcard | Reference | Fields |
//! |----------|-----------|-------------------|-----------|--------|
//! | WoS | `NEAR/k` | `$` | `#n` | `TS=(x) OR TI=(x)` |
//! | Cochrane | `NEAR/k` | `?` | `#n` | `x:ti,ab` |
//! | Scopus | `W/k` | `*` | `#n` | `TITLE-ABS(x)` |
//! | Proquest | `NEAR/k` | `*` | `n` | `TITLE,ABSTRACT(x)` |
//! | PubMed | `[fld:~k]` | none | `#n` | `x[ti] OR x[ab]` |
//! | EBSCO | `Nk` | `#` | `Sn` | `TI,AB x` |
//!
//! `k` is the Ovid `adjN` distance minus one.
//!
//! ## Feature Flags
//!
//! - `parallel` - Enables parallel batch translation using rayon
//! - `serde` - Serialize/deserialize tables, results and AST types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod database;
mod diagnostics;
mod error;
mod exporter;
mod result;
mod translator;

// Public re-exports
pub use config::{
    DatabaseProfile, DialectTables, FieldCombination, ProximitySyntax, TranslatorConfig,
    TranslatorConfigBuilder, WildcardSymbols,
};
pub use database::TargetDatabase;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ExportError, ExportResult, TranslateError};
pub use exporter::{Export, ExportContext, WILDCARD_PLACEHOLDER};
pub use result::{TranslationReport, TranslationResult};
pub use translator::LineTranslator;

// Re-export commonly used types from dependencies for convenience
pub use bibquery::{ParseError, SearchLine, SourceDialect};
