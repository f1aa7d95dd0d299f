//! # bibquery
//!
//! A Rust library for parsing systematic-review search strategies written in
//! Ovid syntax into a typed expression tree.
//!
//! This crate provides:
//! - **Line parser**: strip numbering and result counts, then classify a line
//!   as a reference range, a reference combination, a subject heading, or a
//!   field-qualified condition
//! - **Condition parser**: a recursive-descent split of a condition into
//!   brackets, binary operators and leaf terms
//! - **Quote-aware scanners**: bracket matching and top-level operator search
//!   that ignore anything inside double quotes
//!
//! Rendering into other databases' syntax lives in `bibquery-translator`.
//!
//! ## Usage
//!
//! ```rust
//! use bibquery::{parse_line, ConditionTree, SearchLine};
//!
//! let line = parse_line("3. (bacon or sausages) adj3 mushrooms.tw. (17)").unwrap();
//! let SearchLine::FieldCondition(condition) = line else {
//!     panic!("expected a field condition");
//! };
//! assert_eq!(condition.fields, vec!["tw"]);
//! assert!(matches!(condition.condition, ConditionTree::Binary { .. }));
//! ```
//!
//! ## Ovid Syntax Quick Reference
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `and`, `or` | Boolean operators | `bacon or eggs` |
//! | `adjN` | Within N word positions | `heart adj3 attack` |
//! | `?` | Optional wildcard (0 or 1 character) | `colo?r` |
//! | `#` | Mandatory wildcard (exactly 1 character) | `wom#n` |
//! | `"..."` | Literal phrase | `"bacon and eggs"` |
//! | `.fld,fld.` | Field restriction | `bacon.ti,ab.` |
//! | `exp X/` | Exploded subject heading | `exp Sleep/` |
//! | `*X/` | Focused subject heading | `*Sleep/` |
//! | `or/N-M` | Combine a range of earlier lines | `or/5-20` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod error;
mod parser;
mod scanner;

use std::fmt;
use std::str::FromStr;

pub use ast::{
    CombinedReference, ConditionTree, FieldQualifiedCondition, LeafPiece, LeafTerm, Operator,
    OperatorKind, QueryReference, ReferenceToken, SearchLine, SubjectHeadingTerm, Wildcard,
};
pub use error::{ParseError, ParseResult};
pub use parser::{
    parse_condition, parse_field_condition, parse_line, parse_line_from, parse_subject_heading,
    strip_decoration, MAX_RANGE_REFERENCES,
};
pub use scanner::{find_matching_bracket, find_top_level_operator, unquoted_bytes, OperatorMatch};

/// The query language a strategy is written in.
///
/// Only Ovid is implemented. New dialects get a variant here and a branch in
/// [`parse_line_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SourceDialect {
    /// Ovid (MEDLINE, Embase, PsycINFO via the Ovid platform).
    #[default]
    Ovid,
}

impl fmt::Display for SourceDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDialect::Ovid => write!(f, "Ovid"),
        }
    }
}

impl FromStr for SourceDialect {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ovid") {
            Ok(SourceDialect::Ovid)
        } else {
            Err(ParseError::UnsupportedDialect {
                dialect: s.trim().to_string(),
            })
        }
    }
}
