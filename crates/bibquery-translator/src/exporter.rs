//! Rendering parsed lines into a target database's syntax.
//!
//! Export walks the tree bottom-up. Each node renders itself against an
//! [`ExportContext`] and reports soft problems into the caller's
//! [`Diagnostics`]; only problems that leave no usable text are returned as
//! errors.

use bibquery::{
    CombinedReference, ConditionTree, FieldQualifiedCondition, LeafPiece, LeafTerm, Operator,
    SearchLine, SubjectHeadingTerm, Wildcard,
};

use crate::config::{DatabaseProfile, DialectTables};
use crate::database::TargetDatabase;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{ExportError, ExportResult};

/// Placeholder emitted for a term whose wildcards cannot be rendered.
pub const WILDCARD_PLACEHOLDER: &str = "<WILDCARD ERROR>";

/// Truncation symbols that survive export unchanged.
const TRUNCATION_SYMBOLS: [char; 2] = ['*', '$'];

/// Tables and the resolved profile for one target database.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    /// The full dialect tables.
    pub tables: &'a DialectTables,
    /// The target database.
    pub database: TargetDatabase,
    /// The target database's profile.
    pub profile: &'a DatabaseProfile,
}

impl<'a> ExportContext<'a> {
    /// Resolves the profile for `database`.
    pub fn new(tables: &'a DialectTables, database: TargetDatabase) -> ExportResult<Self> {
        Ok(Self {
            tables,
            database,
            profile: tables.profile(database)?,
        })
    }
}

/// Something that can be rendered in a target database's syntax.
pub trait Export {
    /// Renders `self`, recording soft problems in `diagnostics`.
    fn export(&self, ctx: &ExportContext<'_>, diagnostics: &mut Diagnostics)
        -> ExportResult<String>;
}

// =============================================================================
// Leaves and operators
// =============================================================================

impl Export for LeafTerm {
    fn export(
        &self,
        ctx: &ExportContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> ExportResult<String> {
        let symbols = match ctx.profile.wildcards {
            Some(symbols) => symbols,
            None if self.has_wildcards() => {
                diagnostics.push(
                    DiagnosticKind::WildcardUnsupported,
                    format!(
                        "Wildcards could not be mapped as unsupported in {} for string {}",
                        ctx.database,
                        self.raw()
                    ),
                );
                return Ok(WILDCARD_PLACEHOLDER.to_string());
            }
            None => return Ok(quote_if_spaced(self.raw().to_string(), self.is_quoted())),
        };

        if self.contains(Wildcard::Mandatory) && !symbols.distinguishes_mandatory() {
            diagnostics.push(
                DiagnosticKind::WildcardDowngraded,
                format!(
                    "Mandatory wildcard converted to optional as unsupported in {} for string {}",
                    ctx.database,
                    self.raw()
                ),
            );
        }

        let mut out = String::with_capacity(self.raw().len());
        for piece in self.pieces() {
            match piece {
                LeafPiece::Text(text) => out.push_str(text),
                LeafPiece::Wildcard(Wildcard::Optional) => out.push(symbols.optional),
                LeafPiece::Wildcard(Wildcard::Mandatory) => out.push(symbols.mandatory),
            }
        }
        Ok(quote_if_spaced(out, self.is_quoted()))
    }
}

/// Multi-word literals must be quoted in every target dialect.
fn quote_if_spaced(text: String, quoted: bool) -> String {
    if !quoted && text.chars().any(char::is_whitespace) {
        format!("\"{}\"", text)
    } else {
        text
    }
}

impl Export for Operator {
    fn export(&self, ctx: &ExportContext<'_>, _: &mut Diagnostics) -> ExportResult<String> {
        match self.words_between() {
            // An empty prefix means the database has no proximity search.
            Some(_) if ctx.profile.proximity.prefix.is_empty() => {
                Err(ExportError::ExportUnsupported {
                    database: ctx.database,
                    construct: format!("proximity operator {}", self.keyword()),
                })
            }
            Some(words) => Ok(ctx.profile.proximity.render(words)),
            None => Ok(self.keyword().to_string()),
        }
    }
}

// =============================================================================
// Conditions
// =============================================================================

impl Export for ConditionTree {
    fn export(
        &self,
        ctx: &ExportContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> ExportResult<String> {
        match self {
            ConditionTree::Bracketed(inner) => Ok(format!("({})", inner.export(ctx, diagnostics)?)),
            ConditionTree::Binary {
                left,
                operator,
                right,
            } => Ok(format!(
                "{} {} {}",
                left.export(ctx, diagnostics)?,
                operator.export(ctx, diagnostics)?,
                right.export(ctx, diagnostics)?
            )),
            ConditionTree::Leaf(term) => term.export(ctx, diagnostics),
        }
    }
}

impl Export for FieldQualifiedCondition {
    fn export(
        &self,
        ctx: &ExportContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> ExportResult<String> {
        if !self.has_fields() {
            return self.condition.export(ctx, diagnostics);
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for abbreviation in &self.fields {
            match ctx.tables.field(abbreviation, ctx.database) {
                Some(field) => fields.push(field.to_string()),
                None => diagnostics.push(
                    DiagnosticKind::UnmappedField,
                    format!(
                        "Was not able to find an equivalent for {} for {}",
                        abbreviation, ctx.database
                    ),
                ),
            }
        }

        let mut condition = self.condition.export(ctx, diagnostics)?;
        if fields.is_empty() {
            return Ok(condition);
        }

        if ctx.profile.proximity.per_field {
            let (stripped, widest) = hoist_proximity(&condition, &ctx.profile.proximity.prefix);
            // Known approximation: differing distances collapse to the widest.
            if let Some(distance) = widest {
                condition = stripped;
                let suffix = format!(":{}", ctx.profile.proximity.render(distance));
                for field in &mut fields {
                    field.push_str(&suffix);
                }
                if condition.contains(&TRUNCATION_SYMBOLS[..]) {
                    diagnostics.push(
                        DiagnosticKind::ProximityWildcard,
                        format!(
                            "Ovid proximity search does not support wildcards in the string {}",
                            condition
                        ),
                    );
                }
            }
        }

        Ok(ctx.profile.field_combination.combine(&fields, &condition))
    }
}

/// Removes every `<prefix><digits> ` marker from `text`, returning the
/// remaining text and the largest distance seen.
fn hoist_proximity(text: &str, prefix: &str) -> (String, Option<u32>) {
    let mut out = String::with_capacity(text.len());
    let mut widest: Option<u32> = None;
    let mut rest = text;

    while let Some(found) = rest.find(prefix) {
        let after = &rest[found + prefix.len()..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let marker = (digits > 0 && after[digits..].starts_with(' '))
            .then(|| after[..digits].parse::<u32>().ok())
            .flatten();

        match marker {
            Some(distance) => {
                out.push_str(&rest[..found]);
                widest = Some(widest.map_or(distance, |w| w.max(distance)));
                rest = &after[digits + 1..];
            }
            None => {
                out.push_str(&rest[..found + prefix.len()]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    (out, widest)
}

// =============================================================================
// Subject headings and references
// =============================================================================

impl Export for SubjectHeadingTerm {
    fn export(
        &self,
        ctx: &ExportContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> ExportResult<String> {
        if !ctx.profile.mesh_headings {
            diagnostics.push(
                DiagnosticKind::SubjectHeadingUnsupported,
                format!(
                    "Was not able to map subject heading for database {} for string {}",
                    ctx.database, self
                ),
            );
            return Ok(format!("Unmapped subject heading {}", self));
        }

        if !self.subheadings.is_empty() {
            diagnostics.push(
                DiagnosticKind::SubheadingDropped,
                format!(
                    "Was not able to map subheadings {} for database {} for string {}",
                    self.subheadings.join(","),
                    ctx.database,
                    self
                ),
            );
        }

        let mut tag = if self.focus { "Majr" } else { "MeSH" }.to_string();
        if !self.explode {
            tag.push_str(":noexp");
        }
        Ok(format!("{}[{}]", self.subject, tag))
    }
}

impl Export for CombinedReference {
    fn export(&self, ctx: &ExportContext<'_>, _: &mut Diagnostics) -> ExportResult<String> {
        Ok(self.render_with(|r| ctx.profile.reference(r.0)))
    }
}

impl Export for SearchLine {
    fn export(
        &self,
        ctx: &ExportContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> ExportResult<String> {
        match self {
            SearchLine::ReferenceRange { references, .. } => references.export(ctx, diagnostics),
            SearchLine::ReferenceCombination(references) => references.export(ctx, diagnostics),
            SearchLine::SubjectHeading(heading) => heading.export(ctx, diagnostics),
            SearchLine::FieldCondition(condition) => condition.export(ctx, diagnostics),
        }
    }
}
