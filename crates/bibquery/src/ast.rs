//! Abstract Syntax Tree types for search-strategy lines.
//!
//! Every type here is built fresh for one input line and is immutable once
//! the parser returns it. Rendering into a target database's syntax lives in
//! the translator crate; the `Display` impls here render normalised Ovid text.

use std::fmt;

// =============================================================================
// Operators
// =============================================================================

/// Boolean or proximity operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatorKind {
    /// Conjunction: `and`
    And,
    /// Disjunction: `or`
    Or,
    /// Proximity: `adjN`, with N counted in Ovid word positions (always >= 1).
    Adj(u32),
}

/// An operator as it appeared in the source line.
///
/// The keyword spelling is kept so AND/OR can be passed through exactly as
/// the searcher wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operator {
    kind: OperatorKind,
    keyword: String,
}

impl Operator {
    /// Creates an operator from its kind and source spelling.
    pub fn new(kind: OperatorKind, keyword: impl Into<String>) -> Self {
        Self {
            kind,
            keyword: keyword.into(),
        }
    }

    /// Lowercase `and`.
    pub fn and() -> Self {
        Self::new(OperatorKind::And, "and")
    }

    /// Lowercase `or`.
    pub fn or() -> Self {
        Self::new(OperatorKind::Or, "or")
    }

    /// `adjN` with the given Ovid distance.
    pub fn adj(distance: u32) -> Self {
        Self::new(OperatorKind::Adj(distance), format!("adj{}", distance))
    }

    /// The operator kind.
    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    /// The keyword exactly as written.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Number of words allowed *between* the operands, the convention every
    /// target database uses. `None` for AND/OR.
    pub fn words_between(&self) -> Option<u32> {
        match self.kind {
            OperatorKind::Adj(distance) => Some(distance.saturating_sub(1)),
            OperatorKind::And | OperatorKind::Or => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword)
    }
}

// =============================================================================
// Leaf terms
// =============================================================================

/// Single-character wildcard kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Wildcard {
    /// Zero or one character: Ovid `?`
    Optional,
    /// Exactly one character: Ovid `#`
    Mandatory,
}

impl Wildcard {
    /// The Ovid symbol for this wildcard.
    pub fn ovid_symbol(self) -> char {
        match self {
            Wildcard::Optional => '?',
            Wildcard::Mandatory => '#',
        }
    }
}

/// A piece of a leaf term: literal text or a wildcard marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeafPiece {
    /// Literal text, copied to every target unchanged.
    Text(String),
    /// A wildcard marker to be respelled per target.
    Wildcard(Wildcard),
}

/// A quoted or bare literal with its wildcard markers normalised.
///
/// Quoting does not suppress wildcards in Ovid, so `"colo?r"` still carries
/// an optional marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafTerm {
    raw: String,
    quoted: bool,
    pieces: Vec<LeafPiece>,
}

impl LeafTerm {
    /// Builds a leaf from its source text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let quoted = raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"');

        let mut pieces = Vec::new();
        let mut text = String::new();
        for c in raw.chars() {
            let marker = match c {
                '?' => Some(Wildcard::Optional),
                '#' => Some(Wildcard::Mandatory),
                _ => None,
            };
            match marker {
                Some(wildcard) => {
                    if !text.is_empty() {
                        pieces.push(LeafPiece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(LeafPiece::Wildcard(wildcard));
                }
                None => text.push(c),
            }
        }
        if !text.is_empty() {
            pieces.push(LeafPiece::Text(text));
        }

        Self { raw, quoted, pieces }
    }

    /// The term as written in the source line.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True if the source token was wrapped in double quotes.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Text and wildcard pieces, in order.
    pub fn pieces(&self) -> &[LeafPiece] {
        &self.pieces
    }

    /// True if any wildcard marker is present.
    pub fn has_wildcards(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| matches!(p, LeafPiece::Wildcard(_)))
    }

    /// True if the given wildcard kind is present.
    pub fn contains(&self, wildcard: Wildcard) -> bool {
        self.pieces
            .iter()
            .any(|p| *p == LeafPiece::Wildcard(wildcard))
    }
}

impl fmt::Display for LeafTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// =============================================================================
// Condition tree
// =============================================================================

/// A parsed search condition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionTree {
    /// A parenthesised sub-expression.
    Bracketed(Box<ConditionTree>),
    /// Two conditions joined by an operator.
    Binary {
        /// Left operand.
        left: Box<ConditionTree>,
        /// The joining operator.
        operator: Operator,
        /// Right operand.
        right: Box<ConditionTree>,
    },
    /// A single literal term.
    Leaf(LeafTerm),
}

impl ConditionTree {
    /// Iterates over all operators in the tree, left to right.
    pub fn operators(&self) -> Vec<&Operator> {
        let mut out = Vec::new();
        self.collect_operators(&mut out);
        out
    }

    fn collect_operators<'a>(&'a self, out: &mut Vec<&'a Operator>) {
        match self {
            ConditionTree::Bracketed(inner) => inner.collect_operators(out),
            ConditionTree::Binary {
                left,
                operator,
                right,
            } => {
                left.collect_operators(out);
                out.push(operator);
                right.collect_operators(out);
            }
            ConditionTree::Leaf(_) => {}
        }
    }

    /// Iterates over all leaf terms in the tree, left to right.
    pub fn leaves(&self) -> Vec<&LeafTerm> {
        match self {
            ConditionTree::Bracketed(inner) => inner.leaves(),
            ConditionTree::Binary { left, right, .. } => {
                let mut out = left.leaves();
                out.extend(right.leaves());
                out
            }
            ConditionTree::Leaf(term) => vec![term],
        }
    }
}

impl fmt::Display for ConditionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTree::Bracketed(inner) => write!(f, "({})", inner),
            ConditionTree::Binary {
                left,
                operator,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            ConditionTree::Leaf(term) => write!(f, "{}", term),
        }
    }
}

/// A condition restricted to a list of Ovid fields (`.tw,ti.`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldQualifiedCondition {
    /// The search condition.
    pub condition: ConditionTree,
    /// Ovid field abbreviations in source order; empty means no explicit field.
    pub fields: Vec<String>,
}

impl FieldQualifiedCondition {
    /// Creates a field-qualified condition.
    pub fn new(condition: ConditionTree, fields: Vec<String>) -> Self {
        Self { condition, fields }
    }

    /// True if a field suffix was present.
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

impl fmt::Display for FieldQualifiedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            write!(f, "{}", self.condition)
        } else {
            write!(f, "{}.{}.", self.condition, self.fields.join(","))
        }
    }
}

// =============================================================================
// Subject headings
// =============================================================================

/// An Ovid subject-heading line such as `exp *Sleep Wake Disorders/`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectHeadingTerm {
    /// The heading text without prefix or trailing slash.
    pub subject: String,
    /// `exp` prefix: include narrower terms. Absent means do not explode.
    pub explode: bool,
    /// Leading `*`: heading is a major focus.
    pub focus: bool,
    /// Two-letter subheadings after the slash, as in `Sleep/th,px`.
    pub subheadings: Vec<String>,
}

impl fmt::Display for SubjectHeadingTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explode {
            write!(f, "exp ")?;
        }
        if self.focus {
            write!(f, "*")?;
        }
        write!(f, "{}/{}", self.subject, self.subheadings.join(","))
    }
}

// =============================================================================
// Query references
// =============================================================================

/// A 1-based reference to an earlier line of the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryReference(pub u32);

impl fmt::Display for QueryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One token of a reference combination.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceToken {
    /// A prior line number.
    Reference(QueryReference),
    /// A boolean keyword as written.
    Keyword(Operator),
    /// `(`
    Open,
    /// `)`
    Close,
}

/// Prior queries combined with AND/OR, e.g. `1 and 2` or the expansion of
/// `or/5-20`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombinedReference {
    tokens: Vec<ReferenceToken>,
}

impl CombinedReference {
    /// Wraps an already tokenised combination.
    pub fn new(tokens: Vec<ReferenceToken>) -> Self {
        Self { tokens }
    }

    /// Joins references with a single operator.
    pub fn joined(references: impl IntoIterator<Item = QueryReference>, operator: &Operator) -> Self {
        let mut tokens = Vec::new();
        for (i, reference) in references.into_iter().enumerate() {
            if i > 0 {
                tokens.push(ReferenceToken::Keyword(operator.clone()));
            }
            tokens.push(ReferenceToken::Reference(reference));
        }
        Self { tokens }
    }

    /// The tokens in order.
    pub fn tokens(&self) -> &[ReferenceToken] {
        &self.tokens
    }

    /// The referenced line numbers in order.
    pub fn references(&self) -> Vec<QueryReference> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                ReferenceToken::Reference(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Renders the combination, spelling each reference with `render`.
    ///
    /// Tokens are separated by single spaces except just inside brackets.
    pub fn render_with<F>(&self, mut render: F) -> String
    where
        F: FnMut(QueryReference) -> String,
    {
        let mut out = String::new();
        let mut previous: Option<&ReferenceToken> = None;
        for token in &self.tokens {
            let needs_space = match (previous, token) {
                (None, _) => false,
                (Some(ReferenceToken::Open), _) => false,
                (_, ReferenceToken::Close) => false,
                _ => true,
            };
            if needs_space {
                out.push(' ');
            }
            match token {
                ReferenceToken::Reference(r) => out.push_str(&render(*r)),
                ReferenceToken::Keyword(op) => out.push_str(op.keyword()),
                ReferenceToken::Open => out.push('('),
                ReferenceToken::Close => out.push(')'),
            }
            previous = Some(token);
        }
        out
    }
}

impl fmt::Display for CombinedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_with(|r| r.to_string()))
    }
}

// =============================================================================
// Classified line
// =============================================================================

/// A classified, parsed search-strategy line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchLine {
    /// `and/5-20` or `or/5-20` shorthand, already expanded.
    ReferenceRange {
        /// The operator named before the slash.
        operator: Operator,
        /// The expanded combination.
        references: CombinedReference,
    },
    /// Digits and boolean keywords only, e.g. `1 and (2 or 3)`.
    ReferenceCombination(CombinedReference),
    /// A subject-heading line.
    SubjectHeading(SubjectHeadingTerm),
    /// Anything else: a condition with an optional field suffix.
    FieldCondition(FieldQualifiedCondition),
}

impl fmt::Display for SearchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLine::ReferenceRange { references, .. } => write!(f, "{}", references),
            SearchLine::ReferenceCombination(references) => write!(f, "{}", references),
            SearchLine::SubjectHeading(heading) => write!(f, "{}", heading),
            SearchLine::FieldCondition(condition) => write!(f, "{}", condition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod leaf_terms {
        use super::*;

        #[test]
        fn test_leaf_extracts_wildcards() {
            let leaf = LeafTerm::new("condi?ioning#");
            assert_eq!(
                leaf.pieces(),
                &[
                    LeafPiece::Text("condi".to_string()),
                    LeafPiece::Wildcard(Wildcard::Optional),
                    LeafPiece::Text("ioning".to_string()),
                    LeafPiece::Wildcard(Wildcard::Mandatory),
                ]
            );
            assert!(leaf.contains(Wildcard::Mandatory));
            assert!(!leaf.is_quoted());
        }

        #[test]
        fn test_leaf_quoted_keeps_wildcards() {
            let leaf = LeafTerm::new("\"tumo?r growth\"");
            assert!(leaf.is_quoted());
            assert!(leaf.has_wildcards());
        }

        #[test]
        fn test_leaf_single_quote_char_not_quoted() {
            assert!(!LeafTerm::new("\"").is_quoted());
            assert!(!LeafTerm::new("\"open ended").is_quoted());
        }
    }

    mod operators {
        use super::*;

        #[test]
        fn test_words_between() {
            assert_eq!(Operator::adj(16).words_between(), Some(15));
            assert_eq!(Operator::adj(1).words_between(), Some(0));
            assert_eq!(Operator::and().words_between(), None);
        }

        #[test]
        fn test_keyword_kept_as_written() {
            let op = Operator::new(OperatorKind::And, "AND");
            assert_eq!(op.to_string(), "AND");
        }
    }

    mod references {
        use super::*;

        #[test]
        fn test_joined_render() {
            let refs = CombinedReference::joined(
                [QueryReference(1), QueryReference(2), QueryReference(3)],
                &Operator::or(),
            );
            assert_eq!(refs.to_string(), "1 or 2 or 3");
            assert_eq!(refs.render_with(|r| format!("#{}", r)), "#1 or #2 or #3");
        }

        #[test]
        fn test_bracketed_render() {
            let refs = CombinedReference::new(vec![
                ReferenceToken::Open,
                ReferenceToken::Reference(QueryReference(1)),
                ReferenceToken::Keyword(Operator::or()),
                ReferenceToken::Reference(QueryReference(2)),
                ReferenceToken::Close,
                ReferenceToken::Keyword(Operator::and()),
                ReferenceToken::Reference(QueryReference(3)),
            ]);
            assert_eq!(refs.to_string(), "(1 or 2) and 3");
        }
    }

    #[test]
    fn test_condition_display_round_trip() {
        let tree = ConditionTree::Binary {
            left: Box::new(ConditionTree::Bracketed(Box::new(ConditionTree::Binary {
                left: Box::new(ConditionTree::Leaf(LeafTerm::new("bacon"))),
                operator: Operator::or(),
                right: Box::new(ConditionTree::Leaf(LeafTerm::new("sausages"))),
            }))),
            operator: Operator::adj(3),
            right: Box::new(ConditionTree::Leaf(LeafTerm::new("mushrooms"))),
        };
        assert_eq!(tree.to_string(), "(bacon or sausages) adj3 mushrooms");
        assert_eq!(tree.operators().len(), 2);
        assert_eq!(tree.leaves().len(), 3);
    }

    #[test]
    fn test_subject_heading_display() {
        let heading = SubjectHeadingTerm {
            subject: "Sleep".to_string(),
            explode: true,
            focus: true,
            subheadings: Vec::new(),
        };
        assert_eq!(heading.to_string(), "exp *Sleep/");
    }

    #[test]
    fn test_subject_heading_display_with_subheadings() {
        let heading = SubjectHeadingTerm {
            subject: "Sleep".to_string(),
            explode: false,
            focus: false,
            subheadings: vec!["th".to_string(), "px".to_string()],
        };
        assert_eq!(heading.to_string(), "Sleep/th,px");
    }
}
