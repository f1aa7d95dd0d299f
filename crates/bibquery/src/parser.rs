//! Ovid search-strategy parser.
//!
//! A line is cleaned of its numbering and trailing result count, then
//! classified in a fixed order: reference range shorthand, reference
//! combination, subject heading, and finally a field-qualified condition.
//! The order matters because a bare number would otherwise parse as a
//! condition. Conditions are split into a [`ConditionTree`] with the
//! quote-aware scans in [`crate::scanner`].

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1, take_while_m_n},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, eof, map, opt, recognize, value, verify},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::ast::{
    CombinedReference, ConditionTree, FieldQualifiedCondition, LeafTerm, Operator, OperatorKind,
    QueryReference, ReferenceToken, SearchLine, SubjectHeadingTerm,
};
use crate::error::{ParseError, ParseResult};
use crate::scanner::{
    find_matching_bracket, find_top_level_operator, unquoted_bytes, OperatorMatch,
};
use crate::SourceDialect;

/// Parse one search-strategy line written in Ovid syntax.
///
/// Leading numbering (`3.`) and a trailing result count (`(482)`) are
/// stripped before the line is classified.
///
/// # Examples
///
/// ```rust
/// use bibquery::{parse_line, SearchLine};
///
/// let line = parse_line("1. bacon and eggs.tw,ti. (482)").unwrap();
/// match line {
///     SearchLine::FieldCondition(condition) => {
///         assert_eq!(condition.fields, vec!["tw", "ti"]);
///     }
///     _ => panic!("expected a field condition"),
/// }
///
/// let line = parse_line("or/5-20").unwrap();
/// assert!(matches!(line, SearchLine::ReferenceRange { .. }));
/// ```
pub fn parse_line(input: &str) -> ParseResult<SearchLine> {
    parse_line_from(input, SourceDialect::Ovid)
}

/// Parse one line written in the given source dialect.
///
/// Only Ovid has a grammar today; the parameter is where another source
/// dialect would be dispatched.
pub fn parse_line_from(input: &str, dialect: SourceDialect) -> ParseResult<SearchLine> {
    match dialect {
        SourceDialect::Ovid => parse_ovid_line(input),
    }
}

fn parse_ovid_line(input: &str) -> ParseResult<SearchLine> {
    let cleaned = strip_decoration(input);
    if cleaned.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    if let Some(line) = reference_range(cleaned)? {
        return Ok(line);
    }
    if let Some(references) = reference_combination(cleaned)? {
        return Ok(SearchLine::ReferenceCombination(references));
    }
    if let Some(heading) = subject_heading(cleaned) {
        return Ok(SearchLine::SubjectHeading(heading));
    }
    parse_field_condition(cleaned).map(SearchLine::FieldCondition)
}

// ============================================================================
// Line decoration
// ============================================================================

/// Strips line numbering (`12.` or `12` followed by two spaces) and a
/// trailing result count such as `(1432)`.
///
/// ```rust
/// use bibquery::strip_decoration;
///
/// assert_eq!(strip_decoration("3.  exp Sleep/ (482)\n"), "exp Sleep/");
/// assert_eq!(strip_decoration("1 and 2"), "1 and 2");
/// ```
pub fn strip_decoration(input: &str) -> &str {
    let mut text = input.trim();
    if let Ok((rest, _)) = line_number(text) {
        text = rest.trim();
    }
    if let Some(stripped) = strip_result_count(text) {
        text = stripped.trim_end();
    }
    text
}

fn line_number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        digit1,
        alt((
            terminated(tag("."), alt((multispace1, eof))),
            tag("  "),
            tag("\t"),
        )),
    ))(input)
}

fn strip_result_count(text: &str) -> Option<&str> {
    let body = text.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let count = &body[open + 1..];
    if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) {
        Some(&text[..open])
    } else {
        None
    }
}

// ============================================================================
// Query references
// ============================================================================

fn boolean_keyword(input: &str) -> IResult<&str, Operator> {
    alt((
        map(tag_no_case("and"), |k: &str| Operator::new(OperatorKind::And, k)),
        map(tag_no_case("or"), |k: &str| Operator::new(OperatorKind::Or, k)),
    ))(input)
}

fn range_item(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    pair(
        preceded(multispace0, digit1),
        opt(preceded(
            delimited(multispace0, char('-'), multispace0),
            digit1,
        )),
    )(input)
}

/// Most line numbers a single range line may expand to.
pub const MAX_RANGE_REFERENCES: usize = 10_000;

/// `and/5-20`, `or/1,3,7-9`: every listed number, ranges inclusive.
fn reference_range(text: &str) -> ParseResult<Option<SearchLine>> {
    let Ok((rest, operator)) = terminated(boolean_keyword, char('/'))(text) else {
        return Ok(None);
    };

    let invalid = |message: &str| ParseError::InvalidRange {
        text: rest.to_string(),
        message: message.to_string(),
    };

    let (_, items) = all_consuming(terminated(
        separated_list1(preceded(multispace0, char(',')), range_item),
        multispace0,
    ))(rest)
    .map_err(|_: nom::Err<nom::error::Error<&str>>| {
        invalid("expected N-M or a comma separated list")
    })?;

    let mut references = Vec::new();
    for (start, end) in items {
        let start: u32 = start.parse().map_err(|_| invalid("line number too large"))?;
        let end: u32 = match end {
            Some(end) => end.parse().map_err(|_| invalid("line number too large"))?,
            None => start,
        };
        if start == 0 {
            return Err(invalid("line numbers start at 1"));
        }
        if start > end {
            return Err(invalid("range start exceeds end"));
        }
        let count = u64::from(end - start) + 1;
        if references.len() as u64 + count > MAX_RANGE_REFERENCES as u64 {
            return Err(invalid("range too large"));
        }
        references.extend((start..=end).map(QueryReference));
    }

    Ok(Some(SearchLine::ReferenceRange {
        references: CombinedReference::joined(references, &operator),
        operator,
    }))
}

/// Reference-line token before its number is checked for size.
#[derive(Clone)]
enum RawToken<'a> {
    Number(&'a str),
    Token(ReferenceToken),
}

fn reference_token(input: &str) -> IResult<&str, RawToken<'_>> {
    preceded(
        multispace0,
        alt((
            map(digit1, RawToken::Number),
            map(boolean_keyword, |k| RawToken::Token(ReferenceToken::Keyword(k))),
            value(RawToken::Token(ReferenceToken::Open), char('(')),
            value(RawToken::Token(ReferenceToken::Close), char(')')),
        )),
    )(input)
}

/// A line made only of line numbers, `and`/`or` and brackets.
///
/// A well-formed line whose numbers do not fit a line reference is an
/// error rather than condition text.
fn reference_combination(text: &str) -> ParseResult<Option<CombinedReference>> {
    let Ok((_, raw)) = all_consuming(terminated(many1(reference_token), multispace0))(text) else {
        return Ok(None);
    };

    // Brackets and keywords must alternate with references; anything
    // malformed falls through to the condition parser, which reports it.
    let mut depth = 0usize;
    let mut expect_reference = true;
    for token in &raw {
        let well_formed = match token {
            RawToken::Number(digits) => {
                let ok = digits.bytes().any(|b| b != b'0') && expect_reference;
                expect_reference = false;
                ok
            }
            RawToken::Token(ReferenceToken::Keyword(_)) => {
                let ok = !expect_reference;
                expect_reference = true;
                ok
            }
            RawToken::Token(ReferenceToken::Open) => {
                depth += 1;
                expect_reference
            }
            RawToken::Token(ReferenceToken::Close) => {
                let ok = depth > 0 && !expect_reference;
                depth = depth.saturating_sub(1);
                ok
            }
            RawToken::Token(ReferenceToken::Reference(_)) => false,
        };
        if !well_formed {
            return Ok(None);
        }
    }
    if depth > 0 || expect_reference {
        return Ok(None);
    }

    let tokens = raw
        .into_iter()
        .map(|token| match token {
            RawToken::Number(digits) => digits
                .parse()
                .map(|n| ReferenceToken::Reference(QueryReference(n)))
                .map_err(|_| ParseError::InvalidRange {
                    text: digits.to_string(),
                    message: "line number too large".to_string(),
                }),
            RawToken::Token(token) => Ok(token),
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Some(CombinedReference::new(tokens)))
}

// ============================================================================
// Subject headings
// ============================================================================

fn heading_text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        c.is_alphanumeric() || matches!(c, '_' | ',' | ' ' | '-' | '\'' | '*')
    })(input)
}

fn subheading(input: &str) -> IResult<&str, &str> {
    take_while_m_n(2, 2, |c: char| c.is_ascii_lowercase())(input)
}

fn subject_heading_parts(input: &str) -> IResult<&str, (bool, bool, &str, Vec<&str>)> {
    all_consuming(tuple((
        map(opt(terminated(tag_no_case("exp"), multispace1)), |e| e.is_some()),
        map(opt(char('*')), |s| s.is_some()),
        terminated(heading_text, char('/')),
        terminated(
            map(
                opt(separated_list1(
                    delimited(multispace0, char(','), multispace0),
                    subheading,
                )),
                Option::unwrap_or_default,
            ),
            multispace0,
        ),
    )))(input)
}

/// `exp *Heading Text/` with optional subheadings such as `/th,px`.
/// Returns `None` if the line is not a heading.
fn subject_heading(text: &str) -> Option<SubjectHeadingTerm> {
    let (_, (explode, focus, subject, subheadings)) = subject_heading_parts(text).ok()?;
    let subject = subject.trim();
    if subject.is_empty() {
        return None;
    }
    Some(SubjectHeadingTerm {
        subject: subject.to_string(),
        explode,
        focus,
        subheadings: subheadings.into_iter().map(str::to_string).collect(),
    })
}

/// Parse a subject-heading line such as `exp *Sleep/`.
pub fn parse_subject_heading(input: &str) -> ParseResult<SubjectHeadingTerm> {
    let text = input.trim();
    subject_heading(text).ok_or_else(|| ParseError::UnknownFieldShape {
        text: text.to_string(),
    })
}

// ============================================================================
// Field-qualified conditions
// ============================================================================

/// Ovid field codes that contain a dot and may make up a whole suffix.
const DOTTED_FIELD_CODES: &[&str] = &["m.titl"];

fn field_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')(input)
}

fn dotted_code(input: &str) -> IResult<&str, &str> {
    recognize(pair(field_word, opt(pair(char('.'), field_word))))(input)
}

fn field_list(input: &str) -> IResult<&str, Vec<&str>> {
    map(
        pair(field_word, many0(preceded(char(','), dotted_code))),
        |(first, rest)| std::iter::once(first).chain(rest).collect(),
    )(input)
}

fn field_suffix(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(
        char('.'),
        alt((
            map(
                verify(dotted_code, |code: &str| DOTTED_FIELD_CODES.contains(&code)),
                |code| vec![code],
            ),
            field_list,
        )),
        pair(opt(char('.')), multispace0),
    ))(input)
}

fn is_suffix_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'.' | b',')
}

/// Splits `condition.fld,fld.` into the condition text and field codes.
///
/// Candidates are tried from the right. A code after the first may carry a
/// dot (`ti,m.titl`), but only a known dotted code may stand alone, so
/// `e.coli.ti.` keeps `e.coli` as its condition.
fn split_field_suffix(text: &str) -> (&str, Vec<String>) {
    let dots: Vec<usize> = unquoted_bytes(text)
        .filter(|&(i, b)| b == b'.' && i > 0)
        .map(|(i, _)| i)
        .collect();

    let mut best = None;
    for &i in dots.iter().rev() {
        let tail = &text[i..];
        if !tail.trim_end().bytes().all(is_suffix_byte) {
            break;
        }
        if text[..i].trim().is_empty() {
            continue;
        }
        if let Ok((_, fields)) = field_suffix(tail) {
            best = Some((i, fields));
        }
    }

    match best {
        Some((i, fields)) => (&text[..i], fields.into_iter().map(str::to_string).collect()),
        None => (text, Vec::new()),
    }
}

/// Parse a condition with an optional trailing Ovid field list.
///
/// ```rust
/// use bibquery::parse_field_condition;
///
/// let parsed = parse_field_condition("(bacon or eggs).ti,ab.").unwrap();
/// assert_eq!(parsed.fields, vec!["ti", "ab"]);
/// assert_eq!(parsed.condition.to_string(), "(bacon or eggs)");
/// ```
pub fn parse_field_condition(input: &str) -> ParseResult<FieldQualifiedCondition> {
    let text = input.trim();
    let (condition, fields) = split_field_suffix(text);
    let condition = parse_condition(condition)?;
    Ok(FieldQualifiedCondition::new(condition, fields))
}

// ============================================================================
// Condition trees
// ============================================================================

/// Parse a condition into a [`ConditionTree`].
///
/// ```rust
/// use bibquery::{parse_condition, ConditionTree};
///
/// let tree = parse_condition("\"bacon and eggs\"").unwrap();
/// assert!(matches!(tree, ConditionTree::Leaf(_)));
///
/// let tree = parse_condition("bacon and eggs").unwrap();
/// assert!(matches!(tree, ConditionTree::Binary { .. }));
/// ```
pub fn parse_condition(input: &str) -> ParseResult<ConditionTree> {
    condition_at(input, 0)
}

fn condition_at(input: &str, offset: usize) -> ParseResult<ConditionTree> {
    let leading = input.len() - input.trim_start().len();
    let text = input.trim();
    let offset = offset + leading;
    if text.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    if text.starts_with('(') {
        let close = find_matching_bracket(text, 0)
            .ok_or(ParseError::BracketMismatch { position: offset })?;
        if close + 1 == text.len() {
            let inner = condition_at(&text[1..close], offset + 1)?;
            return Ok(ConditionTree::Bracketed(Box::new(inner)));
        }
        return match find_top_level_operator(text).map_err(|e| shift(e, offset))? {
            Some(m) if text[close + 1..m.start].trim().is_empty() => {
                split_binary(text, m, offset)
            }
            _ => Err(ParseError::OperatorNotFound {
                position: offset + close + 1,
            }),
        };
    }

    match find_top_level_operator(text).map_err(|e| shift(e, offset))? {
        Some(m) => split_binary(text, m, offset),
        None => Ok(ConditionTree::Leaf(LeafTerm::new(text))),
    }
}

fn split_binary(
    text: &str,
    m: OperatorMatch,
    offset: usize,
) -> ParseResult<ConditionTree> {
    let left = &text[..m.start];
    let right = &text[m.end..];
    if left.trim().is_empty() || right.trim().is_empty() {
        return Err(ParseError::EmptyOperand {
            operator: m.operator.keyword().to_string(),
        });
    }
    Ok(ConditionTree::Binary {
        left: Box::new(condition_at(left, offset)?),
        operator: m.operator,
        right: Box::new(condition_at(right, offset + m.end)?),
    })
}

/// Rebases a position-carrying error onto the enclosing text.
fn shift(err: ParseError, offset: usize) -> ParseError {
    match err {
        ParseError::BracketMismatch { position } => ParseError::BracketMismatch {
            position: position + offset,
        },
        ParseError::UnexpectedClose { position } => ParseError::UnexpectedClose {
            position: position + offset,
        },
        ParseError::BareAdjacency { position } => ParseError::BareAdjacency {
            position: position + offset,
        },
        ParseError::ZeroDistance { position } => ParseError::ZeroDistance {
            position: position + offset,
        },
        other => other,
    }
}
