//! Quote-aware structural scanning.
//!
//! Brackets and operators inside double-quoted spans are invisible to every
//! scan here. A quote preceded by a backslash does not toggle the quoted
//! state. All structural characters are ASCII, so scanning bytes keeps every
//! returned index on a char boundary.

use crate::ast::{Operator, OperatorKind};
use crate::error::{ParseError, ParseResult};

/// Iterates `(index, byte)` over the bytes of `text` that lie outside quoted
/// spans. Quote characters themselves are not yielded.
pub fn unquoted_bytes(text: &str) -> impl Iterator<Item = (usize, u8)> + '_ {
    let bytes = text.as_bytes();
    let mut quoted = false;
    bytes.iter().enumerate().filter_map(move |(i, &b)| {
        if b == b'"' && !is_escaped(bytes, i) {
            quoted = !quoted;
            return None;
        }
        if quoted {
            None
        } else {
            Some((i, b))
        }
    })
}

fn is_escaped(bytes: &[u8], i: usize) -> bool {
    i > 0 && bytes[i - 1] == b'\\'
}

/// Finds the `)` matching the `(` at `open`.
///
/// Returns `None` if `open` is not a `(` or the text ends before depth
/// returns to zero.
///
/// # Examples
///
/// ```rust
/// use bibquery::find_matching_bracket;
///
/// assert_eq!(find_matching_bracket("(a or (b)) and c", 0), Some(9));
/// assert_eq!(find_matching_bracket("(\"x)\" or y)", 0), Some(10));
/// assert_eq!(find_matching_bracket("(a or b", 0), None);
/// ```
pub fn find_matching_bracket(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, b) in unquoted_bytes(&text[open..]) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Location of an operator found by [`find_top_level_operator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorMatch {
    /// Byte offset of the first character of the keyword.
    pub start: usize,
    /// Byte offset one past the keyword.
    pub end: usize,
    /// The recognised operator.
    pub operator: Operator,
}

/// Finds the first `and`, `or` or `adjN` outside quotes and brackets.
///
/// A keyword only counts when it stands as a word: preceded by whitespace,
/// `)` or a closing quote, and followed by whitespace, `(`, a quote or the end
/// of the text. Keywords are matched case-insensitively.
///
/// Bare `adj` and `adj0` are errors, as are unbalanced brackets anywhere in
/// the text.
pub fn find_top_level_operator(text: &str) -> ParseResult<Option<OperatorMatch>> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut first_open = 0usize;
    let mut found: Option<OperatorMatch> = None;
    let mut skip_until = 0usize;

    for (i, b) in unquoted_bytes(text) {
        match b {
            b'(' => {
                if depth == 0 {
                    first_open = i;
                }
                depth += 1;
                continue;
            }
            b')' => {
                if depth == 0 {
                    return Err(ParseError::UnexpectedClose { position: i });
                }
                depth -= 1;
                continue;
            }
            _ => {}
        }

        if found.is_some() || depth > 0 || i < skip_until || i == 0 {
            continue;
        }
        if !b.is_ascii_alphabetic() || !is_left_boundary(bytes[i - 1]) {
            continue;
        }

        let end = i + bytes[i..]
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
        skip_until = end;
        if let Some(&next) = bytes.get(end) {
            if !is_right_boundary(next) {
                continue;
            }
        }

        if let Some(operator) = keyword_operator(&text[i..end], i)? {
            found = Some(OperatorMatch {
                start: i,
                end,
                operator,
            });
        }
    }

    if depth > 0 {
        return Err(ParseError::BracketMismatch {
            position: first_open,
        });
    }
    Ok(found)
}

fn is_left_boundary(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b')' || b == b'"'
}

fn is_right_boundary(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'(' || b == b'"'
}

/// Interprets a whole word as an operator keyword.
pub(crate) fn keyword_operator(word: &str, position: usize) -> ParseResult<Option<Operator>> {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "and" => return Ok(Some(Operator::new(OperatorKind::And, word))),
        "or" => return Ok(Some(Operator::new(OperatorKind::Or, word))),
        "adj" => return Err(ParseError::BareAdjacency { position }),
        _ => {}
    }

    let Some(digits) = lower.strip_prefix("adj") else {
        return Ok(None);
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let distance: u32 = digits.parse().map_err(|_| ParseError::InvalidDistance {
        text: word.to_string(),
    })?;
    if distance == 0 {
        return Err(ParseError::ZeroDistance { position });
    }
    Ok(Some(Operator::new(OperatorKind::Adj(distance), word)))
}
