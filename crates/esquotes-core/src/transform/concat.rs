//! Flattening a template literal with interpolations into `+` concatenation.

use super::transform;
use crate::error::{ConvertError, DeclineReason};
use crate::parse::{Range, StringBodyTarget, StringGroupTarget, StringKind, StringTarget};

/// A replacement of one source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range,
    pub text: String,
}

/// Build the edits that turn one template literal into a concatenation of
/// `destination` strings.
///
/// `fragments` is the literal as the parser produced it: body, group, body,
/// ..., body. Only the bodies are replaced; each interpolation's code stays
/// in place and becomes an operand, parenthesized when it contains a
/// low-priority operator.
///
/// # Errors
///
/// Declines with [`DeclineReason::MalformedFragments`] when `fragments` is not
/// one complete template literal or `destination` is a template, and with
/// [`DeclineReason::EmptyInterpolation`] when an interpolation has no code.
pub fn build_concatenation_edits(
    fragments: &[StringTarget],
    destination: StringKind,
) -> Result<Vec<Edit>, ConvertError> {
    if destination.is_template() {
        return Err(ConvertError::declined(DeclineReason::MalformedFragments));
    }
    let (bodies, groups) = split_fragments(fragments)?;

    let mut edits: Vec<Edit> = Vec::with_capacity(bodies.len());
    for (i, body) in bodies.iter().enumerate() {
        let previous = i.checked_sub(1).map(|j| groups[j]);
        let next = groups.get(i).copied();

        let mut text = String::new();
        let mut range = body.range;

        if let Some(group) = previous {
            if group.has_low_priority_operator {
                text.push(')');
            }
            text.push_str(" + ");
            range.start = group.whitespace_range_at_end.start;
        }

        text.push_str(&transform(
            &body.body,
            StringKind::Template,
            destination,
            true,
            true,
        ));

        if let Some(group) = next {
            text.push_str(" + ");
            if group.has_low_priority_operator {
                text.push('(');
            }
            range.end = group.whitespace_range_at_start.end;
        }

        edits.push(Edit { range, text });
    }

    Ok(edits)
}

/// Check the body/group alternation and split it.
fn split_fragments(
    fragments: &[StringTarget],
) -> Result<(Vec<&StringBodyTarget>, Vec<&StringGroupTarget>), ConvertError> {
    let malformed = || ConvertError::declined(DeclineReason::MalformedFragments);

    if fragments.len() % 2 == 0 {
        return Err(malformed());
    }

    let mut bodies = Vec::with_capacity(fragments.len() / 2 + 1);
    let mut groups = Vec::with_capacity(fragments.len() / 2);

    for (i, fragment) in fragments.iter().enumerate() {
        match fragment {
            StringTarget::Body(body) if i % 2 == 0 => {
                let first = i == 0;
                let last = i + 1 == fragments.len();
                if body.kind != StringKind::Template
                    || body.is_first_fragment() != first
                    || body.is_last_fragment() != last
                    || !body.is_terminated()
                {
                    return Err(malformed());
                }
                bodies.push(body);
            }
            StringTarget::Group(group) if i % 2 == 1 => {
                if group.is_blank() {
                    let location = group.range.start;
                    return Err(ConvertError::Declined {
                        reason: DeclineReason::EmptyInterpolation,
                        location: Some(location),
                        source_line: None,
                    });
                }
                groups.push(group);
            }
            _ => return Err(malformed()),
        }
    }

    Ok((bodies, groups))
}

/// Apply non-overlapping `edits` to `source`.
///
/// Edits may come in any order. An edit starting inside an earlier one is
/// clipped to start where the earlier one ends.
#[must_use]
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.range.start.offset, edit.range.end.offset));

    let mut output = String::with_capacity(source.len());
    let mut last = 0;
    for edit in sorted {
        let start = edit.range.start.offset.max(last);
        let end = edit.range.end.offset.max(start);
        output.push_str(&source[last..start]);
        output.push_str(&edit.text);
        last = end;
    }
    output.push_str(&source[last..]);

    output
}
