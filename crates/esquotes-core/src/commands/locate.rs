//! Finding the string under a cursor.

use crate::parse::{StringBodyTarget, StringTarget};

/// The innermost body target whose range contains `offset`.
///
/// Interpolations are searched before the fragments around them, so a
/// cursor on a string nested in `${...}` finds the nested string.
#[must_use]
pub fn find_active_target(targets: &[StringTarget], offset: usize) -> Option<&StringBodyTarget> {
    let nested = targets
        .iter()
        .filter_map(StringTarget::as_group)
        .filter(|group| group.range.contains_offset(offset))
        .find_map(|group| find_active_target(&group.partials, offset));

    nested.or_else(|| {
        targets
            .iter()
            .filter_map(StringTarget::as_body)
            .find(|body| body.range.contains_offset(offset))
    })
}

/// The fragments of the literal containing `offset`.
///
/// A normal string yields a one-element slice. A template yields all of its
/// bodies and the groups between them.
#[must_use]
pub fn find_active_fragments(targets: &[StringTarget], offset: usize) -> Option<&[StringTarget]> {
    let nested = targets
        .iter()
        .filter_map(StringTarget::as_group)
        .filter(|group| group.range.contains_offset(offset))
        .find_map(|group| find_active_fragments(&group.partials, offset));
    if nested.is_some() {
        return nested;
    }

    let index = targets.iter().position(|target| {
        target
            .as_body()
            .is_some_and(|body| body.range.contains_offset(offset))
    })?;
    Some(literal_around(targets, index))
}

/// Expand the body at `index` to the whole literal it belongs to.
fn literal_around(targets: &[StringTarget], index: usize) -> &[StringTarget] {
    let is_first = |target: &StringTarget| target.as_body().is_some_and(StringBodyTarget::is_first_fragment);
    let is_last = |target: &StringTarget| target.as_body().is_some_and(StringBodyTarget::is_last_fragment);

    let mut start = index;
    while start > 0 && !is_first(&targets[start]) {
        start -= 1;
    }
    let mut end = index;
    while end + 1 < targets.len() && !is_last(&targets[end]) {
        end += 1;
    }

    &targets[start..=end]
}
