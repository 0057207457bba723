//! Quote kind conversion for string bodies.

mod concat;
mod escape;

pub use concat::{Edit, apply_edits, build_concatenation_edits};

use crate::parse::StringKind;

/// Rewrite `body` from `from` to `to` and wrap it in `to`'s delimiters.
///
/// `first` and `last` only matter for template fragments; see [`wrap`].
#[must_use]
pub fn transform(body: &str, from: StringKind, to: StringKind, first: bool, last: bool) -> String {
    use StringKind::{DoubleQuoted, SingleQuoted, Template};

    let converted = match (from, to) {
        (SingleQuoted, SingleQuoted) | (DoubleQuoted, DoubleQuoted) | (Template, Template) => {
            body.to_string()
        }
        (SingleQuoted, DoubleQuoted) => escape::swap_quotes(body, '\'', '"'),
        (DoubleQuoted, SingleQuoted) => escape::swap_quotes(body, '"', '\''),
        (SingleQuoted | DoubleQuoted, Template) => escape::normal_to_template(body),
        (Template, SingleQuoted) => escape::template_to_normal(body, '\''),
        (Template, DoubleQuoted) => escape::template_to_normal(body, '"'),
    };

    wrap(&converted, to, first, last)
}

/// Wrap `body` in the delimiters of `kind`.
///
/// Template fragments open with `` ` `` when `first`, otherwise `}`, and
/// close with `` ` `` when `last`, otherwise `${`.
#[must_use]
pub fn wrap(body: &str, kind: StringKind, first: bool, last: bool) -> String {
    match kind {
        StringKind::SingleQuoted => format!("'{body}'"),
        StringKind::DoubleQuoted => format!("\"{body}\""),
        StringKind::Template => {
            let opening = if first { "`" } else { "}" };
            let closing = if last { "`" } else { "${" };
            format!("{opening}{body}{closing}")
        }
    }
}
