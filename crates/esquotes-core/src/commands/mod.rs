//! Cursor-driven conversions.
//!
//! Each command parses the document, finds the string under the cursor and
//! returns the edits that convert it. Nothing is applied here; see
//! [`apply_edits`](crate::apply_edits).

mod locate;

pub use locate::{find_active_fragments, find_active_target};

use crate::config::Config;
use crate::error::{ConvertError, DeclineReason};
use crate::parse::{
    Delimiter, Parsed, PositionIndex, StringBodyTarget, StringKind, StringTarget, parse,
};
use crate::transform::{Edit, build_concatenation_edits, transform};

/// A conversion that can be applied at a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Command {
    /// Turn a quoted string into a template string.
    ToTemplate,
    /// Turn a template string into a quoted string.
    ToNormal,
    /// Swap single and double quotes.
    Toggle,
}

impl Command {
    /// Run the command at byte `offset` of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Declined`] when the command does not apply to
    /// the string at `offset`.
    pub fn run(self, source: &str, offset: usize, config: &Config) -> Result<Vec<Edit>, ConvertError> {
        match self {
            Self::ToTemplate => switch_to_template(source, offset),
            Self::ToNormal => switch_to_normal(source, offset, config),
            Self::Toggle => toggle_quotes(source, offset),
        }
    }
}

/// Convert a 1-indexed line and column to a byte offset in `source`.
///
/// # Errors
///
/// Returns [`ConvertError::OutOfRange`] when the line does not exist.
pub fn offset_at(source: &str, line: usize, column: usize) -> Result<usize, ConvertError> {
    PositionIndex::new(source)
        .offset(line, column)
        .ok_or(ConvertError::OutOfRange { line, column })
}

/// Convert the quoted string at `offset` into a template string.
///
/// # Errors
///
/// Declines when there is no string at `offset`, when it already is a
/// template, or when it is unterminated.
pub fn switch_to_template(source: &str, offset: usize) -> Result<Vec<Edit>, ConvertError> {
    let (parsed, index) = parse_indexed(source);
    let target = active_target(&parsed, &index, offset)?;

    if target.kind.is_template() {
        return Err(ConvertError::declined_at(
            DeclineReason::AlreadyTemplate,
            target.range.start,
            &index,
        ));
    }
    ensure_terminated(target, &index)?;

    Ok(vec![Edit {
        range: target.range,
        text: transform(&target.body, target.kind, StringKind::Template, true, true),
    }])
}

/// Convert the template string at `offset` into a quoted string.
///
/// The quote comes from `config`, falling back to the document's most common
/// quote. Templates with interpolations become a `+` concatenation.
///
/// # Errors
///
/// Declines when there is no string at `offset`, when it is not a template,
/// or when the template is unterminated.
pub fn switch_to_normal(source: &str, offset: usize, config: &Config) -> Result<Vec<Edit>, ConvertError> {
    let (parsed, index) = parse_indexed(source);
    let target = active_target(&parsed, &index, offset)?;

    if !target.kind.is_template() {
        return Err(ConvertError::declined_at(
            DeclineReason::AlreadyNormal,
            target.range.start,
            &index,
        ));
    }

    let destination = config.default_quote.resolve(parsed.default_quote);
    let fragments = find_active_fragments(&parsed.targets, offset).unwrap_or_default();
    let closed = fragments
        .last()
        .and_then(StringTarget::as_body)
        .is_some_and(|last| last.closing == Some(Delimiter::Backtick));
    if !closed {
        let start = fragments.first().map_or(target.range.start, |first| first.range().start);
        return Err(ConvertError::declined_at(DeclineReason::Unterminated, start, &index));
    }

    if let [only] = fragments {
        let body = only.as_body().unwrap_or(target);
        return Ok(vec![Edit {
            range: body.range,
            text: transform(&body.body, StringKind::Template, destination, true, true),
        }]);
    }

    build_concatenation_edits(fragments, destination)
}

/// Swap single and double quotes on the string at `offset`.
///
/// # Errors
///
/// Declines when there is no string at `offset`, when it is a template, or
/// when it is unterminated.
pub fn toggle_quotes(source: &str, offset: usize) -> Result<Vec<Edit>, ConvertError> {
    let (parsed, index) = parse_indexed(source);
    let target = active_target(&parsed, &index, offset)?;

    let destination = match target.kind {
        StringKind::SingleQuoted => StringKind::DoubleQuoted,
        StringKind::DoubleQuoted => StringKind::SingleQuoted,
        StringKind::Template => {
            return Err(ConvertError::declined_at(
                DeclineReason::TemplateString,
                target.range.start,
                &index,
            ));
        }
    };
    ensure_terminated(target, &index)?;

    Ok(vec![Edit {
        range: target.range,
        text: transform(&target.body, target.kind, destination, true, true),
    }])
}

fn parse_indexed(source: &str) -> (Parsed, PositionIndex<'_>) {
    (parse(source), PositionIndex::new(source))
}

fn active_target<'p>(
    parsed: &'p Parsed,
    index: &PositionIndex<'_>,
    offset: usize,
) -> Result<&'p StringBodyTarget, ConvertError> {
    find_active_target(&parsed.targets, offset).ok_or_else(|| {
        let location = index.position(offset.min(index.source_len()));
        ConvertError::declined_at(DeclineReason::NoString, location, index)
    })
}

fn ensure_terminated(target: &StringBodyTarget, index: &PositionIndex<'_>) -> Result<(), ConvertError> {
    if target.is_terminated() {
        Ok(())
    } else {
        Err(ConvertError::declined_at(
            DeclineReason::Unterminated,
            target.range.start,
            index,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuoteStyle;
    use crate::transform::apply_edits;

    fn run(command: Command, source: &str, offset: usize) -> Result<String, ConvertError> {
        let edits = command.run(source, offset, &Config::default())?;
        Ok(apply_edits(source, &edits))
    }

    #[test]
    fn test_toggle_double_to_single() {
        assert_eq!(run(Command::Toggle, r#"x = "it's";"#, 6).unwrap(), r"x = 'it\'s';");
    }

    #[test]
    fn test_to_template() {
        let source = "x = \"line1\\n\\\nline2\";";
        assert_eq!(run(Command::ToTemplate, source, 5).unwrap(), "x = `line1\nline2`;");
    }

    #[test]
    fn test_to_normal_single_fragment_uses_inferred_quote() {
        let source = "a(\"q\", `it's`)";
        assert_eq!(run(Command::ToNormal, source, 9).unwrap(), "a(\"q\", \"it's\")");
    }

    #[test]
    fn test_to_normal_uses_configured_quote() {
        let source = "a(\"q\", `x`)";
        let config = Config {
            default_quote: QuoteStyle::Single,
            ..Config::default()
        };
        let edits = switch_to_normal(source, 8, &config).unwrap();
        assert_eq!(apply_edits(source, &edits), "a(\"q\", 'x')");
    }

    #[test]
    fn test_to_normal_with_interpolations() {
        let source = "msg = `Hello ${user.name}, you have ${a + b} items`;";
        assert_eq!(
            run(Command::ToNormal, source, 30).unwrap(),
            "msg = 'Hello ' + user.name + ', you have ' + (a + b) + ' items';"
        );
    }

    #[test]
    fn test_to_normal_keeps_carriage_return_inside_the_string() {
        let output = run(Command::ToNormal, "x = `a\rb`;", 5).unwrap();
        assert_eq!(output, "x = 'a\\n\\\rb';");

        let reparsed = parse(&output);
        let target = reparsed.targets[0].as_body().unwrap();
        assert!(target.is_terminated());
        assert!(reparsed.diagnostics.is_empty());
    }

    #[test]
    fn test_declines_already_template() {
        let error = run(Command::ToTemplate, "`x`", 1).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::AlreadyTemplate));
    }

    #[test]
    fn test_declines_already_normal() {
        let error = run(Command::ToNormal, "'x'", 1).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::AlreadyNormal));
    }

    #[test]
    fn test_declines_toggle_on_template() {
        let error = run(Command::Toggle, "`x`", 1).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::TemplateString));
    }

    #[test]
    fn test_declines_without_string() {
        let error = run(Command::Toggle, "let x = 1;", 4).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::NoString));
        assert!(error.to_string().starts_with("1:5: no string found"));
    }

    #[test]
    fn test_declines_unterminated() {
        let error = run(Command::Toggle, "x = 'abc", 6).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::Unterminated));

        let error = run(Command::ToNormal, "x = `a${b}c", 10).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::Unterminated));
    }

    #[test]
    fn test_declines_empty_interpolation() {
        let error = run(Command::ToNormal, "x = `a${ }b`;", 5).unwrap_err();
        assert_eq!(error.reason(), Some(DeclineReason::EmptyInterpolation));
        assert!(error.to_string().starts_with("1:9: "), "{error}");
    }

    #[test]
    fn test_offset_at() {
        assert_eq!(offset_at("a\nbc", 2, 2).unwrap(), 3);
        assert!(matches!(
            offset_at("a", 3, 1),
            Err(ConvertError::OutOfRange { line: 3, column: 1 })
        ));
    }
}
