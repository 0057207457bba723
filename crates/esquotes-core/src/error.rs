//! Error types for quote conversion.

use thiserror::Error;

use crate::parse::{Position, PositionIndex};

/// Why a conversion request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// No string literal covers the requested position.
    NoString,
    /// Switching to a template, but the string already is one.
    AlreadyTemplate,
    /// Switching to a normal string, but the string already is one.
    AlreadyNormal,
    /// Toggling single/double quotes on a template string.
    TemplateString,
    /// The literal has no closing delimiter.
    Unterminated,
    /// A template interpolation with no expression in it.
    EmptyInterpolation,
    /// The targets handed to the transformer are not one complete template literal.
    MalformedFragments,
}

impl DeclineReason {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoString => "no string found at the selected position",
            Self::AlreadyTemplate => "the string at the selected position is already a template string",
            Self::AlreadyNormal => "the string at the selected position is already a normal string",
            Self::TemplateString => "the string at the selected position is a template string",
            Self::Unterminated => "the string at the selected position is unterminated",
            Self::EmptyInterpolation => "the template string has an empty interpolation",
            Self::MalformedFragments => "the selected targets do not form a complete template string",
        }
    }

    #[must_use]
    pub const fn help(self) -> Option<&'static str> {
        match self {
            Self::NoString => Some("place the cursor inside a quoted or template string"),
            Self::TemplateString => Some("use `to-normal` to convert a template string"),
            Self::Unterminated => Some("add the missing closing quote first"),
            Self::EmptyInterpolation => Some("fill in or remove the empty `${}` first"),
            Self::AlreadyTemplate | Self::AlreadyNormal | Self::MalformedFragments => None,
        }
    }
}

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The conversion does not apply to the selected string.
    #[error("{}", format_declined(.reason, .location, .source_line))]
    Declined {
        reason: DeclineReason,
        /// Where the request applied, if known.
        location: Option<Position>,
        /// The source line containing `location`.
        source_line: Option<String>,
    },

    /// A line/column pair outside the document.
    #[error("position {line}:{column} is outside the document")]
    OutOfRange { line: usize, column: usize },
}

impl ConvertError {
    /// A declined request without source context.
    #[must_use]
    pub const fn declined(reason: DeclineReason) -> Self {
        Self::Declined {
            reason,
            location: None,
            source_line: None,
        }
    }

    /// A declined request pointing at `location` in the indexed source.
    pub(crate) fn declined_at(
        reason: DeclineReason,
        location: Position,
        index: &PositionIndex<'_>,
    ) -> Self {
        log::debug!("declined at {location}: {}", reason.message());
        Self::Declined {
            reason,
            location: Some(location),
            source_line: index.line_text(location.line).map(ToString::to_string),
        }
    }

    /// The decline reason, if the request was declined.
    #[must_use]
    pub const fn reason(&self) -> Option<DeclineReason> {
        match self {
            Self::Declined { reason, .. } => Some(*reason),
            Self::OutOfRange { .. } => None,
        }
    }
}

/// Format a declined request with source context for display.
#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn format_declined(
    reason: &DeclineReason,
    location: &Option<Position>,
    source_line: &Option<String>,
) -> String {
    use std::fmt::Write;
    let mut output = String::new();
    let message = reason.message();

    if let Some(loc) = location {
        let _ = writeln!(output, "{}:{}: {message}", loc.line, loc.column);
    } else {
        let _ = writeln!(output, "{message}");
    }

    if let (Some(line), Some(loc)) = (source_line, location) {
        let _ = writeln!(output, "  |");
        let _ = writeln!(output, "{:>3} | {line}", loc.line);
        let _ = writeln!(output, "  | {:>width$}^", "", width = loc.column - 1);
    }

    if let Some(help_text) = reason.help() {
        let _ = write!(output, "  = help: {help_text}");
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declined_without_location() {
        let error = ConvertError::declined(DeclineReason::AlreadyNormal);
        assert_eq!(
            error.to_string(),
            "the string at the selected position is already a normal string"
        );
    }

    #[test]
    fn test_declined_with_source_context() {
        let source = "let a = 1;\nlet b = `x`;";
        let index = PositionIndex::new(source);
        let error = ConvertError::declined_at(DeclineReason::TemplateString, index.position(19), &index);
        assert_eq!(
            error.to_string(),
            "2:9: the string at the selected position is a template string\n  |\n  2 | let b = `x`;\n  |         ^\n  = help: use `to-normal` to convert a template string"
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let error = ConvertError::OutOfRange { line: 9, column: 2 };
        assert_eq!(error.to_string(), "position 9:2 is outside the document");
        assert_eq!(error.reason(), None);
    }
}
