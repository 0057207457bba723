//! String targets produced by the parser.

use std::fmt;

use super::position::Range;

/// The quoting style of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// `'...'`
    SingleQuoted,
    /// `"..."`
    DoubleQuoted,
    /// `` `...` ``, possibly split by interpolations.
    Template,
}

impl StringKind {
    #[must_use]
    pub const fn is_template(self) -> bool {
        matches!(self, Self::Template)
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleQuoted => write!(f, "single"),
            Self::DoubleQuoted => write!(f, "double"),
            Self::Template => write!(f, "template"),
        }
    }
}

/// A delimiter on either side of a string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `'`
    SingleQuote,
    /// `"`
    DoubleQuote,
    /// `` ` ``
    Backtick,
    /// `${`, opening an interpolation.
    InterpolationStart,
    /// `}`, closing an interpolation.
    InterpolationEnd,
}

impl Delimiter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleQuote => "'",
            Self::DoubleQuote => "\"",
            Self::Backtick => "`",
            Self::InterpolationStart => "${",
            Self::InterpolationEnd => "}",
        }
    }

    pub(crate) const fn from_quote(quote: char) -> Self {
        if quote == '"' {
            Self::DoubleQuote
        } else {
            Self::SingleQuote
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One literal segment: a whole normal string, or one piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBodyTarget {
    pub opening: Delimiter,
    /// `None` when the literal runs to the end of the input.
    pub closing: Option<Delimiter>,
    pub kind: StringKind,
    /// Source text between the delimiters, escapes left as written.
    pub body: String,
    /// Span of the segment including its delimiters.
    pub range: Range,
}

impl StringBodyTarget {
    /// Whether this segment opens its literal (`'`, `"` or `` ` ``).
    #[must_use]
    pub const fn is_first_fragment(&self) -> bool {
        !matches!(self.opening, Delimiter::InterpolationEnd)
    }

    /// Whether this segment closes its literal, or is cut off by end of input.
    #[must_use]
    pub const fn is_last_fragment(&self) -> bool {
        !matches!(self.closing, Some(Delimiter::InterpolationStart))
    }

    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.closing.is_some()
    }
}

/// The code inside one `${...}` interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringGroupTarget {
    /// String targets inside the interpolation, in source order.
    pub partials: Vec<StringTarget>,
    /// A `+`-or-lower precedence operator appears outside any bracket.
    pub has_low_priority_operator: bool,
    /// Whitespace directly after `${`; zero-width when there is none.
    pub whitespace_range_at_start: Range,
    /// Whitespace directly before `}`; zero-width when there is none.
    pub whitespace_range_at_end: Range,
    /// The expression code between `${` and `}`.
    pub range: Range,
}

impl StringGroupTarget {
    /// Whether the interpolation holds nothing but whitespace, as in `${ }`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.partials.is_empty()
            && self.whitespace_range_at_start.end.offset >= self.range.end.offset
    }
}

/// A parsed string literal segment or interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringTarget {
    Body(StringBodyTarget),
    Group(StringGroupTarget),
}

impl StringTarget {
    #[must_use]
    pub const fn as_body(&self) -> Option<&StringBodyTarget> {
        match self {
            Self::Body(body) => Some(body),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub const fn as_group(&self) -> Option<&StringGroupTarget> {
        match self {
            Self::Body(_) => None,
            Self::Group(group) => Some(group),
        }
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::Body(body) => body.range,
            Self::Group(group) => group.range,
        }
    }
}

/// Visit every body target in pre-order.
pub fn for_each_body<'t>(targets: &'t [StringTarget], visit: &mut impl FnMut(&'t StringBodyTarget)) {
    for target in targets {
        match target {
            StringTarget::Body(body) => visit(body),
            StringTarget::Group(group) => for_each_body(&group.partials, visit),
        }
    }
}
