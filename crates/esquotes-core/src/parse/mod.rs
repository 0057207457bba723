//! Nested string literal parser.
//!
//! Builds a tree of [`StringTarget`]s from source text. Template
//! interpolations are tracked with an explicit stack of contexts, each with
//! its own bracket stack, so that `}` characters inside nested object
//! literals or strings never end an interpolation early.

mod diagnostic;
mod position;
mod scan;
mod target;

pub use diagnostic::ParseDiagnostic;
pub use position::{Position, PositionIndex, Range};
pub use target::{
    Delimiter, StringBodyTarget, StringGroupTarget, StringKind, StringTarget, for_each_body,
};

use scan::{Scanner, TemplateSegment, Token, TokenKind};

/// The result of parsing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Top-level targets in source order.
    pub targets: Vec<StringTarget>,
    /// The more common normal quote in the document, single on a tie.
    pub default_quote: StringKind,
    /// Problems the parser recovered from.
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parse `source` into string targets.
///
/// Never fails: malformed input yields the best-effort tree plus diagnostics.
#[must_use]
pub fn parse(source: &str) -> Parsed {
    let mut parser = Parser::new(source);
    parser.run();

    let default_quote = infer_default_quote(&parser.root);
    Parsed {
        targets: parser.root,
        default_quote,
        diagnostics: parser.diagnostics,
    }
}

/// An open interpolation.
#[derive(Debug)]
struct Context {
    partials: Vec<StringTarget>,
    brackets: Vec<char>,
    has_low_priority_operator: bool,
    /// Offset right after `${`.
    start: usize,
    seen_token: bool,
    leading_whitespace: Option<(usize, usize)>,
    trailing_whitespace: Option<(usize, usize)>,
}

impl Context {
    const fn new(start: usize) -> Self {
        Self {
            partials: Vec::new(),
            brackets: Vec::new(),
            has_low_priority_operator: false,
            start,
            seen_token: false,
            leading_whitespace: None,
            trailing_whitespace: None,
        }
    }

    /// A bare `}` ends this interpolation unless an object literal is open.
    fn closes_on_brace(&self) -> bool {
        !self.brackets.contains(&'{')
    }

    /// Close the context at `end` (the offset of its `}`), dropping the
    /// bracket stack.
    fn finish(self, end: usize, index: &PositionIndex<'_>) -> StringGroupTarget {
        let (ws_start, ws_start_end) = self.leading_whitespace.unwrap_or((self.start, self.start));
        let (ws_end_start, ws_end) = self.trailing_whitespace.unwrap_or((end, end));

        StringGroupTarget {
            partials: self.partials,
            has_low_priority_operator: self.has_low_priority_operator,
            whitespace_range_at_start: index.range(ws_start, ws_start_end),
            whitespace_range_at_end: index.range(ws_end_start, ws_end),
            range: index.range(self.start, end),
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    index: PositionIndex<'a>,
    scanner: Scanner<'a>,
    root: Vec<StringTarget>,
    stack: Vec<Context>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            index: PositionIndex::new(source),
            scanner: Scanner::new(source),
            root: Vec::new(),
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) {
        loop {
            let closes = self.stack.last().is_some_and(Context::closes_on_brace);
            let Some(token) = self.scanner.next_token(closes) else {
                break;
            };

            if let TokenKind::Template(segment) = token.kind {
                self.template_segment(&token, segment);
                continue;
            }

            self.track_whitespace(&token);

            match token.kind {
                TokenKind::QuotedString {
                    quote,
                    body_end,
                    closed,
                } => {
                    let delimiter = Delimiter::from_quote(quote);
                    let kind = if quote == '"' {
                        StringKind::DoubleQuoted
                    } else {
                        StringKind::SingleQuoted
                    };
                    let target = self.body_target(
                        &token,
                        body_end,
                        delimiter,
                        closed.then_some(delimiter),
                        kind,
                    );
                    self.push_target(StringTarget::Body(target));
                }
                TokenKind::OpenBracket(bracket) => {
                    if let Some(context) = self.stack.last_mut() {
                        context.brackets.push(bracket);
                    }
                }
                TokenKind::CloseBracket(bracket) => self.close_bracket(bracket, token.start),
                TokenKind::Operator => {
                    if let Some(context) = self.stack.last_mut() {
                        context.has_low_priority_operator |= context.brackets.is_empty();
                    }
                }
                TokenKind::Comment
                | TokenKind::Whitespace
                | TokenKind::Other
                | TokenKind::Template(_) => {}
            }
        }

        let end = self.source.len();
        while !self.stack.is_empty() {
            self.pop_context(end);
        }
    }

    fn template_segment(&mut self, token: &Token, segment: TemplateSegment) {
        if segment.opening == Delimiter::InterpolationEnd {
            self.pop_context(token.start);
        }
        self.track_whitespace(token);

        let target = self.body_target(
            token,
            segment.body_end,
            segment.opening,
            segment.closing,
            StringKind::Template,
        );
        self.push_target(StringTarget::Body(target));

        if segment.closing == Some(Delimiter::InterpolationStart) {
            log::debug!("interpolation opened at offset {}", token.end);
            self.stack.push(Context::new(token.end));
        }
    }

    fn body_target(
        &mut self,
        token: &Token,
        body_end: usize,
        opening: Delimiter,
        closing: Option<Delimiter>,
        kind: StringKind,
    ) -> StringBodyTarget {
        let range = self.index.range(token.start, token.end);
        if closing.is_none() {
            self.diagnostics.push(ParseDiagnostic::UnterminatedLiteral {
                kind,
                position: range.start,
            });
        }

        StringBodyTarget {
            opening,
            closing,
            kind,
            body: self.source[token.body_start()..body_end].to_string(),
            range,
        }
    }

    fn push_target(&mut self, target: StringTarget) {
        match self.stack.last_mut() {
            Some(context) => context.partials.push(target),
            None => self.root.push(target),
        }
    }

    /// Close the innermost interpolation at `end` and attach it to its parent.
    fn pop_context(&mut self, end: usize) {
        let Some(context) = self.stack.pop() else {
            return;
        };
        log::debug!("interpolation closed at offset {end}");
        let group = context.finish(end, &self.index);
        self.push_target(StringTarget::Group(group));
    }

    fn close_bracket(&mut self, bracket: char, offset: usize) {
        let Some(context) = self.stack.last_mut() else {
            return;
        };
        let opener = match bracket {
            ')' => '(',
            ']' => '[',
            _ => '{',
        };

        if context.brackets.last() == Some(&opener) {
            context.brackets.pop();
        } else {
            let position = self.index.position(offset);
            log::warn!("mismatched right bracket `{bracket}` at {position}");
            self.diagnostics
                .push(ParseDiagnostic::MismatchedBracket { bracket, position });
        }
    }

    /// Record leading and trailing whitespace of the current interpolation.
    fn track_whitespace(&mut self, token: &Token) {
        let Some(context) = self.stack.last_mut() else {
            return;
        };
        let whitespace = (token.kind == TokenKind::Whitespace && context.brackets.is_empty())
            .then_some((token.start, token.end));

        if !context.seen_token {
            context.seen_token = true;
            context.leading_whitespace = whitespace;
        }
        context.trailing_whitespace = whitespace;
    }
}

fn infer_default_quote(targets: &[StringTarget]) -> StringKind {
    let mut singles = 0usize;
    let mut doubles = 0usize;
    for_each_body(targets, &mut |body| match body.kind {
        StringKind::SingleQuoted => singles += 1,
        StringKind::DoubleQuoted => doubles += 1,
        StringKind::Template => {}
    });

    if doubles > singles {
        StringKind::DoubleQuoted
    } else {
        StringKind::SingleQuoted
    }
}

/// Render the target tree of `source` for debugging.
#[must_use]
pub fn debug_targets(source: &str) -> String {
    use std::fmt::Write;

    let parsed = parse(source);
    let mut output = format!(
        "Source: {} bytes, default quote: {}\n\nTargets:\n",
        source.len(),
        parsed.default_quote
    );
    write_targets(&mut output, &parsed.targets, 1);

    if !parsed.diagnostics.is_empty() {
        output.push_str("\nDiagnostics:\n");
        for diagnostic in &parsed.diagnostics {
            let _ = writeln!(output, "  {diagnostic}");
        }
    }

    output
}

fn write_targets(output: &mut String, targets: &[StringTarget], depth: usize) {
    use std::fmt::Write;

    let indent = "  ".repeat(depth);
    for target in targets {
        match target {
            StringTarget::Body(body) => {
                let closing = body.closing.map_or("<eof>", Delimiter::as_str);
                let _ = writeln!(
                    output,
                    "{indent}{} {}{:?}{closing} ({})",
                    body.kind, body.opening, body.body, body.range
                );
            }
            StringTarget::Group(group) => {
                let operator = if group.has_low_priority_operator {
                    " low-priority"
                } else {
                    ""
                };
                let _ = writeln!(output, "{indent}group ({}){operator}", group.range);
                write_targets(output, &group.partials, depth + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(target: &StringTarget) -> &StringBodyTarget {
        target.as_body().expect("expected a body target")
    }

    fn group(target: &StringTarget) -> &StringGroupTarget {
        target.as_group().expect("expected a group target")
    }

    fn slice(source: &str, range: Range) -> &str {
        &source[range.start.offset..range.end.offset]
    }

    #[test]
    fn test_normal_strings() {
        let parsed = parse(r#"let a = "x", b = 'y';"#);
        assert_eq!(parsed.targets.len(), 2);
        let first = body(&parsed.targets[0]);
        assert_eq!(first.kind, StringKind::DoubleQuoted);
        assert_eq!(first.body, "x");
        assert_eq!(first.closing, Some(Delimiter::DoubleQuote));
        assert_eq!((first.range.start.column, first.range.end.column), (9, 12));
        assert_eq!(body(&parsed.targets[1]).kind, StringKind::SingleQuoted);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_comments_are_skipped() {
        let parsed = parse("// 'a'\n/* \"b\" */ 'c'");
        assert_eq!(parsed.targets.len(), 1);
        assert_eq!(body(&parsed.targets[0]).body, "c");
    }

    #[test]
    fn test_template_with_interpolation_is_flat() {
        let source = "`Hello ${name}!`";
        let parsed = parse(source);
        assert_eq!(parsed.targets.len(), 3);

        let head = body(&parsed.targets[0]);
        assert_eq!(head.opening, Delimiter::Backtick);
        assert_eq!(head.closing, Some(Delimiter::InterpolationStart));
        assert_eq!(head.body, "Hello ");

        let expression = group(&parsed.targets[1]);
        assert!(expression.partials.is_empty());
        assert!(!expression.has_low_priority_operator);
        assert_eq!(slice(source, expression.range), "name");

        let tail = body(&parsed.targets[2]);
        assert_eq!(tail.opening, Delimiter::InterpolationEnd);
        assert_eq!(tail.closing, Some(Delimiter::Backtick));
        assert_eq!(tail.body, "!");
    }

    #[test]
    fn test_nested_template_in_interpolation() {
        let parsed = parse("`a${ `b${c}d` }e`");
        assert_eq!(parsed.targets.len(), 3);
        let outer = group(&parsed.targets[1]);
        assert_eq!(outer.partials.len(), 3);
        assert_eq!(body(&outer.partials[0]).body, "b");
        assert!(outer.partials[1].as_group().is_some());
        assert_eq!(body(&outer.partials[2]).body, "d");
        assert_eq!(body(&parsed.targets[2]).body, "e");
    }

    #[test]
    fn test_brace_inside_object_and_string_does_not_close() {
        let source = r#"`a${f({x: "}"})}b`"#;
        let parsed = parse(source);
        assert_eq!(parsed.targets.len(), 3);
        let expression = group(&parsed.targets[1]);
        assert_eq!(slice(source, expression.range), r#"f({x: "}"})"#);
        assert_eq!(expression.partials.len(), 1);
        assert_eq!(body(&expression.partials[0]).body, "}");
        assert!(!expression.has_low_priority_operator);
        assert_eq!(body(&parsed.targets[2]).body, "b");
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_low_priority_operator_only_at_top_level() {
        let parsed = parse("`${a + b}${f(a + b)}${a ? b : c}${x.y}`");
        let flags: Vec<bool> = parsed
            .targets
            .iter()
            .filter_map(StringTarget::as_group)
            .map(|g| g.has_low_priority_operator)
            .collect();
        assert_eq!(flags, [true, false, true, false]);
    }

    #[test]
    fn test_whitespace_ranges() {
        let source = "`a${ name\t}b${x}c`";
        let parsed = parse(source);
        let spaced = group(&parsed.targets[1]);
        assert_eq!(slice(source, spaced.whitespace_range_at_start), " ");
        assert_eq!(slice(source, spaced.whitespace_range_at_end), "\t");

        let tight = group(&parsed.targets[3]);
        assert!(tight.whitespace_range_at_start.is_empty());
        assert!(tight.whitespace_range_at_end.is_empty());
        assert_eq!(tight.whitespace_range_at_start.start.offset, 14);
        assert_eq!(tight.whitespace_range_at_end.start.offset, 15);
    }

    #[test]
    fn test_whitespace_inside_brackets_is_not_trailing() {
        let source = "`${f( a )}`";
        let parsed = parse(source);
        let expression = group(&parsed.targets[1]);
        assert!(expression.whitespace_range_at_start.is_empty());
        assert!(expression.whitespace_range_at_end.is_empty());
    }

    #[test]
    fn test_empty_interpolation_is_kept() {
        let parsed = parse("`a${}b`");
        assert_eq!(parsed.targets.len(), 3);
        assert!(group(&parsed.targets[1]).range.is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        let source = "\"unterminated";
        let parsed = parse(source);
        assert_eq!(parsed.targets.len(), 1);
        let target = body(&parsed.targets[0]);
        assert_eq!(target.closing, None);
        assert_eq!(target.body, "unterminated");
        assert_eq!(target.range.end.offset, source.len());
        assert!(matches!(
            parsed.diagnostics[..],
            [ParseDiagnostic::UnterminatedLiteral {
                kind: StringKind::DoubleQuoted,
                ..
            }]
        ));
    }

    #[test]
    fn test_unterminated_interpolation_closes_at_end() {
        let source = "`a${b + ";
        let parsed = parse(source);
        assert_eq!(parsed.targets.len(), 2);
        let expression = group(&parsed.targets[1]);
        assert_eq!(expression.range.end.offset, source.len());
        assert!(expression.has_low_priority_operator);
        assert_eq!(slice(source, expression.whitespace_range_at_end), " ");
    }

    #[test]
    fn test_mismatched_bracket_is_reported() {
        let parsed = parse("`${a)}b`");
        assert_eq!(parsed.targets.len(), 3);
        assert!(matches!(
            parsed.diagnostics[..],
            [ParseDiagnostic::MismatchedBracket { bracket: ')', .. }]
        ));
    }

    #[test]
    fn test_brackets_outside_templates_are_ignored() {
        let parsed = parse("f(a)) }");
        assert!(parsed.targets.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_default_quote_inference() {
        assert_eq!(parse("'a' 'b' \"c\"").default_quote, StringKind::SingleQuoted);
        assert_eq!(parse("'a' \"b\" `${\"c\"}`").default_quote, StringKind::DoubleQuoted);
        assert_eq!(parse("'a' \"b\"").default_quote, StringKind::SingleQuoted);
        assert_eq!(parse("").default_quote, StringKind::SingleQuoted);
    }

    #[test]
    fn test_leaf_ranges_cover_source_in_order() {
        let source = "const s = `x${ f('}', [1, 2]) + `y${z}` }w` + \"q\"; // 'c'\n";
        let parsed = parse(source);

        let mut rebuilt = String::new();
        let mut last = 0;
        for_each_body(&parsed.targets, &mut |target| {
            assert!(target.range.start.offset >= last, "ranges out of order");
            rebuilt.push_str(&source[last..target.range.start.offset]);
            rebuilt.push_str(slice(source, target.range));
            last = target.range.end.offset;
        });
        rebuilt.push_str(&source[last..]);

        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_debug_targets_lists_tree() {
        let output = debug_targets("`a${b + 'c'}d`");
        assert!(output.contains("template `\"a\"${"), "{output}");
        assert!(output.contains("group (1:5-1:12) low-priority"), "{output}");
        assert!(output.contains("    single '\"c\"'"), "{output}");
    }
}
