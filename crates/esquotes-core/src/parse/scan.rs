//! Single-pass scanner classifying JavaScript/TypeScript source text.
//!
//! The scanner only knows enough of the language to find string literals and
//! the structure of template interpolations: comments, quoted strings,
//! template segments, brackets, low-precedence operators and whitespace.
//! Everything else is consumed one character at a time.

use super::target::Delimiter;

/// Operators with precedence no higher than `+`, so that an interpolated
/// expression using them must be parenthesized when it becomes an operand of
/// `+`. Ordered longest first so that `>>>=` wins over `>>>` and `>>`.
const LOW_PRIORITY_OPERATORS: &[&str] = &[
    ">>>=",
    ">>>", "===", "!==", "**=", "<<=", ">>=", "&&=", "||=", "??=",
    "=>", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "&&", "||", "??",
    "<<", ">>",
    "+", "-", "&", "|", "^", "?", ":", "<", ">", "=", ",",
];

/// Word operators with precedence below `+`. They only count as operators
/// when they stand alone as a word.
const KEYWORD_OPERATORS: &[&str] = &["instanceof", "satisfies", "in", "as"];

/// A template segment found by the sub-scan after a backtick or `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSegment {
    pub opening: Delimiter,
    /// Byte offset where the body ends and the closing delimiter begins.
    pub body_end: usize,
    pub closing: Option<Delimiter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    QuotedString {
        quote: char,
        body_end: usize,
        closed: bool,
    },
    Template(TemplateSegment),
    OpenBracket(char),
    CloseBracket(char),
    Operator,
    Whitespace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Offset where the body of a string token starts. Every opening
    /// delimiter is a single ASCII character.
    pub const fn body_start(&self) -> usize {
        self.start + 1
    }
}

/// Scanner over a source text.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Scan the next token.
    ///
    /// `closes_interpolation` tells the scanner that a bare `}` ends the
    /// active interpolation and resumes the template body, which only the
    /// parser can know.
    pub fn next_token(&mut self, closes_interpolation: bool) -> Option<Token> {
        let start = self.pos;
        let rest = &self.source[start..];
        let first = rest.chars().next()?;

        let (kind, end) = if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map_or(self.source.len(), |i| start + i + 4);
            (TokenKind::Comment, end)
        } else if rest.starts_with("//") {
            let end = rest
                .find(is_line_terminator)
                .map_or(self.source.len(), |i| start + i);
            (TokenKind::Comment, end)
        } else if first == '"' || first == '\'' {
            self.scan_quoted(start, first)
        } else if first == '`' || (first == '}' && closes_interpolation) {
            let segment = self.scan_template(start, first);
            let end = match segment.closing {
                Some(closing) => segment.body_end + closing.as_str().len(),
                None => segment.body_end,
            };
            (TokenKind::Template(segment), end)
        } else if matches!(first, '(' | '[' | '{') {
            (TokenKind::OpenBracket(first), start + 1)
        } else if matches!(first, ')' | ']' | '}') {
            (TokenKind::CloseBracket(first), start + 1)
        } else if let Some(len) = operator_len(self.source, start) {
            (TokenKind::Operator, start + len)
        } else if first.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            (TokenKind::Whitespace, start + len)
        } else {
            (TokenKind::Other, start + other_len(rest, first))
        };

        self.pos = end;
        Some(Token { kind, start, end })
    }

    /// Scan a `'` or `"` string starting at `start`.
    ///
    /// A raw line terminator ends the literal without closing it.
    fn scan_quoted(&self, start: usize, quote: char) -> (TokenKind, usize) {
        let mut i = start + 1;

        loop {
            let Some(c) = self.source[i..].chars().next() else {
                return (unclosed(quote, i), i);
            };
            match c {
                '\\' => i += 1 + self.escaped_len(i + 1),
                c if c == quote => {
                    let kind = TokenKind::QuotedString {
                        quote,
                        body_end: i,
                        closed: true,
                    };
                    return (kind, i + 1);
                }
                c if is_line_terminator(c) => return (unclosed(quote, i), i),
                c => i += c.len_utf8(),
            }
        }
    }

    /// Sub-scan a template body starting at the backtick or `}` at `start`,
    /// up to the next unescaped backtick or `${`.
    fn scan_template(&self, start: usize, opening: char) -> TemplateSegment {
        let opening = if opening == '`' {
            Delimiter::Backtick
        } else {
            Delimiter::InterpolationEnd
        };
        let mut i = start + 1;

        loop {
            let rest = &self.source[i..];
            let Some(c) = rest.chars().next() else {
                return TemplateSegment {
                    opening,
                    body_end: i,
                    closing: None,
                };
            };
            match c {
                '\\' => i += 1 + self.escaped_len(i + 1),
                '`' => {
                    return TemplateSegment {
                        opening,
                        body_end: i,
                        closing: Some(Delimiter::Backtick),
                    };
                }
                '$' if rest[1..].starts_with('{') => {
                    return TemplateSegment {
                        opening,
                        body_end: i,
                        closing: Some(Delimiter::InterpolationStart),
                    };
                }
                c => i += c.len_utf8(),
            }
        }
    }

    /// Length of the character escaped by a backslash ending just before
    /// `at`. `\r\n` counts as one line continuation; a backslash at end of
    /// input escapes nothing.
    fn escaped_len(&self, at: usize) -> usize {
        let rest = &self.source[at..];
        if rest.starts_with("\r\n") {
            2
        } else {
            rest.chars().next().map_or(0, char::len_utf8)
        }
    }
}

const fn unclosed(quote: char, body_end: usize) -> TokenKind {
    TokenKind::QuotedString {
        quote,
        body_end,
        closed: false,
    }
}

/// Line terminators as JavaScript defines them.
pub const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn operator_len(source: &str, start: usize) -> Option<usize> {
    let rest = &source[start..];
    // Optional chaining is member access, not the conditional operator.
    if rest.starts_with("?.") && !rest[2..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    LOW_PRIORITY_OPERATORS
        .iter()
        .find(|op| rest.starts_with(**op))
        .map(|op| op.len())
        .or_else(|| keyword_operator_len(source, start))
}

/// Length of a word operator at `start`, if one stands there on its own.
fn keyword_operator_len(source: &str, start: usize) -> Option<usize> {
    let before = source[..start].chars().next_back();
    if before.is_some_and(|c| is_identifier_char(c) || c == '.') {
        return None;
    }
    let rest = &source[start..];
    KEYWORD_OPERATORS
        .iter()
        .find(|word| rest.starts_with(**word) && !rest[word.len()..].starts_with(is_identifier_char))
        .map(|word| word.len())
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn other_len(rest: &str, first: char) -> usize {
    if rest.starts_with("?.") {
        2
    } else {
        first.len_utf8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        std::iter::from_fn(|| scanner.next_token(false))
            .map(|token| token.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        let mut scanner = Scanner::new(source);
        std::iter::from_fn(|| scanner.next_token(false))
            .map(|token| &source[token.start..token.end])
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_comments_swallow_quotes() {
        assert_eq!(texts("/* 'a' */x// \"b\"\ny"), [
            "/* 'a' */",
            "x",
            "// \"b\"",
            "\n",
            "y"
        ]);
        assert_eq!(kinds("/* open")[0], TokenKind::Comment);
    }

    #[test]
    fn test_quoted_string_with_escapes() {
        let source = r#""a\"b" 'c\'d'"#;
        assert_eq!(texts(source), [r#""a\"b""#, " ", r"'c\'d'"]);
        assert_eq!(kinds(source)[0], TokenKind::QuotedString {
            quote: '"',
            body_end: 5,
            closed: true,
        });
    }

    #[test]
    fn test_quoted_string_line_continuation() {
        let source = "'a\\\r\nb'";
        assert_eq!(texts(source), [source]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let source = "'abc\nx";
        assert_eq!(texts(source), ["'abc", "\n", "x"]);
        assert_eq!(kinds(source)[0], TokenKind::QuotedString {
            quote: '\'',
            body_end: 4,
            closed: false,
        });
    }

    #[test]
    fn test_unterminated_string_at_end_of_input() {
        assert_eq!(kinds("\"abc")[0], TokenKind::QuotedString {
            quote: '"',
            body_end: 4,
            closed: false,
        });
    }

    #[test]
    fn test_template_segment_to_interpolation() {
        let source = "`a\\`b${x}`";
        let mut scanner = Scanner::new(source);
        let token = scanner.next_token(false).unwrap();
        assert_eq!(&source[token.start..token.end], "`a\\`b${");
        assert_eq!(
            token.kind,
            TokenKind::Template(TemplateSegment {
                opening: Delimiter::Backtick,
                body_end: 5,
                closing: Some(Delimiter::InterpolationStart),
            })
        );
    }

    #[test]
    fn test_closing_brace_resumes_template_only_when_asked() {
        let mut scanner = Scanner::new("}b`");
        let token = scanner.next_token(true).unwrap();
        assert_eq!(token.end, 3);
        assert!(matches!(
            token.kind,
            TokenKind::Template(TemplateSegment {
                opening: Delimiter::InterpolationEnd,
                closing: Some(Delimiter::Backtick),
                ..
            })
        ));

        assert_eq!(kinds("}b`")[0], TokenKind::CloseBracket('}'));
    }

    #[test]
    fn test_escaped_interpolation_is_body_text() {
        let source = "`\\${x}`";
        assert_eq!(texts(source), [source]);
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(texts("a>>>b&&c"), ["a", ">>>", "b", "&&", "c"]);
        assert_eq!(kinds("a>>>b")[1], TokenKind::Operator);
    }

    #[test]
    fn test_comparison_and_assignment_operators() {
        assert_eq!(texts("a===b"), ["a", "===", "b"]);
        assert_eq!(texts("a>>>=b"), ["a", ">>>=", "b"]);
        assert_eq!(texts("a??=b"), ["a", "??=", "b"]);
        assert_eq!(texts("a<=b"), ["a", "<=", "b"]);
        assert_eq!(texts("f=>1,2"), ["f", "=>", "1", ",", "2"]);
        assert_eq!(kinds("!a")[0], TokenKind::Other);
        assert_eq!(kinds("a*b")[1], TokenKind::Other);
    }

    #[test]
    fn test_keyword_operators_need_word_boundaries() {
        assert_eq!(texts("k in o"), ["k", " ", "in", " ", "o"]);
        assert_eq!(texts("x instanceof Y"), ["x", " ", "instanceof", " ", "Y"]);
        assert_eq!(kinds("k in o")[2], TokenKind::Operator);

        let words = ["begin", "inner", "in_", "$in", "o.in", "instanceofs"];
        for word in words {
            assert!(
                !kinds(word).contains(&TokenKind::Operator),
                "{word} has no operator"
            );
        }
    }

    #[test]
    fn test_optional_chaining_is_not_an_operator() {
        assert_eq!(kinds("a?.b"), [
            TokenKind::Other,
            TokenKind::Other,
            TokenKind::Other
        ]);
        assert_eq!(kinds("a?.5:b")[1], TokenKind::Operator);
    }

    #[test]
    fn test_brackets_and_whitespace() {
        assert_eq!(kinds("( \t\n]"), [
            TokenKind::OpenBracket('('),
            TokenKind::Whitespace,
            TokenKind::CloseBracket(']'),
        ]);
    }

    #[test]
    fn test_multibyte_other_characters() {
        assert_eq!(texts("é'ü'"), ["é", "'ü'"]);
    }
}
