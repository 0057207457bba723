//! Body rewriting between quote kinds.
//!
//! Each function walks the body once. Escape sequences are kept verbatim
//! unless the rule for the pair says otherwise.

/// Spellings of an escaped `${` inside a template body.
const ESCAPED_INTERPOLATION: [&str; 3] = ["\\$\\{", "\\${", "$\\{"];

/// Single to double, or double to single.
///
/// An escaped `from` quote loses its backslash; a bare `to` quote gains one.
pub fn swap_quotes(body: &str, from: char, to: char) -> String {
    let mut output = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) if next == from => output.push(from),
                Some(next) => {
                    output.push('\\');
                    output.push(next);
                }
                None => output.push('\\'),
            },
            c if c == to => {
                output.push('\\');
                output.push(to);
            }
            c => output.push(c),
        }
    }

    output
}

/// Normal string body to template body.
pub fn normal_to_template(body: &str) -> String {
    let mut output = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if let Some(terminator) = rest.strip_prefix("\\n\\").and_then(line_terminator) {
            // `\n\` + newline is how normal strings span lines.
            output.push_str(terminator);
            rest = &rest[3 + terminator.len()..];
            continue;
        }

        match c {
            '\\' => {
                let escaped = escape_len(&rest[1..]);
                match &rest[1..=escaped] {
                    quote @ ("'" | "\"") => output.push_str(quote),
                    _ => output.push_str(&rest[..=escaped]),
                }
                rest = &rest[1 + escaped..];
            }
            '`' => {
                output.push_str("\\`");
                rest = &rest[1..];
            }
            '$' if rest[1..].starts_with('{') => {
                output.push_str("\\${");
                rest = &rest[2..];
            }
            c => {
                output.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    output
}

/// Template body to a normal body quoted with `quote`.
pub fn template_to_normal(body: &str, quote: char) -> String {
    let mut output = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("\\`") {
            output.push('`');
            rest = after;
            continue;
        }
        if let Some(after) = ESCAPED_INTERPOLATION
            .iter()
            .find_map(|spelling| rest.strip_prefix(spelling))
        {
            output.push_str("${");
            rest = after;
            continue;
        }
        if let Some(terminator) = line_terminator(rest) {
            output.push_str("\\n\\");
            output.push_str(terminator);
            rest = &rest[terminator.len()..];
            continue;
        }

        match c {
            '\\' => {
                let escaped = escape_len(&rest[1..]);
                output.push_str(&rest[..=escaped]);
                rest = &rest[1 + escaped..];
            }
            '"' | '\'' => {
                if c == quote {
                    output.push('\\');
                }
                output.push(c);
                rest = &rest[1..];
            }
            c => {
                output.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    output
}

/// The `\r\n`, `\n` or lone `\r` at the start of `text`.
fn line_terminator(text: &str) -> Option<&str> {
    if text.starts_with("\r\n") {
        Some(&text[..2])
    } else if text.starts_with(['\n', '\r']) {
        Some(&text[..1])
    } else {
        None
    }
}

/// Byte length of what a backslash escapes at the start of `text`.
fn escape_len(text: &str) -> usize {
    if text.starts_with("\r\n") {
        2
    } else {
        text.chars().next().map_or(0, char::len_utf8)
    }
}
