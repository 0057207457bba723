//! Recoverable problems found while parsing.

use miette::Diagnostic;
use thiserror::Error;

use super::position::Position;
use super::target::StringKind;

/// A problem in the source that the parser worked around.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseDiagnostic {
    /// A closing bracket inside an interpolation with no matching opener.
    #[error("{position}: mismatched closing bracket `{bracket}`")]
    #[diagnostic(
        code(esquotes::mismatched_bracket),
        help("the bracket was ignored; interpolation boundaries after it may be wrong")
    )]
    MismatchedBracket { bracket: char, position: Position },

    /// A literal that reached a line break or end of input before its closing delimiter.
    #[error("{position}: unterminated {kind} string")]
    #[diagnostic(
        code(esquotes::unterminated_literal),
        help("the literal is treated as ending here and cannot be converted")
    )]
    UnterminatedLiteral { kind: StringKind, position: Position },
}
