//! Quote style conversion for JavaScript and TypeScript string literals.
//!
//! This library finds string literals in source text, including template
//! literals with arbitrarily nested interpolations, and converts them between
//! single-quoted, double-quoted and template form.

mod commands;
mod config;
mod error;
mod parse;
mod transform;

pub use commands::{
    Command, find_active_fragments, find_active_target, offset_at, switch_to_normal,
    switch_to_template, toggle_quotes,
};
pub use config::{Config, ConfigError, QuoteStyle};
pub use error::{ConvertError, DeclineReason};
pub use parse::{
    Delimiter, ParseDiagnostic, Parsed, Position, PositionIndex, Range, StringBodyTarget,
    StringGroupTarget, StringKind, StringTarget, debug_targets, for_each_body, parse,
};
pub use transform::{Edit, apply_edits, build_concatenation_edits, transform, wrap};
