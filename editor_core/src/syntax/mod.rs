//! Syntax highlighting module.
//!
//! Provides per-row lexing driven by a small keyword/comment description of
//! each file type.

mod highlighter;
mod language;
mod theme;

pub use highlighter::{highlight_row, is_separator};
pub use language::{HighlightFlags, Keyword, KeywordClass, Syntax, SYNTAXES};
pub use theme::{AnsiColor, Highlight};
