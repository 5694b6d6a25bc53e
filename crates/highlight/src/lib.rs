//! Regex rule table and line highlighter for the Prism editor.

mod rules;
mod theme;

pub use rules::{
    HighlightError, HighlightKind, HighlightRule, HighlightSpan, SyntaxHighlighter, BUILTINS,
    KEYWORDS,
};
pub use theme::{Color, HighlightPalette, HighlightStyle};
