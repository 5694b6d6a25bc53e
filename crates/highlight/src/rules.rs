use std::ops::Range;

use regex::Regex;
use thiserror::Error;

use crate::theme::{HighlightPalette, HighlightStyle};

pub const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "False", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "None",
    "nonlocal", "not", "or", "pass", "raise", "return", "True", "try", "while", "with", "yield",
];

pub const BUILTINS: &[&str] = &[
    "abs", "dict", "help", "min", "setattr", "all", "dir", "hex", "next", "slice", "any",
    "divmod", "id", "object", "sorted", "ascii", "enumerate", "input", "oct", "staticmethod",
    "bin", "eval", "int", "open", "str", "bool", "exec", "isinstance", "ord", "sum", "bytearray",
    "filter", "issubclass", "pow", "super", "bytes", "float", "iter", "print", "tuple",
    "callable", "format", "len", "property", "type", "chr", "frozenset", "list", "range", "vars",
    "classmethod", "getattr", "locals", "repr", "zip", "compile", "globals", "map", "reversed",
    "__import__",
];

const NUMBER_PATTERN: &str = r"\b[0-9]+\b";
const DOUBLE_QUOTED_PATTERN: &str = r#""[^"\n]*""#;
const SINGLE_QUOTED_PATTERN: &str = r"'[^'\n]*'";
const COMMENT_PATTERN: &str = r"#.*";
const FUNCTION_HEADER_PATTERN: &str = r"\bdef\b\s*\w+";
const CLASS_HEADER_PATTERN: &str = r"\bclass\b\s*\w+";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Keyword,
    Builtin,
    Number,
    String,
    Comment,
    Definition,
}

impl HighlightKind {
    pub fn name(self) -> &'static str {
        match self {
            HighlightKind::Keyword => "keyword",
            HighlightKind::Builtin => "builtin",
            HighlightKind::Number => "number",
            HighlightKind::String => "string",
            HighlightKind::Comment => "comment",
            HighlightKind::Definition => "definition",
        }
    }
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("{kind:?} rule failed to compile: {source}")]
    RegexCompilation {
        kind: HighlightKind,
        #[source]
        source: regex::Error,
    },
}

/// A single `(pattern, format)` entry of the rule table.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    kind: HighlightKind,
    regex: Regex,
    style: HighlightStyle,
}

impl HighlightRule {
    pub fn new(
        kind: HighlightKind,
        pattern: &str,
        style: HighlightStyle,
    ) -> Result<Self, HighlightError> {
        let regex =
            Regex::new(pattern).map_err(|source| HighlightError::RegexCompilation { kind, source })?;
        Ok(Self { kind, regex, style })
    }

    /// Builds a `\b(word|word|...)\b` rule from a fixed vocabulary.
    pub fn words(
        kind: HighlightKind,
        words: &[&str],
        style: HighlightStyle,
    ) -> Result<Self, HighlightError> {
        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(kind, &format!(r"\b(?:{alternation})\b"), style)
    }

    pub fn kind(&self) -> HighlightKind {
        self.kind
    }

    pub fn style(&self) -> HighlightStyle {
        self.style
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Formatted range in a line (or in a whole text for [`SyntaxHighlighter::highlight_text`]).
/// Offsets are UTF-8 byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub range: Range<usize>,
    pub kind: HighlightKind,
    pub style: HighlightStyle,
}

impl HighlightSpan {
    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Line-oriented highlighter over an ordered rule table.
///
/// Rules run in table order and every match overwrites whatever an earlier rule
/// assigned to the same bytes. Lines are independent: there is no state carried
/// from one line to the next, so multi-line strings and comments are not recognised.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    rules: Vec<HighlightRule>,
}

impl SyntaxHighlighter {
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self { rules }
    }

    /// The built-in Python table with the default dark palette.
    pub fn python() -> Self {
        Self::python_with_palette(&HighlightPalette::default())
            .expect("built-in highlight rules must compile")
    }

    pub fn python_with_palette(palette: &HighlightPalette) -> Result<Self, HighlightError> {
        let rules = vec![
            HighlightRule::words(HighlightKind::Keyword, KEYWORDS, palette.keyword)?,
            HighlightRule::words(HighlightKind::Builtin, BUILTINS, palette.builtin)?,
            HighlightRule::new(HighlightKind::Number, NUMBER_PATTERN, palette.number)?,
            HighlightRule::new(HighlightKind::String, DOUBLE_QUOTED_PATTERN, palette.string)?,
            HighlightRule::new(HighlightKind::String, SINGLE_QUOTED_PATTERN, palette.string)?,
            HighlightRule::new(HighlightKind::Comment, COMMENT_PATTERN, palette.comment)?,
            HighlightRule::new(
                HighlightKind::Definition,
                FUNCTION_HEADER_PATTERN,
                palette.definition,
            )?,
            HighlightRule::new(
                HighlightKind::Definition,
                CLASS_HEADER_PATTERN,
                palette.definition,
            )?,
        ];
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[HighlightRule] {
        &self.rules
    }

    /// Raw matches of every rule, in table order, before overwriting is resolved.
    pub fn matches(&self, line: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            for found in rule.regex.find_iter(line) {
                spans.push(HighlightSpan {
                    range: found.range(),
                    kind: rule.kind,
                    style: rule.style,
                });
            }
        }
        spans
    }

    /// Resolves the final formatting of one line into maximal, sorted,
    /// non-overlapping spans.
    pub fn highlight_line(&self, line: &str) -> Vec<HighlightSpan> {
        if line.is_empty() {
            return Vec::new();
        }

        let mut owners: Vec<Option<usize>> = vec![None; line.len()];
        for (index, rule) in self.rules.iter().enumerate() {
            for found in rule.regex.find_iter(line) {
                for owner in &mut owners[found.range()] {
                    *owner = Some(index);
                }
            }
        }

        let mut spans = Vec::new();
        let mut cursor = 0;
        while cursor < owners.len() {
            let Some(index) = owners[cursor] else {
                cursor += 1;
                continue;
            };
            let start = cursor;
            while cursor < owners.len() && owners[cursor] == Some(index) {
                cursor += 1;
            }
            let rule = &self.rules[index];
            spans.push(HighlightSpan {
                range: start..cursor,
                kind: rule.kind,
                style: rule.style,
            });
        }
        spans
    }

    /// Highlights every `\n`-separated line on its own and returns spans with
    /// offsets relative to the start of `text`.
    pub fn highlight_text(&self, text: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            spans.extend(self.highlight_line(line).into_iter().map(|span| HighlightSpan {
                range: span.range.start + offset..span.range.end + offset,
                ..span
            }));
            offset += line.len();
            offset += if text[offset..].starts_with("\r\n") {
                2
            } else {
                1
            };
        }
        spans
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::python()
    }
}
