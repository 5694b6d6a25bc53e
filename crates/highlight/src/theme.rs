use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Foreground color plus font flags applied to a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightStyle {
    pub foreground: Color,
    pub bold: bool,
    pub italic: bool,
}

impl HighlightStyle {
    pub const fn plain(foreground: Color) -> Self {
        Self {
            foreground,
            bold: false,
            italic: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Dark palette used by the built-in rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPalette {
    pub keyword: HighlightStyle,
    pub builtin: HighlightStyle,
    pub number: HighlightStyle,
    pub string: HighlightStyle,
    pub comment: HighlightStyle,
    pub definition: HighlightStyle,
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self {
            keyword: HighlightStyle::plain(Color::rgb(0x9C, 0xDC, 0xFE)).bold(),
            builtin: HighlightStyle::plain(Color::rgb(0xC5, 0x86, 0xC0)),
            number: HighlightStyle::plain(Color::rgb(0xB5, 0xCE, 0xA8)),
            string: HighlightStyle::plain(Color::rgb(0xCE, 0x91, 0x78)),
            comment: HighlightStyle::plain(Color::rgb(0x6A, 0x99, 0x55)).italic(),
            definition: HighlightStyle::plain(Color::rgb(0xDC, 0xDC, 0xAA)).bold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_print_as_uppercase_hex() {
        assert_eq!(Color::rgb(0x9c, 0xdc, 0xfe).to_string(), "#9CDCFE");
        assert_eq!(Color::rgb(0, 0x0a, 0xff).to_string(), "#000AFF");
    }

    #[test]
    fn default_palette_marks_keywords_bold_and_comments_italic() {
        let palette = HighlightPalette::default();
        assert!(palette.keyword.bold);
        assert!(palette.comment.italic);
        assert!(!palette.number.bold);
        assert_eq!(palette.definition.foreground.to_string(), "#DCDCAA");
    }
}
