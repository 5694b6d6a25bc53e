use eframe::egui::text::LayoutJob;
use eframe::egui::{Color32, FontId, TextFormat};
use prism_highlight::{Color, HighlightStyle, SyntaxHighlighter};

pub const EDITOR_FONT_SIZE: f32 = 14.0;

fn color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn plain_format(default_color: Color32) -> TextFormat {
    TextFormat {
        font_id: FontId::monospace(EDITOR_FONT_SIZE),
        color: default_color,
        ..Default::default()
    }
}

fn span_format(style: HighlightStyle) -> TextFormat {
    // default egui fonts ship no bold face; bold spans keep color only
    TextFormat {
        font_id: FontId::monospace(EDITOR_FONT_SIZE),
        color: color32(style.foreground),
        italics: style.italic,
        ..Default::default()
    }
}

/// 將語法標示範圍轉成 egui 排版工作。 / Turns highlight spans into an egui layout job.
pub fn layout_job(highlighter: &SyntaxHighlighter, text: &str, default_color: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    let mut cursor = 0;
    for span in highlighter.highlight_text(text) {
        if span.range.start > cursor {
            job.append(&text[cursor..span.range.start], 0.0, plain_format(default_color));
        }
        job.append(&text[span.range.clone()], 0.0, span_format(span.style));
        cursor = span.range.end;
    }
    if cursor < text.len() {
        job.append(&text[cursor..], 0.0, plain_format(default_color));
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_covers_the_whole_text_in_order() {
        let highlighter = SyntaxHighlighter::python();
        let text = "def f():\n    return 1  # done\n";
        let job = layout_job(&highlighter, text, Color32::WHITE);
        assert_eq!(job.text, text);

        let mut expected_start = 0;
        for section in &job.sections {
            assert_eq!(section.byte_range.start, expected_start);
            expected_start = section.byte_range.end;
        }
        assert_eq!(expected_start, text.len());
    }

    #[test]
    fn comment_section_is_italic() {
        let highlighter = SyntaxHighlighter::python();
        let text = "x = 1 # note";
        let job = layout_job(&highlighter, text, Color32::WHITE);
        let comment = job
            .sections
            .iter()
            .find(|section| &text[section.byte_range.clone()] == "# note")
            .unwrap();
        assert!(comment.format.italics);
        assert_eq!(comment.format.color, Color32::from_rgb(0x6A, 0x99, 0x55));
    }
}
