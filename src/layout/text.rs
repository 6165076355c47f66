use crate::color::Color;
use crate::fonts::Font;
use crate::geometry::Rect;
use crate::surface::Surface;

pub const ELLIPSIS: &str = "...";

/// Shorten `text` until it measures at most `max_width`.
///
/// The result is the longest prefix that still fits with `...` appended. A
/// string too narrow for even the ellipsis is trimmed character by
/// character, possibly to nothing.
pub fn truncate_to_width(
    surface: &impl Surface,
    text: &str,
    font: Font,
    size: f32,
    max_width: f32,
) -> String {
    let fits = |s: &str| surface.string_width(s, font, size) <= max_width;
    if fits(text) {
        return text.to_string();
    }

    // Byte offsets where each candidate prefix ends; widths grow with the
    // prefix, so the fitting candidates form a leading run.
    let ends: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let elided = |end: usize| format!("{}{ELLIPSIS}", &text[..end]);
    let mut line = if ends.len() > 3 {
        let candidates = &ends[..ends.len() - 3];
        let fitting = candidates.partition_point(|&end| fits(&elided(end)));
        elided(candidates[fitting.saturating_sub(1)])
    } else {
        text.to_string()
    };
    while !line.is_empty() && !fits(&line) {
        line.pop();
    }
    line
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultilineStyle {
    pub font: Font,
    pub font_size: f32,
    pub text_color: Color,
    /// Baseline-to-baseline distance.
    pub line_spacing: f32,
    pub padding: f32,
}

impl Default for MultilineStyle {
    fn default() -> Self {
        MultilineStyle {
            font: Font::Helvetica,
            font_size: 8.0,
            text_color: Color::BLACK,
            line_spacing: 12.0,
            padding: 5.0,
        }
    }
}

/// Flow `text` top-down inside `rect`, one line per `\n`.
///
/// Lines whose baseline would sit at or below `rect.y + padding` are dropped;
/// each remaining line is truncated to the padded width. Returns the number
/// of lines drawn.
pub fn draw_multiline(
    surface: &mut impl Surface,
    rect: Rect,
    text: &str,
    style: &MultilineStyle,
) -> usize {
    let start_y = rect.top() - style.padding - style.font_size;
    let floor = rect.y + style.padding;
    let max_width = (rect.width - 2.0 * style.padding).max(0.0);

    let mut drawn = 0;
    for (i, line) in text.split('\n').enumerate() {
        let y = start_y - i as f32 * style.line_spacing;
        if y <= floor {
            break;
        }
        let line = line.trim_end_matches('\r');
        let fitted = truncate_to_width(&*surface, line, style.font, style.font_size, max_width);
        if fitted.is_empty() {
            continue;
        }
        surface.draw_string(
            rect.x + style.padding,
            y,
            &fitted,
            style.font,
            style.font_size,
            style.text_color,
        );
        drawn += 1;
    }
    drawn
}
