use crate::color::Color;
use crate::fonts::Font;
use crate::geometry::Rect;
use crate::surface::Surface;

use super::text::truncate_to_width;

/// Horizontal inset of cell text from the border.
pub const CELL_PADDING: f32 = 5.0;
/// Lift applied on top of `(height - font_size) / 2` so glyphs look centered.
const BASELINE_NUDGE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How one cell is painted. Every field has a default, so callers override
/// only what differs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    pub fill: Option<Color>,
    pub border_color: Color,
    pub border_width: f32,
    pub font_size: f32,
    pub text_color: Color,
    pub align: Alignment,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            fill: None,
            border_color: Color::BLACK,
            border_width: 0.5,
            font_size: 10.0,
            text_color: Color::BLACK,
            align: Alignment::Left,
            bold: false,
        }
    }
}

impl CellStyle {
    pub fn font(&self) -> Font {
        Font::regular_or_bold(self.bold)
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_border(mut self, color: Color, width: f32) -> Self {
        self.border_color = color;
        self.border_width = width;
        self
    }

    pub fn with_text(mut self, size: f32, color: Color) -> Self {
        self.font_size = size;
        self.text_color = color;
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Paint one cell: optional fill, border, then a single line of text.
/// Text wider than the padded cell is cut back with an ellipsis.
pub fn draw_cell(surface: &mut impl Surface, rect: Rect, text: Option<&str>, style: &CellStyle) {
    if let Some(fill) = style.fill {
        surface.fill_rect(rect, fill);
    }
    surface.stroke_rect(rect, style.border_color, style.border_width);

    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return;
    };
    let font = style.font();
    let max_width = (rect.width - 2.0 * CELL_PADDING).max(0.0);
    let line = truncate_to_width(&*surface, text, font, style.font_size, max_width);
    if line.is_empty() {
        return;
    }

    let text_width = surface.string_width(&line, font, style.font_size);
    let x = match style.align {
        Alignment::Left => rect.x + CELL_PADDING,
        Alignment::Center => rect.x + (rect.width - text_width) / 2.0,
        Alignment::Right => rect.right() - text_width - CELL_PADDING,
    };
    let y = rect.y + (rect.height - style.font_size) / 2.0 + BASELINE_NUDGE;
    surface.draw_string(x, y, &line, font, style.font_size, style.text_color);
}
