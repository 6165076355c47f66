//! The drawing surface the layout code renders onto, and the [`Document`]
//! that owns one and tracks the running page number.

use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::error::Error;
use crate::fonts::Font;
use crate::geometry::{PageSize, Rect};

/// Primitive drawing operations. Coordinates are PDF points, origin at the
/// bottom-left corner of the page.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32);
    /// Draw `text` with its baseline starting at `(x, y)`.
    fn draw_string(&mut self, x: f32, y: f32, text: &str, font: Font, size: f32, color: Color);
    /// Place the image at `path` stretched to `rect`.
    fn draw_image(&mut self, path: &Path, rect: Rect) -> Result<(), Error>;
    /// Seal the current page and start a fresh one.
    fn show_page(&mut self);
    /// Register a named destination pointing at the current page.
    fn bookmark(&mut self, key: &str);
    /// Append a top-level outline entry targeting the destination `key`.
    fn add_outline_entry(&mut self, title: &str, key: &str);

    fn string_width(&self, text: &str, font: Font, size: f32) -> f32 {
        font.string_width(text, size)
    }
}

/// A document under construction: one surface plus the 1-based number of the
/// page currently being drawn.
pub struct Document<S: Surface> {
    surface: S,
    page_size: PageSize,
    page_count: usize,
}

impl<S: Surface> Document<S> {
    pub fn new(surface: S, page_size: PageSize) -> Self {
        Document {
            surface,
            page_size,
            page_count: 1,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Number of the page currently open.
    pub fn page_number(&self) -> usize {
        self.page_count
    }

    pub fn surface(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Seal the current page and open the next one.
    pub fn next_page(&mut self) {
        self.surface.show_page();
        self.page_count += 1;
        log::debug!("page {} opened", self.page_count);
    }

    /// Hand back the surface; the open page is the last one.
    pub fn finish(self) -> S {
        self.surface
    }
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
        color: Color,
    },
    Image {
        path: PathBuf,
        rect: Rect,
    },
    ShowPage,
    Bookmark(String),
    Outline {
        title: String,
        key: String,
    },
}

/// Surface that keeps every call in order instead of producing a file.
/// Images are accepted only when the file exists.
#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface::default()
    }

    /// Operations grouped per page.
    pub fn pages(&self) -> Vec<&[Op]> {
        self.ops.split(|op| *op == Op::ShowPage).collect()
    }

    /// Text drawn on each page, in drawing order.
    pub fn page_texts(&self) -> Vec<Vec<&str>> {
        self.pages()
            .into_iter()
            .map(|ops| {
                ops.iter()
                    .filter_map(|op| match op {
                        Op::Text { text, .. } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(Op::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.ops.push(Op::StrokeRect { rect, color, width });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        self.ops.push(Op::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, font: Font, size: f32, color: Color) {
        self.ops.push(Op::Text {
            x,
            y,
            text: text.to_string(),
            font,
            size,
            color,
        });
    }

    fn draw_image(&mut self, path: &Path, rect: Rect) -> Result<(), Error> {
        if !path.is_file() {
            return Err(Error::Image(format!("{}: not found", path.display())));
        }
        self.ops.push(Op::Image {
            path: path.to_path_buf(),
            rect,
        });
        Ok(())
    }

    fn show_page(&mut self) {
        self.ops.push(Op::ShowPage);
    }

    fn bookmark(&mut self, key: &str) {
        self.ops.push(Op::Bookmark(key.to_string()));
    }

    fn add_outline_entry(&mut self, title: &str, key: &str) {
        self.ops.push(Op::Outline {
            title: title.to_string(),
            key: key.to_string(),
        });
    }
}
