use crate::color::Color;
use crate::geometry::Rect;
use crate::surface::{Document, Surface};

use super::cell::{Alignment, CellStyle, draw_cell};
use super::gradient::{DEFAULT_BANDS, draw_gradient};
use super::text::{MultilineStyle, draw_multiline};

/// Content-dependent restyling of one column's cells.
pub trait StylePolicy {
    fn apply(&self, text: &str, style: &mut CellStyle);
}

impl<F: Fn(&str, &mut CellStyle)> StylePolicy for F {
    fn apply(&self, text: &str, style: &mut CellStyle) {
        self(text, style)
    }
}

/// Opens the page a table continues on and returns the new table top.
pub trait PageContinuation<S: Surface> {
    fn start_page(&mut self, doc: &mut Document<S>) -> f32;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellContent {
    SingleLine,
    Multiline(MultilineStyle),
}

pub struct Column {
    pub width: f32,
    /// Body cell style; a `None` fill takes the row tint.
    pub style: CellStyle,
    pub content: CellContent,
    policy: Option<Box<dyn StylePolicy>>,
}

impl Column {
    pub fn new(width: f32) -> Self {
        Column {
            width,
            style: CellStyle::default(),
            content: CellContent::SingleLine,
            policy: None,
        }
    }

    pub fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    pub fn multiline(mut self, style: MultilineStyle) -> Self {
        self.content = CellContent::Multiline(style);
        self
    }

    pub fn policy(mut self, policy: impl StylePolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    fn resolve(&self, text: &str, tint: Color) -> CellStyle {
        let mut style = self.style;
        if style.fill.is_none() {
            style.fill = Some(tint);
        }
        if let Some(policy) = &self.policy {
            policy.apply(text, &mut style);
        }
        style
    }
}

pub struct HeaderStyle {
    pub height: f32,
    /// Bottom and top colors of the banded background.
    pub gradient: Option<(Color, Color)>,
    pub bands: usize,
    pub cell: CellStyle,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        HeaderStyle {
            height: 28.0,
            gradient: None,
            bands: DEFAULT_BANDS,
            cell: CellStyle::default()
                .with_text(10.0, Color::WHITE)
                .with_align(Alignment::Center)
                .bold(),
        }
    }
}

/// Outline (and optional drop shadow) around the part of a table on one page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableFrame {
    pub color: Color,
    pub width: f32,
    pub shadow: Option<(Color, f32)>,
}

pub struct Table {
    pub left: f32,
    pub columns: Vec<Column>,
    pub header: Option<Vec<String>>,
    pub header_style: HeaderStyle,
    pub rows: Vec<Vec<String>>,
    pub row_height: f32,
    /// Fill for even and odd body rows.
    pub row_tints: [Color; 2],
    pub frame: Option<TableFrame>,
}

impl Table {
    pub fn new(left: f32, columns: Vec<Column>, row_height: f32) -> Self {
        Table {
            left,
            columns,
            header: None,
            header_style: HeaderStyle::default(),
            rows: Vec::new(),
            row_height,
            row_tints: [Color::WHITE, Color::WHITE],
            frame: None,
        }
    }

    pub fn width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    fn header_height(&self) -> f32 {
        if self.header.is_some() {
            self.header_style.height
        } else {
            0.0
        }
    }
}

/// Where a table ended up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableRun {
    /// Bottom edge of the last thing drawn.
    pub cursor: f32,
    /// Pages the table touched, counting the one it started on.
    pub pages: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    RenderingHeader,
    RenderingRow(usize),
    PageOverflow(usize),
    Done,
}

/// Lays a [`Table`] out row by row, opening continuation pages whenever the
/// next row would cross `bottom_limit`. Rows are never split; the header is
/// drawn once at the top of every page the table occupies.
pub struct TablePaginator<'a> {
    table: &'a Table,
    bottom_limit: f32,
}

impl<'a> TablePaginator<'a> {
    pub fn new(table: &'a Table, bottom_limit: f32) -> Self {
        TablePaginator {
            table,
            bottom_limit,
        }
    }

    pub fn render<S, C>(&self, doc: &mut Document<S>, continuation: &mut C, top: f32) -> TableRun
    where
        S: Surface,
        C: PageContinuation<S>,
    {
        let table = self.table;
        let mut cursor = top;
        let mut segment_top = top;
        let mut resume_at = 0usize;
        // A fresh continuation page takes its first row even if it is too tall.
        let mut fresh_page = false;
        let mut pages = 1usize;
        let mut state = State::AwaitingHeader;

        loop {
            state = match state {
                State::AwaitingHeader => {
                    if table.header.is_some() {
                        State::RenderingHeader
                    } else {
                        State::RenderingRow(0)
                    }
                }
                State::RenderingHeader => {
                    if let Some(labels) = &table.header {
                        self.draw_header(doc, labels, cursor);
                        cursor -= table.header_height();
                    }
                    State::RenderingRow(resume_at)
                }
                State::RenderingRow(i) if i >= table.rows.len() => State::Done,
                State::RenderingRow(i) => {
                    if !fresh_page && cursor - table.row_height < self.bottom_limit {
                        State::PageOverflow(i)
                    } else {
                        self.draw_row(doc, i, cursor);
                        cursor -= table.row_height;
                        fresh_page = false;
                        State::RenderingRow(i + 1)
                    }
                }
                State::PageOverflow(i) => {
                    self.draw_frame(doc, segment_top, cursor);
                    doc.next_page();
                    pages += 1;
                    cursor = continuation.start_page(doc);
                    segment_top = cursor;
                    resume_at = i;
                    fresh_page = true;
                    log::debug!(
                        "TABLE overflow before row={} -> page {} top={:.2}",
                        i,
                        doc.page_number(),
                        cursor
                    );
                    if table.header.is_some() {
                        State::RenderingHeader
                    } else {
                        State::RenderingRow(i)
                    }
                }
                State::Done => {
                    self.draw_frame(doc, segment_top, cursor);
                    break;
                }
            };
        }

        TableRun { cursor, pages }
    }

    fn draw_header<S: Surface>(&self, doc: &mut Document<S>, labels: &[String], top: f32) {
        let table = self.table;
        let hs = &table.header_style;
        let surface = doc.surface();
        let band = Rect::new(table.left, top - hs.height, table.width(), hs.height);
        if let Some((start, end)) = hs.gradient {
            draw_gradient(surface, band, start, end, hs.bands);
        }
        let mut x = table.left;
        for (j, column) in table.columns.iter().enumerate() {
            let label = labels.get(j).map(String::as_str);
            let rect = Rect::new(x, band.y, column.width, hs.height);
            draw_cell(surface, rect, label, &hs.cell);
            x += column.width;
        }
    }

    fn draw_row<S: Surface>(&self, doc: &mut Document<S>, index: usize, top: f32) {
        let table = self.table;
        let row = &table.rows[index];
        if row.len() != table.columns.len() {
            log::debug!(
                "TABLE row={} has {} cells for {} columns",
                index,
                row.len(),
                table.columns.len()
            );
        }
        let tint = table.row_tints[index % 2];
        let y = top - table.row_height;
        let surface = doc.surface();

        let mut x = table.left;
        for (j, column) in table.columns.iter().enumerate() {
            let text = row.get(j).map(String::as_str).unwrap_or("");
            let rect = Rect::new(x, y, column.width, table.row_height);
            let style = column.resolve(text, tint);
            match &column.content {
                CellContent::SingleLine => draw_cell(surface, rect, Some(text), &style),
                CellContent::Multiline(ml) => {
                    draw_cell(surface, rect, None, &style);
                    draw_multiline(surface, rect, text, ml);
                }
            }
            x += column.width;
        }
    }

    fn draw_frame<S: Surface>(&self, doc: &mut Document<S>, top: f32, bottom: f32) {
        let Some(frame) = self.table.frame else {
            return;
        };
        if top - bottom <= 0.0 {
            return;
        }
        let rect = Rect::new(self.table.left, bottom, self.table.width(), top - bottom);
        let surface = doc.surface();
        if let Some((shadow, offset)) = frame.shadow {
            // Only the parts of the offset copy that stick out from under the table.
            surface.fill_rect(
                Rect::new(rect.right(), rect.y - offset, offset, rect.height),
                shadow,
            );
            surface.fill_rect(
                Rect::new(rect.x + offset, rect.y - offset, rect.width - offset, offset),
                shadow,
            );
        }
        surface.stroke_rect(rect, frame.color, frame.width);
    }
}
