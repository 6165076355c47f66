use std::cell::Cell;

use chrono::NaiveDateTime;

use crate::color::Color;
use crate::fonts::Font;
use crate::geometry::{PageSize, Rect, contain, cover};
use crate::probe::ImageDescriptor;
use crate::surface::{Document, Surface};

use super::table::PageContinuation;

pub const MARGIN_LEFT: f32 = 50.0;
pub const MARGIN_RIGHT: f32 = 50.0;
/// Clears the header band plus a little air.
pub const MARGIN_TOP: f32 = 80.0;
pub const MARGIN_BOTTOM: f32 = 50.0;
pub const HEADER_HEIGHT: f32 = 48.0;

pub const SECTION_BLUE: Color = Color::rgb(0.2, 0.4, 0.8);
const BAND_FILL: Color = Color::rgb(0.98, 0.98, 0.98);
const COVER_FILL: Color = Color::rgb(0.1, 0.1, 0.1);
const WATERMARK_FADE: Color = Color::rgba(1.0, 1.0, 1.0, 0.8);
const WATERMARK_TEXT: Color = Color::rgba(1.0, 0.4, 0.4, 0.15);
const WATERMARK_TEXT_SIZE: f32 = 120.0;
const FOOTER_BASELINE: f32 = 25.0;

const HEADER_TIME_FORMAT: &str = "%b %d, %Y  %I:%M %p";

/// Per-page decoration: cover, watermark, header band, footer, outline.
pub struct PageChrome {
    title: String,
    brand: String,
    generated_at: NaiveDateTime,
    background: Option<ImageDescriptor>,
    warned: Cell<bool>,
}

impl PageChrome {
    pub fn new(
        title: impl Into<String>,
        brand: impl Into<String>,
        generated_at: NaiveDateTime,
        background: Option<ImageDescriptor>,
    ) -> Self {
        PageChrome {
            title: title.into(),
            brand: brand.into(),
            generated_at,
            background,
            warned: Cell::new(false),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Highest baseline body content may use.
    pub fn content_top(&self, page: PageSize) -> f32 {
        page.height - MARGIN_TOP
    }

    pub fn content_width(&self, page: PageSize) -> f32 {
        page.width - MARGIN_LEFT - MARGIN_RIGHT
    }

    /// Lowest y a table row may reach before spilling to the next page.
    pub fn bottom_limit(&self) -> f32 {
        MARGIN_BOTTOM
    }

    /// Place the background image, or report why it could not be used.
    fn place_background<S: Surface>(
        &self,
        doc: &mut Document<S>,
        fit: fn(Option<(u32, u32)>, Rect) -> Rect,
    ) -> bool {
        let Some(bg) = self.background.as_ref() else {
            return false;
        };
        if !bg.exists() {
            self.warn_once(&format!("background image {} not found", bg.path.display()));
            return false;
        }
        let rect = fit(bg.size, doc.page_size().rect());
        match doc.surface().draw_image(&bg.path, rect) {
            Ok(()) => true,
            Err(e) => {
                self.warn_once(&format!("could not place background image: {e}"));
                false
            }
        }
    }

    fn warn_once(&self, message: &str) {
        if self.warned.replace(true) {
            log::debug!("{message}");
        } else {
            log::warn!("{message}");
        }
    }

    /// First page: background letterboxed onto the page, or a dark fill.
    pub fn draw_cover<S: Surface>(&self, doc: &mut Document<S>) {
        if !self.place_background(doc, contain) {
            let page = doc.page_size().rect();
            doc.surface().fill_rect(page, COVER_FILL);
        }
    }

    /// Background covering the page under a white fade, or the brand name
    /// set large and faint across the middle.
    pub fn draw_watermark<S: Surface>(&self, doc: &mut Document<S>) {
        let page = doc.page_size();
        if self.place_background(doc, cover) {
            doc.surface().fill_rect(page.rect(), WATERMARK_FADE);
            return;
        }
        let surface = doc.surface();
        let width = surface.string_width(&self.brand, Font::HelveticaBold, WATERMARK_TEXT_SIZE);
        surface.draw_string(
            (page.width - width) / 2.0,
            page.height / 2.0 - 60.0,
            &self.brand,
            Font::HelveticaBold,
            WATERMARK_TEXT_SIZE,
            WATERMARK_TEXT,
        );
    }

    /// Header band with title and timestamp; footer with the page number.
    pub fn draw_header_footer<S: Surface>(&self, doc: &mut Document<S>) {
        let page = doc.page_size();
        let page_num = doc.page_number();
        let (w, h) = (page.width, page.height);
        let surface = doc.surface();

        surface.fill_rect(Rect::new(0.0, h - HEADER_HEIGHT, w, HEADER_HEIGHT), BAND_FILL);
        surface.line((0.0, h - HEADER_HEIGHT), (w, h - HEADER_HEIGHT), SECTION_BLUE, 2.0);
        surface.line(
            (MARGIN_LEFT, h - HEADER_HEIGHT - 2.0),
            (w - MARGIN_RIGHT, h - HEADER_HEIGHT - 2.0),
            Color::LIGHT_GREY,
            0.5,
        );

        surface.draw_string(
            MARGIN_LEFT,
            h - 30.0,
            &self.title,
            Font::HelveticaBold,
            12.0,
            Color::BLACK,
        );
        let stamp = self.generated_at.format(HEADER_TIME_FORMAT).to_string();
        let stamp_w = surface.string_width(&stamp, Font::Helvetica, 9.0);
        surface.draw_string(
            w - MARGIN_RIGHT - stamp_w,
            h - 30.0,
            &stamp,
            Font::Helvetica,
            9.0,
            Color::GREY,
        );

        let footer = format!("Page {page_num}");
        let footer_w = surface.string_width(&footer, Font::Helvetica, 9.0);
        surface.draw_string(
            (w - footer_w) / 2.0,
            FOOTER_BASELINE,
            &footer,
            Font::Helvetica,
            9.0,
            Color::GREY,
        );
    }

    /// Watermark then header/footer: everything a content page starts with.
    pub fn begin_page<S: Surface>(&self, doc: &mut Document<S>) {
        self.draw_watermark(doc);
        self.draw_header_footer(doc);
    }

    /// Named destination plus a top-level outline entry at the current page.
    pub fn register_section<S: Surface>(&self, doc: &mut Document<S>, key: &str, title: &str) {
        let surface = doc.surface();
        surface.bookmark(key);
        surface.add_outline_entry(title, key);
    }
}

/// Section heading in the report's accent color.
pub fn draw_heading<S: Surface>(doc: &mut Document<S>, text: &str, y: f32) {
    doc.surface()
        .draw_string(MARGIN_LEFT, y, text, Font::HelveticaBold, 14.0, SECTION_BLUE);
}

/// How a table resumes on a fresh page: chrome, the section title marked
/// "(continued)", and the table top at a fixed offset below the content top.
pub struct ContinuedSection<'a> {
    pub chrome: &'a PageChrome,
    pub title: &'a str,
    pub title_offset: f32,
    pub table_offset: f32,
}

impl<S: Surface> PageContinuation<S> for ContinuedSection<'_> {
    fn start_page(&mut self, doc: &mut Document<S>) -> f32 {
        self.chrome.begin_page(doc);
        let top = self.chrome.content_top(doc.page_size());
        draw_heading(doc, &format!("{} (continued)", self.title), top - self.title_offset);
        top - self.table_offset
    }
}
