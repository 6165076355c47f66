mod xobject;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pdf_writer::types::PageMode;
use pdf_writer::{Content, Filter, Name, Pdf, Rect as PdfRect, Ref, Str, TextStr};

use crate::color::Color;
use crate::error::Error;
use crate::fonts::{Font, to_winansi_bytes};
use crate::geometry::{PageSize, Rect};
use crate::surface::Surface;

use xobject::embed_image;

/// [`Surface`] backed by `pdf-writer`. Pages are kept as content streams
/// until [`PdfSurface::finish`] assembles the file.
pub struct PdfSurface {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    font_refs: Vec<(Font, Ref)>,
    page_size: PageSize,
    pages: Vec<Content>,
    current: Content,
    current_dirty: bool,
    /// Embedded images by source path; `None` remembers a failed embed.
    images: HashMap<PathBuf, Option<String>>,
    image_xobjects: Vec<(String, Ref)>,
    /// Translucency states keyed by alpha in thousandths.
    alpha_states: HashMap<u16, String>,
    ext_g_states: Vec<(String, Ref)>,
    /// Named destinations: key and page index.
    bookmarks: Vec<(String, usize)>,
    outline: Vec<(String, String)>,
}

impl PdfSurface {
    pub fn new(page_size: PageSize) -> Self {
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let font_refs: Vec<(Font, Ref)> = Font::ALL.iter().map(|&f| (f, alloc())).collect();
        for (font, font_ref) in &font_refs {
            pdf.type1_font(*font_ref)
                .base_font(Name(font.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        PdfSurface {
            pdf,
            next_id,
            catalog_id,
            pages_id,
            font_refs,
            page_size,
            pages: Vec::new(),
            current: Content::new(),
            current_dirty: false,
            images: HashMap::new(),
            image_xobjects: Vec::new(),
            alpha_states: HashMap::new(),
            ext_g_states: Vec::new(),
            bookmarks: Vec::new(),
            outline: Vec::new(),
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    /// Resource name of the graphics state applying `alpha` to fills and strokes.
    fn alpha_state(&mut self, alpha: f32) -> String {
        let key = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u16;
        if let Some(name) = self.alpha_states.get(&key) {
            return name.clone();
        }
        let gs_ref = self.alloc();
        let name = format!("GS{}", self.ext_g_states.len() + 1);
        let a = key as f32 / 1000.0;
        self.pdf
            .ext_graphics(gs_ref)
            .non_stroking_alpha(a)
            .stroking_alpha(a);
        self.ext_g_states.push((name.clone(), gs_ref));
        self.alpha_states.insert(key, name.clone());
        name
    }

    /// Open a graphics-state scope for drawing in `color`.
    fn begin(&mut self, color: Color) {
        let gs = (!color.is_opaque()).then(|| self.alpha_state(color.a));
        self.current_dirty = true;
        self.current.save_state();
        if let Some(gs) = gs {
            self.current.set_parameters(Name(gs.as_bytes()));
        }
    }

    fn image_name(&mut self, path: &Path) -> Result<String, Error> {
        if let Some(cached) = self.images.get(path) {
            return cached
                .clone()
                .ok_or_else(|| Error::Image(format!("{}: could not be embedded", path.display())));
        }

        let embedded = std::fs::read(path)
            .map_err(|e| Error::Image(format!("{}: {e}", path.display())))
            .and_then(|data| {
                let next_id = &mut self.next_id;
                let mut alloc = || {
                    let r = Ref::new(*next_id);
                    *next_id += 1;
                    r
                };
                embed_image(&mut self.pdf, &mut alloc, &data)
            });

        match embedded {
            Ok(xobj_ref) => {
                let name = format!("Im{}", self.image_xobjects.len() + 1);
                log::debug!("embedded {} as /{name}", path.display());
                self.image_xobjects.push((name.clone(), xobj_ref));
                self.images.insert(path.to_path_buf(), Some(name.clone()));
                Ok(name)
            }
            Err(e) => {
                self.images.insert(path.to_path_buf(), None);
                Err(e)
            }
        }
    }

    /// Assemble the file. The open page becomes the last page unless nothing
    /// was drawn on it.
    pub fn finish(mut self) -> Vec<u8> {
        let t0 = std::time::Instant::now();
        if self.current_dirty || self.pages.is_empty() {
            let last = std::mem::replace(&mut self.current, Content::new());
            self.pages.push(last);
        }

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let outline_id = self.alloc();
        let item_ids: Vec<Ref> = (0..self.outline.len()).map(|_| self.alloc()).collect();

        let mut bookmarks = std::mem::take(&mut self.bookmarks);
        bookmarks.sort_by(|a, b| a.0.cmp(&b.0));
        let dest_ids: Vec<Ref> = (0..bookmarks.len()).map(|_| self.alloc()).collect();

        let pdf = &mut self.pdf;
        let top = self.page_size.height;

        for (i, c) in std::mem::take(&mut self.pages).into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        }

        let page_of = |key: &str| {
            bookmarks
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, idx)| (*idx).min(n - 1))
                .unwrap_or(0)
        };

        for ((key, _), dest_id) in bookmarks.iter().zip(&dest_ids) {
            pdf.destination(*dest_id)
                .page(page_ids[page_of(key)])
                .xyz(0.0, top, None);
        }

        if !self.outline.is_empty() {
            pdf.outline(outline_id)
                .first(item_ids[0])
                .last(item_ids[item_ids.len() - 1])
                .count(item_ids.len() as i32);
            for (i, (title, key)) in self.outline.iter().enumerate() {
                let mut item = pdf.outline_item(item_ids[i]);
                item.title(TextStr(title.as_str())).parent(outline_id);
                if i > 0 {
                    item.prev(item_ids[i - 1]);
                }
                if i + 1 < item_ids.len() {
                    item.next(item_ids[i + 1]);
                }
                item.dest().page(page_ids[page_of(key)]).xyz(0.0, top, None);
            }
        }

        {
            let mut catalog = pdf.catalog(self.catalog_id);
            catalog.pages(self.pages_id);
            if !self.outline.is_empty() {
                catalog.outlines(outline_id);
                catalog.page_mode(PageMode::UseOutlines);
            }
            if !bookmarks.is_empty() {
                let mut names = catalog.names();
                let mut tree = names.destinations();
                let mut entries = tree.names();
                for ((key, _), dest_id) in bookmarks.iter().zip(&dest_ids) {
                    entries.insert(Str(key.as_bytes()), *dest_id);
                }
            }
        }

        pdf.pages(self.pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(PdfRect::new(0.0, 0.0, self.page_size.width, self.page_size.height))
                .parent(self.pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for (font, font_ref) in &self.font_refs {
                    fonts.pair(Name(font.resource_name().as_bytes()), *font_ref);
                }
            }
            if !self.image_xobjects.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &self.image_xobjects {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
            if !self.ext_g_states.is_empty() {
                let mut states = resources.ext_g_states();
                for (name, gs_ref) in &self.ext_g_states {
                    states.pair(Name(name.as_bytes()), *gs_ref);
                }
            }
        }

        log::debug!(
            "assembled {n} pages, {} images, {} outline entries in {:.1}ms",
            self.image_xobjects.len(),
            self.outline.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );

        self.pdf.finish()
    }

    /// Finish the document and write it to `path`. Returns the byte count.
    pub fn save(self, path: &Path) -> Result<usize, Error> {
        let bytes = self.finish();
        let with_path = |e: std::io::Error| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        };
        let file = File::create(path).map_err(with_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes).map_err(with_path)?;
        writer.flush().map_err(with_path)?;
        Ok(bytes.len())
    }
}

impl Surface for PdfSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.begin(color);
        self.current.set_fill_rgb(color.r, color.g, color.b);
        self.current.rect(rect.x, rect.y, rect.width, rect.height);
        self.current.fill_nonzero();
        self.current.restore_state();
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.begin(color);
        self.current.set_stroke_rgb(color.r, color.g, color.b);
        self.current.set_line_width(width);
        self.current.rect(rect.x, rect.y, rect.width, rect.height);
        self.current.stroke();
        self.current.restore_state();
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        self.begin(color);
        self.current.set_stroke_rgb(color.r, color.g, color.b);
        self.current.set_line_width(width);
        self.current.move_to(from.0, from.1);
        self.current.line_to(to.0, to.1);
        self.current.stroke();
        self.current.restore_state();
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, font: Font, size: f32, color: Color) {
        let bytes = to_winansi_bytes(text);
        self.begin(color);
        self.current.set_fill_rgb(color.r, color.g, color.b);
        self.current.begin_text();
        self.current.set_font(Name(font.resource_name().as_bytes()), size);
        self.current.next_line(x, y);
        self.current.show(Str(&bytes));
        self.current.end_text();
        self.current.restore_state();
    }

    fn draw_image(&mut self, path: &Path, rect: Rect) -> Result<(), Error> {
        let name = self.image_name(path)?;
        self.current_dirty = true;
        self.current.save_state();
        self.current
            .transform([rect.width, 0.0, 0.0, rect.height, rect.x, rect.y]);
        self.current.x_object(Name(name.as_bytes()));
        self.current.restore_state();
        Ok(())
    }

    fn show_page(&mut self) {
        let sealed = std::mem::replace(&mut self.current, Content::new());
        self.pages.push(sealed);
        self.current_dirty = false;
    }

    fn bookmark(&mut self, key: &str) {
        let page = self.pages.len();
        self.bookmarks.retain(|(k, _)| k != key);
        self.bookmarks.push((key.to_string(), page));
    }

    fn add_outline_entry(&mut self, title: &str, key: &str) {
        self.outline.push((title.to_string(), key.to_string()));
    }
}
