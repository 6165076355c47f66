#![allow(dead_code)]

use std::path::Path;

use arka_report::layout::{Column, PageContinuation, Table};
use arka_report::surface::{Document, Op, RecordingSurface};
use chrono::{NaiveDate, NaiveDateTime};

pub fn init() {
    let _ = env_logger::try_init();
}

/// 2026-01-02 15:04:05, so headers and report ids are stable.
pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 2)
        .and_then(|d| d.and_hms_opt(15, 4, 5))
        .unwrap()
}

/// PNG signature plus an IHDR chunk; no pixel data.
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    out.extend_from_slice(&13u32.to_be_bytes());
    out.extend_from_slice(b"IHDR");
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&[8, 6, 0, 0, 0]);
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

/// SOI, an APP0 segment, fill bytes, then a three-channel start-of-frame.
pub fn jpeg_header(code: u8, width: u16, height: u16) -> Vec<u8> {
    jpeg_frame(code, width, height, 3)
}

/// Like [`jpeg_header`] with `components` colour channels in the frame.
pub fn jpeg_frame(code: u8, width: u16, height: u16, components: u8) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    out.extend_from_slice(b"JFIF\0");
    out.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
    let seg_len = 8 + 3 * components as u16;
    out.extend_from_slice(&[0xFF, 0xFF, 0xFF, code]);
    out.extend_from_slice(&seg_len.to_be_bytes());
    out.push(8);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.push(components);
    for id in 1..=components {
        out.extend_from_slice(&[id, 0x11, 0]);
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// A real, decodable RGBA PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 160, 200]));
    img.save(path).unwrap();
}

pub const SAMPLE_INPUT: &str = r#"{
  "scanner_version": "ARKA-SCAN-2.1",
  "serial_number": "SN-0042",
  "system_info": {
    "platform": "Windows",
    "release": "11",
    "version": "10.0.22631",
    "hostname": "WORKSTATION-7",
    "ip": "192.168.1.20"
  },
  "drives": [
    {
      "drive": "C:",
      "filesystem": "NTFS",
      "total_space_bytes": 512000000000,
      "used_space_bytes": "384000000000",
      "free_space_bytes": 128000000000.0,
      "total_space_human": "476.84 GB",
      "file_analysis": {
        "categories": {
          "Documents": {"count": 120, "size": 52428800},
          "Images": {"count": 64, "size": 1073741824},
          "Archives": {"count": null, "size": "2048"}
        }
      }
    },
    {
      "drive": "D:",
      "filesystem": "exFAT",
      "total_space_bytes": 256000000000,
      "used_space_bytes": 12800000000,
      "free_space_bytes": 243200000000
    }
  ],
  "deletion_report": {
    "items": [
      {"path": "C:/Users/me/Personal/tax.pdf", "size": 1024, "success": true, "category": "Personal"},
      {"path": "C:/Windows/Temp/cache.bin", "size": 2048, "success": true, "category": "System"},
      {"path": "C:/locked.db", "size": 4096, "success": false, "error": "Access denied"},
      {"name": "keys.txt", "size": 512, "category": "Sensitive Data"}
    ]
  }
}"#;

/// Plain table: one 100pt column per label, one text cell per row.
pub fn simple_table(header: Option<&[&str]>, rows: usize, row_height: f32) -> Table {
    let columns = vec![Column::new(100.0), Column::new(100.0)];
    let mut table = Table::new(50.0, columns, row_height);
    table.header = header.map(|h| h.iter().map(|s| s.to_string()).collect());
    table.header_style.height = 30.0;
    table.rows = (0..rows)
        .map(|i| vec![format!("r{i}"), format!("v{i}")])
        .collect();
    table
}

/// Continuation that restarts every page at a fixed y and counts its calls.
pub struct Restart {
    pub top: f32,
    pub calls: usize,
}

impl Restart {
    pub fn at(top: f32) -> Self {
        Restart { top, calls: 0 }
    }
}

impl PageContinuation<RecordingSurface> for Restart {
    fn start_page(&mut self, _doc: &mut Document<RecordingSurface>) -> f32 {
        self.calls += 1;
        self.top
    }
}

pub fn new_doc() -> Document<RecordingSurface> {
    Document::new(RecordingSurface::new(), arka_report::geometry::PageSize::A4)
}

/// Text strings on each page.
pub fn page_texts(surface: &RecordingSurface) -> Vec<Vec<String>> {
    surface
        .page_texts()
        .into_iter()
        .map(|p| p.into_iter().map(str::to_string).collect())
        .collect()
}

pub fn text_ops(ops: &[Op]) -> Vec<(f32, f32, String, f32)> {
    ops.iter()
        .filter_map(|op| match op {
            Op::Text { x, y, text, size, .. } => Some((*x, *y, text.clone(), *size)),
            _ => None,
        })
        .collect()
}
