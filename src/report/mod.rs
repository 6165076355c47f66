//! Sequencing of the report: cover, then one section after another, each on
//! the page layout it needs.

mod sections;
pub mod stats;

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::input::ReportInput;
use crate::layout::PageChrome;
use crate::probe::ImageDescriptor;
use crate::surface::{Document, Surface};

pub use stats::{DeletionRow, DeletionSummary, human_bytes};

/// Knobs of one report run. Everything not set here comes from the input.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub title: String,
    pub brand: String,
    /// Cover and watermark image.
    pub background: PathBuf,
    /// Timestamp printed in headers and the report id.
    pub generated_at: NaiveDateTime,
    /// Render at most this many deletion log rows.
    pub deletion_row_limit: Option<usize>,
    pub gradient_bands: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            title: "Arka Drive Analysis Report".to_string(),
            brand: "Arka".to_string(),
            background: PathBuf::from("bg.png"),
            generated_at: chrono::Local::now().naive_local(),
            deletion_row_limit: None,
            gradient_bands: crate::layout::gradient::DEFAULT_BANDS,
        }
    }
}

/// What a section builder needs besides the document.
pub(crate) struct Context<'a> {
    pub chrome: &'a PageChrome,
    pub input: &'a ReportInput,
    pub options: &'a ReportOptions,
}

pub const SEC_DEVICE_INFO: &str = "sec_device_info";
pub const SEC_SYSTEM_OVERVIEW: &str = "sec_system_overview";
pub const SEC_DRIVE_DETAILS: &str = "sec_drive_details";
pub const SEC_DELETION_LOG: &str = "sec_deletion_log";
pub const SEC_SUMMARY: &str = "sec_summary";

/// Draw the whole report into `doc`, starting on its current (first) page.
/// The last page is left open for the caller to finish.
pub fn assemble<S: Surface>(
    doc: &mut Document<S>,
    input: &ReportInput,
    options: &ReportOptions,
) -> DeletionSummary {
    let background = ImageDescriptor::probe(options.background.clone());
    let chrome = PageChrome::new(
        options.title.as_str(),
        options.brand.as_str(),
        options.generated_at,
        Some(background),
    );
    let ctx = Context {
        chrome: &chrome,
        input,
        options,
    };

    chrome.draw_cover(doc);

    doc.next_page();
    chrome.begin_page(doc);
    let top = chrome.content_top(doc.page_size());
    chrome.register_section(doc, SEC_DEVICE_INFO, "1. Device & Report Information");
    let y = sections::device_info(doc, &ctx, top);
    chrome.register_section(doc, SEC_SYSTEM_OVERVIEW, "2. System Overview");
    sections::system_overview(doc, &ctx, y - 20.0);

    doc.next_page();
    chrome.begin_page(doc);
    chrome.register_section(doc, SEC_DRIVE_DETAILS, "3. Drive Details");
    sections::drive_details(doc, &ctx);

    doc.next_page();
    chrome.begin_page(doc);
    chrome.register_section(doc, SEC_DELETION_LOG, "4. Secure Deletion Log");
    let rows = sections::deletion_log(doc, &ctx);

    doc.next_page();
    chrome.begin_page(doc);
    chrome.register_section(doc, SEC_SUMMARY, "5. Summary Statistics");
    let summary = DeletionSummary::from_rows(&rows);
    sections::summary(doc, &ctx, &summary);

    log::debug!(
        "report assembled: {} pages, {} deletion rows",
        doc.page_number(),
        rows.len()
    );
    summary
}
