pub mod color;
mod error;
pub mod fonts;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod pdf;
pub mod probe;
pub mod report;
pub mod surface;

pub use error::Error;
pub use input::ReportInput;
pub use report::{ReportOptions, assemble};

use std::path::Path;
use std::time::Instant;

use geometry::PageSize;
use pdf::PdfSurface;
use surface::Document;

/// Read the input document, or fall back to an empty one with a warning.
pub fn load_input(path: Option<&Path>) -> ReportInput {
    let Some(path) = path else {
        log::info!("no input data given, rendering an empty report");
        return ReportInput::default();
    };
    match ReportInput::load(path) {
        Ok(input) => input,
        Err(e) => {
            log::warn!("could not read input {}: {e}; continuing without data", path.display());
            ReportInput::default()
        }
    }
}

/// Render the full report to `output`. Only failing to write the file is
/// an error; missing images and unreadable input degrade the report instead.
pub fn generate_report(
    output: &Path,
    input: Option<&Path>,
    options: &ReportOptions,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let data = load_input(input);
    let t_load = t0.elapsed();

    let mut doc = Document::new(PdfSurface::new(PageSize::A4), PageSize::A4);
    let summary = report::assemble(&mut doc, &data, options);
    let pages = doc.page_number();
    let t_render = t0.elapsed();

    let bytes = doc.finish().save(output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_load.as_secs_f64() * 1000.0,
        (t_render - t_load).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes,
    );
    log::info!("{} pages, {} files deleted", pages, summary.deleted);

    Ok(())
}
