use crate::color::Color;
use crate::fonts::Font;
use crate::geometry::Rect;
use crate::input::Drive;
use crate::layout::chrome::{MARGIN_LEFT, MARGIN_RIGHT};
use crate::layout::{
    Alignment, CellStyle, Column, ContinuedSection, HeaderStyle, MultilineStyle, Table,
    TableFrame, TablePaginator, draw_cell, draw_heading,
};
use crate::surface::{Document, Surface};

use super::stats::{DeletionRow, DeletionSummary, human_bytes};
use super::Context;

const MAX_CATEGORY_LINES: usize = 12;
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";
const REPORT_ID_FORMAT: &str = "%Y%m%d%H%M%S";

fn labels(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|n| n.to_string()).collect())
}

/// Stretch nominal column widths proportionally to `total`.
fn scaled(widths: &[f32], total: f32) -> Vec<f32> {
    let sum: f32 = widths.iter().sum();
    widths.iter().map(|w| w / sum * total).collect()
}

fn header_style(
    ctx: &Context,
    height: f32,
    start: Color,
    end: Color,
    border: (Color, f32),
) -> HeaderStyle {
    let mut style = HeaderStyle {
        height,
        gradient: Some((start, end)),
        bands: ctx.options.gradient_bands,
        ..HeaderStyle::default()
    };
    style.cell = style.cell.with_border(border.0, border.1);
    style
}

fn continuation<'a>(
    ctx: &'a Context,
    title: &'a str,
    title_offset: f32,
    table_offset: f32,
) -> ContinuedSection<'a> {
    ContinuedSection {
        chrome: ctx.chrome,
        title,
        title_offset,
        table_offset,
    }
}

fn device_rows(ctx: &Context) -> Vec<Vec<String>> {
    let input = ctx.input;
    let info = &input.system_info;
    let report_id = input
        .scanner_version
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| {
            format!(
                "{}-{}",
                ctx.options.brand,
                ctx.options.generated_at.format(REPORT_ID_FORMAT)
            )
        });
    let text_or = |v: &Option<String>, fallback: &str| {
        v.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| fallback.to_string())
    };
    let pairs = [
        ("Report ID", report_id),
        ("Device Name", text_or(&info.hostname, "Unknown")),
        ("Serial Number", text_or(&input.serial_number, "N/A")),
        ("Operating System", input.os_description()),
        ("IP Address", text_or(&info.ip, "N/A")),
        ("Total Storage", human_bytes(input.total_capacity())),
        (
            "Total Used",
            format!("{} ({:.1}%)", human_bytes(input.total_used()), input.used_percent()),
        ),
    ];
    pairs
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v])
        .collect()
}

/// Title block, barcode placeholder and the device key/value table.
/// Returns the y the next block may start at.
pub(super) fn device_info<S: Surface>(doc: &mut Document<S>, ctx: &Context, top: f32) -> f32 {
    let page = doc.page_size();
    let width = ctx.chrome.content_width(page);
    let right = page.width - MARGIN_RIGHT;

    let surface = doc.surface();
    let heading = format!("1. {}", ctx.options.title);
    surface.draw_string(MARGIN_LEFT, top, &heading, Font::HelveticaBold, 16.0, Color::BLACK);
    let stamp = ctx.options.generated_at.format(TIMESTAMP_FORMAT).to_string();
    let stamp_w = surface.string_width(&stamp, Font::Helvetica, 12.0);
    surface.draw_string(right - stamp_w, top, &stamp, Font::Helvetica, 12.0, Color::GREY);
    draw_heading(doc, "1.1 Device & Report Information", top - 40.0);

    let table_top = top - 80.0;
    let barcode = Rect::new(right - 120.0, table_top + 10.0, 120.0, 32.0);
    let surface = doc.surface();
    surface.fill_rect(barcode.offset(2.0, -2.0), Color::rgba(0.0, 0.0, 0.0, 0.2));
    draw_cell(
        surface,
        barcode,
        Some("REPORT BARCODE"),
        &CellStyle::default()
            .with_fill(Color::WHITE)
            .with_border(Color::BLACK, 1.0)
            .with_text(8.0, Color::GREY)
            .with_align(Alignment::Center)
            .bold(),
    );

    let border = Color::rgb(0.6, 0.65, 0.75);
    let widths = scaled(&[35.0, 65.0], width);
    let mut table = Table::new(
        MARGIN_LEFT,
        vec![
            Column::new(widths[0]).style(
                CellStyle::default()
                    .with_fill(Color::rgb(0.88, 0.92, 0.96))
                    .with_border(border, 0.7)
                    .bold(),
            ),
            Column::new(widths[1]).style(CellStyle::default().with_border(border, 0.7)),
        ],
        28.0,
    );
    table.header = labels(&["Property", "Details"]);
    table.header_style = header_style(
        ctx,
        28.0,
        Color::rgb(0.15, 0.35, 0.75),
        Color::rgb(0.25, 0.45, 0.85),
        (Color::rgb(0.1, 0.2, 0.6), 1.0),
    );
    table.rows = device_rows(ctx);
    table.row_tints = [Color::rgb(0.97, 0.98, 0.99), Color::rgb(0.94, 0.96, 0.98)];
    table.frame = Some(TableFrame {
        color: Color::rgb(0.1, 0.2, 0.6),
        width: 2.0,
        shadow: None,
    });

    let mut cont = continuation(ctx, "1.1 Device & Report Information", 0.0, 30.0);
    let run =
        TablePaginator::new(&table, ctx.chrome.bottom_limit()).render(doc, &mut cont, table_top);
    run.cursor - 25.0
}

fn usage_tint(text: &str, style: &mut CellStyle) {
    let pct: f64 = text.trim_end_matches('%').trim().parse().unwrap_or(0.0);
    style.fill = Some(if pct > 70.0 {
        Color::rgb(1.0, 0.9, 0.9)
    } else if pct > 50.0 {
        Color::rgb(1.0, 0.95, 0.8)
    } else {
        Color::rgb(0.9, 1.0, 0.9)
    });
}

/// Caption, heading and the one-row totals table.
pub(super) fn system_overview<S: Surface>(doc: &mut Document<S>, ctx: &Context, y: f32) -> f32 {
    let width = ctx.chrome.content_width(doc.page_size());
    doc.surface().draw_string(
        MARGIN_LEFT,
        y,
        "Below Mentioned Drives are Scanned",
        Font::HelveticaBold,
        12.0,
        Color::rgb(0.3, 0.3, 0.3),
    );
    draw_heading(doc, "2. System Overview", y - 30.0);

    let input = ctx.input;
    let body = CellStyle::default()
        .with_fill(Color::rgb(0.95, 0.98, 0.95))
        .with_border(Color::rgb(0.1, 0.3, 0.1), 0.8)
        .with_text(11.0, Color::BLACK)
        .with_align(Alignment::Center);
    let widths = scaled(&[120.0, 140.0, 140.0, 120.0], width);
    let columns = widths
        .iter()
        .enumerate()
        .map(|(j, &w)| {
            let column = Column::new(w).style(body);
            if j == 3 { column.policy(usage_tint) } else { column }
        })
        .collect();

    let mut table = Table::new(MARGIN_LEFT, columns, 32.0);
    table.header = labels(&["Total Drives", "Total Capacity", "Total Used", "Used %"]);
    table.header_style = header_style(
        ctx,
        32.0,
        Color::rgb(0.2, 0.5, 0.2),
        Color::rgb(0.3, 0.6, 0.3),
        (Color::rgb(0.1, 0.3, 0.1), 1.2),
    );
    table.rows = vec![vec![
        input.drive_count().to_string(),
        human_bytes(input.total_capacity()),
        human_bytes(input.total_used()),
        format!("{:.1}%", input.used_percent()),
    ]];
    table.frame = Some(TableFrame {
        color: Color::rgb(0.1, 0.3, 0.1),
        width: 2.0,
        shadow: Some((Color::rgba(0.8, 0.8, 0.8, 0.3), 3.0)),
    });

    let mut cont = continuation(ctx, "2. System Overview", 0.0, 30.0);
    TablePaginator::new(&table, ctx.chrome.bottom_limit())
        .render(doc, &mut cont, y - 60.0)
        .cursor
}

fn space(bytes: u64, human: &Option<String>) -> String {
    human
        .clone()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| human_bytes(bytes))
}

fn category_lines(drive: &Drive) -> String {
    drive
        .file_analysis
        .categories
        .iter()
        .take(MAX_CATEGORY_LINES)
        .map(|(name, stats)| {
            format!("{}: {} files ({})", name, stats.count, human_bytes(stats.size))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One tall row per drive with its category breakdown.
pub(super) fn drive_details<S: Surface>(doc: &mut Document<S>, ctx: &Context) -> f32 {
    let top = ctx.chrome.content_top(doc.page_size());
    draw_heading(doc, "3. Drive Details", top);

    let border = Color::rgb(0.8, 0.8, 0.8);
    let cell = CellStyle::default()
        .with_border(border, 0.6)
        .with_text(9.0, Color::BLACK);
    let columns = vec![
        Column::new(40.0).style(
            cell.with_fill(Color::rgb(0.85, 0.90, 0.95))
                .with_text(11.0, Color::BLACK)
                .with_align(Alignment::Center)
                .bold(),
        ),
        Column::new(70.0).style(cell),
        Column::new(75.0).style(cell.with_align(Alignment::Right)),
        Column::new(85.0).style(cell.with_align(Alignment::Right)),
        Column::new(70.0).style(cell.with_align(Alignment::Right)),
        Column::new(155.0)
            .style(cell.with_fill(Color::rgb(0.92, 0.96, 0.98)))
            .multiline(MultilineStyle {
                font_size: 7.0,
                line_spacing: 10.0,
                padding: 4.0,
                ..MultilineStyle::default()
            }),
    ];

    let mut table = Table::new(MARGIN_LEFT, columns, 130.0);
    table.header = labels(&["Drive", "File System", "Total", "Used", "Free", "File Categories"]);
    table.header_style = header_style(
        ctx,
        35.0,
        Color::rgb(0.6, 0.2, 0.2),
        Color::rgb(0.7, 0.3, 0.3),
        (Color::rgb(0.4, 0.1, 0.1), 1.2),
    );
    table.rows = ctx
        .input
        .drives
        .iter()
        .map(|d| {
            vec![
                d.drive.clone().unwrap_or_default(),
                d.filesystem.clone().unwrap_or_default(),
                space(d.total_space_bytes, &d.total_space_human),
                space(d.used_space_bytes, &d.used_space_human),
                space(d.free_space_bytes, &d.free_space_human),
                category_lines(d),
            ]
        })
        .collect();
    table.row_tints = [Color::rgb(0.98, 0.95, 0.95), Color::rgb(0.95, 0.92, 0.92)];
    table.frame = Some(TableFrame {
        color: Color::rgb(0.4, 0.1, 0.1),
        width: 2.5,
        shadow: Some((Color::rgba(0.7, 0.7, 0.7, 0.4), 4.0)),
    });

    let mut cont = continuation(ctx, "3. Drive Details", 0.0, 30.0);
    TablePaginator::new(&table, ctx.chrome.bottom_limit())
        .render(doc, &mut cont, top - 30.0)
        .cursor
}

fn category_tint(text: &str, style: &mut CellStyle) {
    if text.contains("Personal") {
        style.fill = Some(Color::rgb(0.95, 0.9, 0.9));
    } else if text.contains("System") {
        style.fill = Some(Color::rgb(0.9, 0.95, 0.9));
    } else if text.contains("Document") {
        style.fill = Some(Color::rgb(0.9, 0.9, 0.95));
    }
}

fn method_tint(text: &str, style: &mut CellStyle) {
    if text.starts_with("Failed") {
        style.fill = Some(Color::rgb(1.0, 0.9, 0.9));
        style.text_color = Color::rgb(0.7, 0.1, 0.1);
    } else if text.contains("Simple Delete") {
        style.fill = Some(Color::rgb(1.0, 0.95, 0.85));
    } else if text.contains("Secure Erase") {
        style.fill = Some(Color::rgb(0.85, 0.95, 0.85));
    }
}

/// The deletion log, as many pages as it takes. Returns the rows rendered.
pub(super) fn deletion_log<S: Surface>(doc: &mut Document<S>, ctx: &Context) -> Vec<DeletionRow> {
    let top = ctx.chrome.content_top(doc.page_size());
    doc.surface().draw_string(
        MARGIN_LEFT,
        top,
        "Below mentioned files are Deleted",
        Font::HelveticaBold,
        12.0,
        Color::BLACK,
    );
    draw_heading(doc, "4. Secure Deletion Log", top - 30.0);

    let items = &ctx.input.deletion_report.items;
    let limit = ctx.options.deletion_row_limit.unwrap_or(items.len());
    let rows: Vec<DeletionRow> = items.iter().take(limit).map(DeletionRow::from_item).collect();
    if rows.len() < items.len() {
        log::info!("deletion log capped at {} of {} items", rows.len(), items.len());
    }

    let cell = CellStyle::default()
        .with_border(Color::rgb(0.7, 0.7, 0.7), 0.7)
        .with_text(8.0, Color::BLACK);
    let columns = vec![
        Column::new(185.0).style(cell),
        Column::new(90.0)
            .style(cell.with_align(Alignment::Center))
            .policy(category_tint),
        Column::new(70.0).style(cell.with_align(Alignment::Right)),
        Column::new(150.0)
            .style(cell.with_text(7.0, Color::BLACK))
            .policy(method_tint),
    ];

    let mut table = Table::new(MARGIN_LEFT, columns, 25.0);
    table.header = labels(&["File Path", "Category", "Size", "Method"]);
    table.header_style = header_style(
        ctx,
        32.0,
        Color::rgb(0.4, 0.2, 0.6),
        Color::rgb(0.5, 0.3, 0.7),
        (Color::rgb(0.2, 0.1, 0.4), 1.2),
    );
    table.header_style.cell.font_size = 9.0;
    table.rows = rows.iter().map(DeletionRow::cells).collect();
    table.row_tints = [Color::rgb(0.96, 0.94, 0.98), Color::rgb(0.94, 0.92, 0.96)];

    let mut cont = continuation(ctx, "4. Secure Deletion Log", 30.0, 60.0);
    let run =
        TablePaginator::new(&table, ctx.chrome.bottom_limit()).render(doc, &mut cont, top - 60.0);
    log::debug!("deletion log: {} rows over {} pages", rows.len(), run.pages);
    rows
}

fn failed_tint(text: &str, style: &mut CellStyle) {
    if text.trim() == "0" {
        style.fill = Some(Color::rgb(0.95, 1.0, 0.9));
        style.text_color = Color::rgb(0.1, 0.6, 0.1);
    } else {
        style.fill = Some(Color::rgb(1.0, 0.9, 0.9));
        style.text_color = Color::rgb(0.8, 0.1, 0.1);
    }
}

/// Totals derived from the deletion rows, plus the closing note.
pub(super) fn summary<S: Surface>(
    doc: &mut Document<S>,
    ctx: &Context,
    summary: &DeletionSummary,
) -> f32 {
    let top = ctx.chrome.content_top(doc.page_size());
    let width = ctx.chrome.content_width(doc.page_size());
    draw_heading(doc, "5. Summary Statistics", top - 30.0);

    let base = CellStyle::default()
        .with_border(Color::rgb(0.6, 0.2, 0.05), 1.0)
        .with_align(Alignment::Center)
        .bold();
    let widths = scaled(&[110.0, 120.0, 110.0, 120.0], width);
    let columns = vec![
        Column::new(widths[0]).style(
            base.with_fill(Color::rgb(0.9, 0.95, 1.0))
                .with_text(14.0, Color::rgb(0.1, 0.3, 0.7)),
        ),
        Column::new(widths[1]).style(
            base.with_fill(Color::rgb(0.95, 1.0, 0.9))
                .with_text(14.0, Color::rgb(0.1, 0.6, 0.1)),
        ),
        Column::new(widths[2])
            .style(base.with_text(14.0, Color::BLACK))
            .policy(failed_tint),
        Column::new(widths[3]).style(
            base.with_fill(Color::rgb(1.0, 0.95, 0.85))
                .with_text(14.0, Color::rgb(0.8, 0.4, 0.1)),
        ),
    ];

    let mut table = Table::new(MARGIN_LEFT, columns, 40.0);
    table.header = labels(&[
        "Files Deleted",
        "Data Size Deleted",
        "Files Failed",
        "Sensitive Files Deleted",
    ]);
    table.header_style = header_style(
        ctx,
        35.0,
        Color::rgb(0.8, 0.4, 0.1),
        Color::rgb(0.9, 0.5, 0.2),
        (Color::rgb(0.6, 0.2, 0.05), 1.5),
    );
    table.header_style.cell.font_size = 9.0;
    table.rows = vec![summary.cells()];
    table.frame = Some(TableFrame {
        color: Color::rgb(0.6, 0.2, 0.05),
        width: 2.5,
        shadow: Some((Color::rgba(0.7, 0.7, 0.7, 0.4), 4.0)),
    });

    let mut cont = continuation(ctx, "5. Summary Statistics", 30.0, 60.0);
    let cursor = TablePaginator::new(&table, ctx.chrome.bottom_limit())
        .render(doc, &mut cont, top - 60.0)
        .cursor;

    doc.surface().draw_string(
        MARGIN_LEFT,
        cursor - 20.0,
        "Note: Statistics are based on the current deletion session and secure erase operations performed.",
        Font::HelveticaOblique,
        9.0,
        Color::rgb(0.4, 0.4, 0.4),
    );
    cursor - 20.0
}
