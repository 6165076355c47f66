mod common;

use std::path::Path;

use arka_report::input::{DeletionItem, ReportInput};
use arka_report::report::{DeletionRow, DeletionSummary, ReportOptions, assemble, human_bytes};
use arka_report::surface::{Op, RecordingSurface};
use arka_report::{Error, generate_report};

fn options(background: &Path) -> ReportOptions {
    ReportOptions {
        background: background.to_path_buf(),
        generated_at: common::fixed_time(),
        ..ReportOptions::default()
    }
}

fn render(
    input: &ReportInput,
    options: &ReportOptions,
) -> (RecordingSurface, DeletionSummary, usize) {
    let mut doc = common::new_doc();
    let summary = assemble(&mut doc, input, options);
    let pages = doc.page_number();
    (doc.finish(), summary, pages)
}

fn many_deletions(n: usize) -> ReportInput {
    let mut input = ReportInput::default();
    input.deletion_report.items = (0..n)
        .map(|i| DeletionItem {
            path: Some(format!("C:/data/file_{i:03}.tmp")),
            size: 1000,
            ..DeletionItem::default()
        })
        .collect();
    input
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

#[test]
fn human_readable_sizes() {
    assert_eq!(human_bytes(0), "0.00 B");
    assert_eq!(human_bytes(1023), "1023.00 B");
    assert_eq!(human_bytes(1024), "1.00 KB");
    assert_eq!(human_bytes(1536), "1.50 KB");
    assert_eq!(human_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
    assert_eq!(human_bytes(u64::MAX), "16384.00 PB");
}

#[test]
fn deletion_rows_and_summary() {
    let input = ReportInput::from_json(common::SAMPLE_INPUT).unwrap();
    let rows: Vec<DeletionRow> = input
        .deletion_report
        .items
        .iter()
        .map(DeletionRow::from_item)
        .collect();

    assert_eq!(rows[2].cells(), ["C:/locked.db", "File", "4.00 KB", "Failed (Access denied)"]);
    assert_eq!(rows[3].path, "keys.txt");
    assert_eq!(rows[3].method, "Delete");

    let summary = DeletionSummary::from_rows(&rows);
    assert_eq!(
        summary,
        DeletionSummary {
            deleted: 3,
            bytes_deleted: 3584,
            failed: 1,
            sensitive: 2,
        }
    );
    assert_eq!(summary.cells(), ["3", "3.50 KB", "1", "2"]);

    let failed = DeletionItem {
        success: Some(false),
        ..DeletionItem::default()
    };
    assert_eq!(DeletionRow::from_item(&failed).method, "Failed (error)");
}

#[test]
fn sections_come_in_order_with_outline() {
    common::init();
    let dir = tempfile::tempdir().unwrap();
    let input = ReportInput::from_json(common::SAMPLE_INPUT).unwrap();
    let (surface, summary, pages) = render(&input, &options(&dir.path().join("absent.png")));

    assert_eq!(pages, 5);
    assert_eq!(summary.deleted, 3);

    let outline: Vec<(&str, &str)> = surface
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Outline { title, key } => Some((title.as_str(), key.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        outline,
        [
            ("1. Device & Report Information", "sec_device_info"),
            ("2. System Overview", "sec_system_overview"),
            ("3. Drive Details", "sec_drive_details"),
            ("4. Secure Deletion Log", "sec_deletion_log"),
            ("5. Summary Statistics", "sec_summary"),
        ]
    );

    let texts = common::page_texts(&surface);
    assert!(!texts[0].iter().any(|t| t.starts_with("Page ")), "cover has no footer");
    assert!(texts[1].contains(&"ARKA-SCAN-2.1".to_string()));
    assert!(texts[1].contains(&"WORKSTATION-7".to_string()));
    assert!(texts[1].contains(&"2. System Overview".to_string()));
    assert!(texts[1].contains(&"Page 2".to_string()));
    assert!(texts[2].contains(&"Documents: 120 files (50.00 MB)".to_string()));
    assert!(texts[3].contains(&"Failed (Access denied)".to_string()));
    for value in ["3", "3.50 KB", "1", "2"] {
        assert!(texts[4].contains(&value.to_string()), "summary shows {value}");
    }
    assert!(texts[4].contains(&"Page 5".to_string()));
}

#[test]
fn empty_input_still_renders_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let (surface, summary, pages) =
        render(&ReportInput::default(), &options(&dir.path().join("x.png")));
    assert_eq!(pages, 5);
    assert_eq!(summary, DeletionSummary::default());

    let texts = common::page_texts(&surface);
    assert!(texts[1].contains(&"Arka-20260102150405".to_string()), "report id from timestamp");
    assert!(texts[1].contains(&"Windows".to_string()));
    assert!(texts[4].contains(&"0.00 B".to_string()));
}

#[test]
fn long_deletion_log_continues_on_new_pages() {
    common::init();
    let dir = tempfile::tempdir().unwrap();
    let input = many_deletions(100);
    let (surface, summary, pages) = render(&input, &options(&dir.path().join("none.png")));

    // 24 rows fit each deletion page.
    assert_eq!(pages, 4 + 5);
    assert_eq!(summary.deleted, 100);

    let texts = common::page_texts(&surface);
    let continued = texts
        .iter()
        .filter(|p| p.contains(&"4. Secure Deletion Log (continued)".to_string()))
        .count();
    assert_eq!(continued, 4);

    let paths: Vec<&String> = texts
        .iter()
        .flatten()
        .filter(|t| t.starts_with("C:/data/"))
        .collect();
    assert_eq!(paths.len(), 100);
    assert!(paths.windows(2).all(|w| w[0] < w[1]), "rows stay in order");
}

#[test]
fn row_limit_caps_log_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(&dir.path().join("none.png"));
    opts.deletion_row_limit = Some(10);
    let (_, summary, pages) = render(&many_deletions(100), &opts);
    assert_eq!(pages, 5);
    assert_eq!(summary.deleted, 10);
    assert_eq!(summary.bytes_deleted, 10_000);
}

#[test]
fn writes_pdf_with_png_background() {
    common::init();
    let dir = tempfile::tempdir().unwrap();
    let bg = dir.path().join("bg.png");
    common::write_png(&bg, 60, 90);
    let input = dir.path().join("scan.json");
    std::fs::write(&input, common::SAMPLE_INPUT).unwrap();
    let out = dir.path().join("report.pdf");

    generate_report(&out, Some(input.as_path()), &options(&bg)).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(count(&bytes, "/Type /Page") - count(&bytes, "/Type /Pages"), 5);
    assert_eq!(count(&bytes, "/Subtype /Image"), 2, "image plus its soft mask, embedded once");
    assert!(count(&bytes, "/SMask") >= 1);
    assert!(count(&bytes, "/Outlines") >= 1);
    for key in [
        "sec_device_info",
        "sec_system_overview",
        "sec_drive_details",
        "sec_deletion_log",
        "sec_summary",
    ] {
        assert_eq!(count(&bytes, &format!("({key})")), 1, "{key}");
    }
    assert!(count(&bytes, "(3. Drive Details)") == 1);
    assert!(count(&bytes, "/Helvetica-Bold") == 1);
}

#[test]
fn writes_pdf_with_jpeg_background_and_long_log() {
    let dir = tempfile::tempdir().unwrap();
    let bg = dir.path().join("bg.jpg");
    std::fs::write(&bg, common::jpeg_header(0xC0, 800, 600)).unwrap();
    let out = dir.path().join("report.pdf");

    let json = serde_json::json!({
        "deletion_report": {
            "items": (0..60)
                .map(|i| serde_json::json!({"path": format!("/tmp/{i}"), "size": i}))
                .collect::<Vec<_>>()
        }
    });
    let input = dir.path().join("scan.json");
    std::fs::write(&input, json.to_string()).unwrap();

    generate_report(&out, Some(input.as_path()), &options(&bg)).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    // 60 rows need three deletion pages.
    assert_eq!(count(&bytes, "/Type /Page") - count(&bytes, "/Type /Pages"), 7);
    assert_eq!(count(&bytes, "/Subtype /Image"), 1);
    assert!(count(&bytes, "/DCTDecode") == 1);
}

#[test]
fn degraded_inputs_still_produce_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bg.png");
    std::fs::write(&bogus, b"definitely not an image").unwrap();
    let broken = dir.path().join("scan.json");
    std::fs::write(&broken, "[1, 2, 3]").unwrap();
    let out = dir.path().join("report.pdf");

    generate_report(&out, Some(broken.as_path()), &options(&bogus)).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(count(&bytes, "/Subtype /Image"), 0);
}

#[test]
fn unwritable_output_is_the_only_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("no/such/dir/report.pdf");
    let result = generate_report(&out, None, &options(&dir.path().join("bg.png")));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn oversized_sizes_saturate_in_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = ReportInput::from_json(
        r#"{"deletion_report": {"items": [{"path": "a", "size": 1e30}, {"path": "b", "size": 5}]}}"#,
    )
    .unwrap();
    let (surface, summary, _) = render(&input, &options(&dir.path().join("none.png")));
    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.bytes_deleted, u64::MAX);

    let texts = common::page_texts(&surface);
    assert!(texts[4].contains(&human_bytes(u64::MAX)));
}

#[test]
fn one_bad_field_does_not_drop_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let input = ReportInput::from_json(
        r#"{"system_info": {"release": 11},
            "deletion_report": {"items": [{"path": "kept.txt", "success": "false"}]}}"#,
    )
    .unwrap();
    let (surface, summary, _) = render(&input, &options(&dir.path().join("none.png")));
    assert_eq!(summary.failed, 1);
    let texts = common::page_texts(&surface);
    assert!(texts[3].contains(&"kept.txt".to_string()));
}

fn fill_behind(ops: &[Op], text: &str) -> Option<arka_report::color::Color> {
    let at = ops
        .iter()
        .position(|op| matches!(op, Op::Text { text: t, .. } if t == text))?;
    ops[..at].iter().rev().find_map(|op| match op {
        Op::FillRect { color, .. } => Some(*color),
        _ => None,
    })
}

#[test]
fn deletion_cells_are_tinted_by_category_and_outcome() {
    use arka_report::color::Color;

    let dir = tempfile::tempdir().unwrap();
    let input = ReportInput::from_json(
        r#"{"deletion_report": {"items": [
            {"path": "p1", "category": "Personal Photos"},
            {"path": "p2", "category": "System Logs"},
            {"path": "p3", "category": "Documents"},
            {"path": "p4", "category": "Music", "success": false, "error": "Busy"}
        ]}}"#,
    )
    .unwrap();
    let (surface, _, _) = render(&input, &options(&dir.path().join("none.png")));
    let ops = &surface.ops;

    assert_eq!(fill_behind(ops, "Personal Photos"), Some(Color::rgb(0.95, 0.9, 0.9)));
    assert_eq!(fill_behind(ops, "System Logs"), Some(Color::rgb(0.9, 0.95, 0.9)));
    assert_eq!(fill_behind(ops, "Documents"), Some(Color::rgb(0.9, 0.9, 0.95)));
    assert_eq!(
        fill_behind(ops, "Music"),
        fill_behind(ops, "p4"),
        "untinted category keeps the row tint"
    );
    assert_eq!(fill_behind(ops, "Failed (Busy)"), Some(Color::rgb(1.0, 0.9, 0.9)));
    assert_eq!(
        fill_behind(ops, "Delete"),
        fill_behind(ops, "p1"),
        "plain deletes keep the row tint"
    );
}

#[test]
fn jpeg_background_keeps_its_colour_space() {
    let dir = tempfile::tempdir().unwrap();
    for (components, space) in [(1, "/DeviceGray"), (3, "/DeviceRGB"), (4, "/DeviceCMYK")] {
        let bg = dir.path().join(format!("bg{components}.jpg"));
        std::fs::write(&bg, common::jpeg_frame(0xC0, 400, 300, components)).unwrap();
        let out = dir.path().join(format!("report{components}.pdf"));

        generate_report(&out, None, &options(&bg)).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(count(&bytes, "/Subtype /Image"), 1);
        assert_eq!(count(&bytes, space), 1, "{space}");
    }
}
