mod common;

use arka_report::color::Color;
use arka_report::layout::{TableFrame, TablePaginator};
use arka_report::surface::Op;

use common::Restart;

// Header 30 + 33 rows of 20 fill 740 down to the 50 limit exactly.
const TOP: f32 = 740.0;
const LIMIT: f32 = 50.0;
const ROW: f32 = 20.0;
const ROWS_PER_PAGE: usize = 33;

#[test]
fn rows_spill_onto_continuation_pages() {
    common::init();
    for n in [1usize, 32, 33, 34, 66, 99, 100, 250] {
        let table = common::simple_table(Some(&["Name", "Value"]), n, ROW);
        let mut doc = common::new_doc();
        let mut cont = Restart::at(TOP);
        let run = TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, TOP);

        let expected = n.div_ceil(ROWS_PER_PAGE);
        assert_eq!(run.pages, expected, "{n} rows");
        assert_eq!(doc.page_number(), expected);
        assert_eq!(cont.calls, expected - 1);
        let on_last = n - (expected - 1) * ROWS_PER_PAGE;
        assert_eq!(run.cursor, TOP - 30.0 - on_last as f32 * ROW);
    }
}

#[test]
fn order_preserved_and_header_once_per_page() {
    let n = 80;
    let table = common::simple_table(Some(&["Name", "Value"]), n, ROW);
    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, TOP);

    let pages = common::page_texts(&doc.finish());
    assert_eq!(pages.len(), 3);

    let mut seen = Vec::new();
    for page in &pages {
        assert_eq!(page.iter().filter(|t| *t == "Name").count(), 1);
        assert_eq!(page[0], "Name", "header precedes every data row");
        seen.extend(page.iter().filter(|t| t.starts_with('r')).cloned());
    }
    let expected: Vec<String> = (0..n).map(|i| format!("r{i}")).collect();
    assert_eq!(seen, expected);
}

#[test]
fn rows_never_cross_the_bottom_limit() {
    let table = common::simple_table(Some(&["Name", "Value"]), 70, ROW);
    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, TOP);

    let surface = doc.finish();
    for op in &surface.ops {
        if let Op::StrokeRect { rect, .. } = op {
            assert!(rect.y >= LIMIT, "cell at {} below limit", rect.y);
            assert!(rect.top() <= TOP + 1e-3);
        }
    }
}

#[test]
fn zero_rows_take_only_the_header() {
    let table = common::simple_table(Some(&["Name", "Value"]), 0, ROW);
    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    let run = TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, 500.0);
    assert_eq!(run.cursor, 500.0 - 30.0);
    assert_eq!(run.pages, 1);
    let surface = doc.finish();
    assert!(!surface.ops.contains(&Op::ShowPage));
    assert_eq!(common::page_texts(&surface), vec![vec!["Name", "Value"]]);

    let bare = common::simple_table(None, 0, ROW);
    let mut doc = common::new_doc();
    let run = TablePaginator::new(&bare, LIMIT).render(&mut doc, &mut cont, 500.0);
    assert_eq!(run.cursor, 500.0);
    assert!(doc.finish().ops.is_empty());
}

#[test]
fn oversized_rows_render_on_a_fresh_page() {
    let table = common::simple_table(Some(&["Name", "Value"]), 2, 800.0);
    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    let run = TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, TOP);

    assert_eq!(run.pages, 3);
    let pages = common::page_texts(&doc.finish());
    assert_eq!(pages[0], vec!["Name", "Value"]);
    assert_eq!(pages[1], vec!["Name", "Value", "r0", "v0"]);
    assert_eq!(pages[2], vec!["Name", "Value", "r1", "v1"]);
    assert_eq!(run.cursor, TOP - 30.0 - 800.0);
}

#[test]
fn missing_cells_render_blank() {
    let mut table = common::simple_table(None, 0, ROW);
    table.rows = vec![vec!["only".to_string()], vec![]];
    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    let run = TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, 400.0);
    assert_eq!(run.cursor, 400.0 - 2.0 * ROW);

    let surface = doc.finish();
    let strokes = surface
        .ops
        .iter()
        .filter(|op| matches!(op, Op::StrokeRect { .. }))
        .count();
    assert_eq!(strokes, 4);
    assert_eq!(common::page_texts(&surface), vec![vec!["only"]]);
}

#[test]
fn rows_alternate_tints_and_policies_override() {
    let mut table = common::simple_table(None, 4, ROW);
    let even = Color::rgb(0.9, 0.9, 0.9);
    let odd = Color::rgb(0.8, 0.8, 0.8);
    let flagged = Color::rgb(1.0, 0.0, 0.0);
    table.row_tints = [even, odd];
    let value = std::mem::replace(&mut table.columns[1], arka_report::layout::Column::new(0.0));
    table.columns[1] = value.policy(move |text: &str, style: &mut arka_report::layout::CellStyle| {
        if text == "v2" {
            style.fill = Some(flagged);
        }
    });

    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, 400.0);

    let fills: Vec<Color> = doc
        .finish()
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::FillRect { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(fills, vec![even, even, odd, odd, even, flagged, odd, odd]);
}

#[test]
fn frame_drawn_once_per_page_segment() {
    let mut table = common::simple_table(Some(&["Name", "Value"]), 50, ROW);
    let frame = Color::rgb(0.1, 0.2, 0.6);
    table.frame = Some(TableFrame {
        color: frame,
        width: 2.5,
        shadow: Some((Color::rgba(0.7, 0.7, 0.7, 0.4), 4.0)),
    });
    let mut doc = common::new_doc();
    let mut cont = Restart::at(TOP);
    TablePaginator::new(&table, LIMIT).render(&mut doc, &mut cont, TOP);

    let surface = doc.finish();
    for page in surface.pages() {
        let frames: Vec<_> = page
            .iter()
            .filter_map(|op| match op {
                Op::StrokeRect { rect, color, width } if *color == frame && *width == 2.5 => {
                    Some(*rect)
                }
                _ => None,
            })
            .collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].top(), TOP);
        assert_eq!(frames[0].width, 200.0);
    }
}
