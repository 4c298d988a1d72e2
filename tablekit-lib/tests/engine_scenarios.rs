//! End-to-end scenarios driving the engine the way a host renderer would.

use tablekit_lib::TableEngine;
use tablekit_lib::model::{FieldDefinition, FieldType, Row, SelectOption};
use tablekit_lib::persist::MemoryStateStore;
use tablekit_lib::query::{FilterConfig, SortConfig, filter_rows, sort_rows};
use tablekit_lib::view::ViewConfig;

fn fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("fld", "Field", FieldType::Text),
        FieldDefinition::new("title", "Title", FieldType::Title),
        FieldDefinition::new("status", "Status", FieldType::SingleSelect).with_options(vec![
            SelectOption::new("opt_todo", "Todo"),
            SelectOption::new("opt_done", "Done"),
        ]),
        FieldDefinition::new("points", "Points", FieldType::Number),
    ]
}

fn row_ids(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn sort_ascending_places_empty_last() {
    let fields = fields();
    let rows = vec![
        Row::new("r1").set("fld", "Zebra"),
        Row::new("r2").set("fld", "Apple"),
        Row::new("r3"),
    ];
    let sorted = sort_rows(&rows, Some(&SortConfig::asc("fld")), &fields);
    assert_eq!(row_ids(&sorted), vec!["r2", "r1", "r3"]);
}

#[test]
fn sort_descending_still_places_empty_last() {
    let fields = fields();
    let rows = vec![
        Row::new("r1").set("fld", "Zebra"),
        Row::new("r2").set("fld", "Apple"),
        Row::new("r3"),
    ];
    let sorted = sort_rows(&rows, Some(&SortConfig::desc("fld")), &fields);
    assert_eq!(row_ids(&sorted), vec!["r1", "r2", "r3"]);
}

#[test]
fn equals_filter_keeps_matching_rows_in_relative_order() {
    let fields = fields();
    let rows = vec![
        Row::new("r1").set("status", "opt_done"),
        Row::new("r2").set("status", "opt_todo"),
        Row::new("r3").set("status", "opt_done"),
        Row::new("r4").set("status", "opt_todo"),
        Row::new("r5"),
    ];
    let hits = filter_rows(&rows, &[FilterConfig::equals("status", "opt_done")], &fields);
    assert_eq!(row_ids(&hits), vec!["r1", "r3"]);
}

#[test]
fn drag_fill_down_two_rows_excludes_source() {
    let fields = fields();
    let rows = vec![
        Row::new("r1").set("points", 5),
        Row::new("r2").set("points", 1),
        Row::new("r3"),
    ];
    let refs: Vec<&Row> = rows.iter().collect();

    let mut engine = TableEngine::new();
    engine.begin_fill("r1", "points");
    engine.extend_fill("r3", "points", &refs);
    let event = engine.end_fill(&refs, &fields).unwrap();

    let targets: Vec<&str> = event.targets.iter().map(|t| t.row_id.as_str()).collect();
    assert_eq!(targets, vec!["r2", "r3"]);
    assert_eq!(event.source.row_id, "r1");
    assert_eq!(event.field.id, "points");
}

#[test]
fn shift_click_selects_contiguous_range() {
    let rows: Vec<Row> = (1..=5).map(|i| Row::new(format!("row{i}"))).collect();
    let refs: Vec<&Row> = rows.iter().collect();

    let mut engine = TableEngine::new();
    engine.click_row("row1");
    let change = engine.shift_click_row("row4", &refs);
    assert_eq!(
        change.selected_row_ids,
        vec!["row1", "row2", "row3", "row4"]
    );
    assert_eq!(change.selected_row_ids.len(), 4);
}

#[test]
fn view_switch_leaves_no_residual_columns() {
    let fields = vec![
        FieldDefinition::new("a", "A", FieldType::Text),
        FieldDefinition::new("b", "B", FieldType::Text),
        FieldDefinition::new("c", "C", FieldType::Text),
    ];
    let rows = vec![Row::new("r1")];

    let wide = ViewConfig::new("Wide").with_columns(vec!["a", "b", "c"]);
    let narrow = ViewConfig::new("Narrow").with_columns(vec!["b", "c"]);
    let narrow_id = narrow.id.clone();

    let mut engine = TableEngine::with_views(vec![wide, narrow]);
    engine.set_active_view(&narrow_id).unwrap();

    let composed = engine.compose(&rows, &fields);
    let ids: Vec<&str> = composed
        .visible_fields
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[test]
fn full_interaction_cycle_with_persistence() {
    let fields = fields();
    let rows = vec![
        Row::new("r1")
            .set("title", "Fix login")
            .set("status", "opt_done")
            .set("points", 3),
        Row::new("r2")
            .set("title", "Add search")
            .set("status", "opt_todo")
            .set("points", 8),
        Row::new("r3")
            .set("title", "Polish search UI")
            .set("status", "opt_todo")
            .set("points", 2),
    ];

    let view = ViewConfig::new("Board")
        .with_columns(vec!["title", "status", "points"])
        .with_filters(vec![FilterConfig::equals("status", "opt_todo")])
        .with_sort(SortConfig::desc("points"));
    let mut engine = TableEngine::with_views(vec![view]).with_table_id("tbl_board");

    // Search narrows first, the view's filters and sort run after.
    engine.set_search_term("search");
    let composed = engine.compose(&rows, &fields);
    assert_eq!(row_ids(&composed.rows), vec!["r2", "r3"]);

    // Reorder columns and persist; a fresh engine restores the same
    // composition before its first render.
    engine.move_column("points", 0);
    let mut store = MemoryStateStore::new();
    engine.save_state(&mut store).unwrap();

    let view2 = ViewConfig::new("Board").with_columns(vec!["title"]);
    let mut restored = TableEngine::with_views(vec![view2]).with_table_id("tbl_board");
    assert!(restored.restore_state(&store, &fields).unwrap());
    let composed = restored.compose(&rows, &fields);
    let field_order: Vec<&str> = composed
        .visible_fields
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(field_order, vec!["points", "title", "status"]);
    assert_eq!(row_ids(&composed.rows), vec!["r2", "r1", "r3"]);
}
