use std::time::Instant;

use tabledrag::{Document, Dom, DragConfig, Element, PointerEvent, TableDnd};

const ROW_HEIGHT: i32 = 20;

fn table(names: &[&str]) -> Document {
    Document::new(
        Element::container()
            .id("body")
            .child(Element::table().id("t").children(names.iter().map(|name| row(name)))),
    )
}

fn row(name: &str) -> Element {
    Element::row()
        .id(name)
        .height(ROW_HEIGHT)
        .child(
            Element::cell("")
                .id(format!("{name}-select"))
                .width(3)
                .child(Element::checkbox().id(format!("{name}-check")).class("select")),
        )
        .child(Element::cell(name.to_uppercase()).id(format!("{name}-label")).width(10))
}

fn attached(doc: &Document) -> TableDnd {
    let mut dnd = TableDnd::new();
    dnd.attach(doc, &["t"], DragConfig::new().checkable_class("select"));
    dnd
}

fn check(doc: &mut Document, names: &[&str]) {
    for name in names {
        doc.set_checked(&format!("{name}-check"), true).unwrap();
    }
}

/// Grab `name` by its label cell, 10px below its top edge, then move the
/// pointer through `path` and release.
fn drag(dnd: &mut TableDnd, doc: &mut Document, name: &str, path: &[i32]) {
    let top = doc.rect(name).unwrap().y;
    let down = PointerEvent::down(format!("{name}-label"), 5, top + 10);
    assert!(dnd.pointer_down(doc, &down).is_handled());

    for y in path {
        dnd.pointer_move(doc, &PointerEvent::moved(5, *y), Instant::now());
    }

    let last = path.last().copied().unwrap_or(top + 10);
    dnd.pointer_up(doc, &PointerEvent::up(5, last));
}

fn order(doc: &Document) -> Vec<String> {
    doc.rows("t")
}

// ============================================================================
// Single row
// ============================================================================

#[test]
fn test_drag_down_past_midpoint() {
    let mut doc = table(&["a", "b", "c", "d"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "a", &[55]);

    assert_eq!(order(&doc), vec!["b", "c", "a", "d"]);
}

#[test]
fn test_drag_down_in_small_steps() {
    let mut doc = table(&["a", "b", "c", "d"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "a", &[15, 25, 35, 45, 55]);

    assert_eq!(order(&doc), vec!["b", "c", "a", "d"]);
}

#[test]
fn test_drag_up_to_top() {
    let mut doc = table(&["a", "b", "c", "d"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "d", &[50, 30, 15]);

    assert_eq!(order(&doc), vec!["d", "a", "b", "c"]);
}

#[test]
fn test_drag_to_last_row() {
    let mut doc = table(&["a", "b", "c", "d"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "b", &[75]);

    assert_eq!(order(&doc), vec!["a", "c", "d", "b"]);
}

#[test]
fn test_other_rows_keep_relative_order() {
    let names = ["a", "b", "c", "d", "e", "f"];
    let mut doc = table(&names);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "e", &[60, 40, 35]);

    let result = order(&doc);
    let others: Vec<_> = result.iter().filter(|row| *row != "e").cloned().collect();
    assert_eq!(others, vec!["a", "b", "c", "d", "f"]);
    assert_eq!(result.iter().position(|row| row == "e"), Some(1));
}

#[test]
fn test_pointer_between_nowhere_leaves_order() {
    let mut doc = table(&["a", "b", "c"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "b", &[400]);

    assert_eq!(order(&doc), vec!["a", "b", "c"]);
}

#[test]
fn test_nodrop_row_blocks_move() {
    let mut doc = Document::new(
        Element::container().id("body").child(
            Element::table()
                .id("t")
                .child(row("a"))
                .child(row("b").class("nodrop"))
                .child(row("c")),
        ),
    );
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "a", &[35]);
    assert_eq!(order(&doc), vec!["a", "b", "c"]);

    // Skipping over it lands on the next row.
    drag(&mut dnd, &mut doc, "a", &[55]);
    assert_eq!(order(&doc), vec!["b", "c", "a"]);
}

// ============================================================================
// Companions
// ============================================================================

#[test]
fn test_unchecked_primary_pulls_companions_below() {
    let mut doc = table(&["a", "b", "c", "d", "e"]);
    check(&mut doc, &["b", "d"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "a", &[55]);

    assert_eq!(order(&doc), vec!["c", "a", "b", "d", "e"]);
}

#[test]
fn test_unchecked_primary_dropped_on_later_companion() {
    let mut doc = table(&["a", "b", "c", "d", "e"]);
    check(&mut doc, &["b", "d"]);
    let mut dnd = attached(&doc);

    // Grab a and drop it onto d: the block lands right before e.
    drag(&mut dnd, &mut doc, "a", &[75]);

    assert_eq!(order(&doc), vec!["c", "a", "b", "d", "e"]);
}

#[test]
fn test_scattered_selection_becomes_contiguous_block() {
    let mut doc = table(&["a", "b", "c", "d", "e", "f"]);
    check(&mut doc, &["b", "d", "f"]);
    let mut dnd = attached(&doc);

    // Grab d (second selected row) and move it onto b.
    drag(&mut dnd, &mut doc, "d", &[30]);

    assert_eq!(order(&doc), vec!["a", "b", "d", "f", "c", "e"]);
}

#[test]
fn test_block_keeps_order_when_dragged_down() {
    let mut doc = table(&["a", "b", "c", "d", "e", "f"]);
    check(&mut doc, &["a", "c"]);
    let mut dnd = attached(&doc);

    // Grab c, drop it onto e.
    drag(&mut dnd, &mut doc, "c", &[95]);

    let result = order(&doc);
    let a = result.iter().position(|row| row == "a").unwrap();
    let c = result.iter().position(|row| row == "c").unwrap();
    assert_eq!(c, a + 1, "block must be contiguous: {result:?}");
    assert_eq!(result, vec!["b", "d", "e", "a", "c", "f"]);
}

#[test]
fn test_first_selected_primary_keeps_others_after() {
    let mut doc = table(&["a", "b", "c", "d", "e"]);
    check(&mut doc, &["b", "e"]);
    let mut dnd = attached(&doc);

    // Grab b and drag it up onto a.
    drag(&mut dnd, &mut doc, "b", &[10]);

    assert_eq!(order(&doc), vec!["b", "e", "a", "c", "d"]);
}

#[test]
fn test_companions_stay_put_without_target() {
    let mut doc = table(&["a", "b", "c", "d"]);
    check(&mut doc, &["a", "d"]);
    let mut dnd = attached(&doc);

    drag(&mut dnd, &mut doc, "a", &[300]);

    assert_eq!(order(&doc), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_failed_companion_move_does_not_abort() {
    let mut doc = table(&["a", "b", "c", "d", "e"]);
    check(&mut doc, &["b", "d"]);
    let mut dnd = attached(&doc);

    let down = PointerEvent::down("a-label", 5, 10);
    dnd.pointer_down(&mut doc, &down);
    doc.detach("b").unwrap();

    // b is gone; d still joins a.
    dnd.pointer_move(&mut doc, &PointerEvent::moved(5, 35), Instant::now());
    dnd.pointer_up(&mut doc, &PointerEvent::up(5, 35));

    assert_eq!(order(&doc), vec!["c", "a", "d", "e"]);
}
